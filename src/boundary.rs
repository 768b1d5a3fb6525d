/*!
Boundary scoring (spec.md §4.8(e)): a fixed table of regex patterns ranking
candidate cut points in plain text by how natural a place they are to split,
from sentence ends down to a last-resort fallback of any whitespace run.
*/

use once_cell::sync::Lazy;
use regex::Regex;

/// A candidate cut point in plain text, at the given priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Boundary {
    pub(crate) offset: usize,
    pub(crate) priority: Priority,
}

/// Boundary priority classes, ordered worst-to-best so that `Ord` derives the
/// comparison the bisection search wants ("prefer the highest-priority
/// boundary nearest the target offset").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Priority {
    /// Any whitespace run, used only when nothing better exists nearby.
    Fallback,
    /// A comma or semicolon.
    Comma,
    /// An em-dash, en-dash, or parenthetical dash.
    Dash,
    /// A clause boundary: colon, or a quoted-phrase boundary (quote-pairs
    /// are folded into this single class rather than split further).
    Clause,
    /// A sentence-ending punctuation mark followed by whitespace.
    Sentence,
}

static SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+[\)'\u{201d}\u{2019}\]]*\s+").unwrap());
static CLAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[:]\s+|["\u{201c}\u{201d}]\s*"#).unwrap());
static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s[-\u{2013}\u{2014}]\s").unwrap());
static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;]\s+").unwrap());
static FALLBACK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Scan `text` once per pattern in the table, collecting every match's end
/// offset (the natural cut point, just after the punctuation/whitespace run)
/// as a [`Boundary`] at that pattern's priority.
pub(crate) fn find_all(text: &str) -> Vec<Boundary> {
    let mut boundaries = Vec::new();
    for (regex, priority) in [
        (&*SENTENCE, Priority::Sentence),
        (&*CLAUSE, Priority::Clause),
        (&*DASH, Priority::Dash),
        (&*COMMA, Priority::Comma),
        (&*FALLBACK, Priority::Fallback),
    ] {
        for m in regex.find_iter(text) {
            boundaries.push(Boundary {
                offset: m.end(),
                priority,
            });
        }
    }
    boundaries.sort_by_key(|b| b.offset);
    boundaries
}

/// The base score for each priority class (spec.md §4.8(e)): spaced widely
/// enough that the `balance_bonus` (§4.8(f), at most 40) and a penalized
/// range's finite weight can shift the ranking within a class, or between
/// two adjacent classes, but a `Sentence` boundary still always beats a
/// `Fallback` one even under the worst-case penalty/bonus swing.
pub(crate) fn priority_weight(priority: Priority) -> f64 {
    match priority {
        Priority::Fallback => 10.0,
        Priority::Comma => 40.0,
        Priority::Dash => 50.0,
        Priority::Clause => 70.0,
        Priority::Sentence => 100.0,
    }
}

/// `balance_bonus` (spec.md §4.8(f)): `round(40 * min(left, right) / total)`,
/// rewarding a cut point nearer the midpoint of `[plain_start, plain_end)`
/// over one that leaves a lopsided remainder on one side.
pub(crate) fn balance_bonus(offset: usize, plain_start: usize, plain_end: usize) -> f64 {
    let total = plain_end.saturating_sub(plain_start);
    if total == 0 {
        return 0.0;
    }
    let left = offset.saturating_sub(plain_start);
    let right = plain_end.saturating_sub(offset);
    #[allow(clippy::cast_precision_loss)]
    let ratio = left.min(right) as f64 / total as f64;
    (40.0 * ratio).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_sentence_boundary() {
        let text = "First sentence. Second sentence.";
        let boundaries = find_all(text);
        assert!(boundaries
            .iter()
            .any(|b| b.priority == Priority::Sentence && b.offset == "First sentence. ".len()));
    }

    #[test]
    fn fallback_never_outranks_sentence() {
        assert!(Priority::Sentence > Priority::Fallback);
        assert!(Priority::Clause > Priority::Comma);
    }

    #[test]
    fn priority_weight_respects_class_ordering() {
        assert!(priority_weight(Priority::Sentence) > priority_weight(Priority::Clause));
        assert!(priority_weight(Priority::Clause) > priority_weight(Priority::Dash));
        assert!(priority_weight(Priority::Dash) > priority_weight(Priority::Comma));
        assert!(priority_weight(Priority::Comma) > priority_weight(Priority::Fallback));
    }

    #[test]
    fn balance_bonus_favors_the_midpoint() {
        let midpoint = balance_bonus(50, 0, 100);
        let lopsided = balance_bonus(5, 0, 100);
        assert!(midpoint > lopsided);
    }
}
