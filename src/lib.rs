#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

mod boundary;
mod entry;
mod error;
mod mapping;
mod penalty;
mod position;
mod reference;
mod rules;
mod section;
mod size;
mod splitter;
mod trim;

pub use entry::{chunkdown, Chunkdown};
pub use error::ChunkdownError;
pub use rules::{default_rules, ChunkdownOptions, NodeKind, NodeRule, ReferenceStyle, SplitRule};
pub use size::{content_size, raw_size};
