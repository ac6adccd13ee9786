#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod sink;
mod source;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use sink::{FileWriter, Sink, Writer};
pub use source::{FileReader, Reader, Source};
