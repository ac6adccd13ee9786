#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::XmlError;
pub use reader::{XmlEvent, XmlReader};
pub use writer::{XmlWriter, escape_text};
