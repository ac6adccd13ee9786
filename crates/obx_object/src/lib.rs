#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod format;
mod hash;
mod object;
mod tag;

pub mod codec;
pub mod persist;
pub mod registry;
pub mod value;
pub mod variant;

#[cfg(feature = "serde")]
mod serde;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::Error;
pub use format::{Format, FormatKind};
pub use hash::{FixedHashState, FixedHasher, HashMap};
pub use object::Object;
pub use registry::{CodecRegistry, CodecRegistryArc};
pub use tag::{ObjectFlags, TypeTag};
pub use value::{CustomValue, Number, NumberKind, Value};
