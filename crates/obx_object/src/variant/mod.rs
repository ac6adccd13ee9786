//! The built-in variant codecs.
//!
//! One module per variant, each exposing a `register` hook that installs
//! its codec in all the tables it participates in. Embedders composing a
//! partial registry call the hooks they want; [`CodecRegistry::new`] calls
//! all of them.

use crate::error::Error;
use crate::registry::CodecRegistry;

// -----------------------------------------------------------------------------
// Modules

pub mod array;
pub mod boolean;
pub mod data;
pub mod date;
pub mod dictionary;
pub mod number;
pub mod string;

// -----------------------------------------------------------------------------
// Registration

/// Install every built-in variant codec.
pub fn register_builtins(registry: &mut CodecRegistry) -> Result<(), Error> {
    data::register(registry)?;
    date::register(registry)?;
    array::register(registry)?;
    number::register(registry)?;
    string::register(registry)?;
    boolean::register(registry)?;
    dictionary::register(registry)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
