//! The dynamically-typed value model.
//!
//! [`Value`] is the tagged union of the built-in variants; everything a
//! codec reads or writes is one of these. The open extension point is
//! [`Value::Custom`]: any type implementing [`CustomValue`] can live in an
//! object graph, provided a codec for its tag is registered for the wire
//! formats it should survive.

use core::any::Any;
use core::fmt;

use crate::Object;
use crate::hash::HashMap;
use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// Modules

mod number;

pub use number::{Number, NumberKind};

// -----------------------------------------------------------------------------
// CustomValue

/// An embedder-defined variant.
///
/// Implementations choose their own copy policy: returning `None` from
/// [`try_copy`](Self::try_copy) makes [`Object::try_copy`] fail with
/// `UnsupportedOperation` for this variant, which is a legitimate choice
/// for values that are not meaningfully copyable.
pub trait CustomValue: fmt::Debug + 'static {
    /// The tag this value dispatches under; must be stable and should be
    /// at or above [`TypeTag::CUSTOM_BASE`].
    fn type_tag(&self) -> TypeTag;

    /// Reset to this variant's empty value.
    fn clear(&mut self);

    /// Produce an independent copy, if the variant supports it.
    fn try_copy(&self) -> Option<Box<dyn CustomValue>> {
        None
    }

    /// Structural equality against another custom value. The default is
    /// conservative: nothing equals anything.
    fn value_eq(&self, other: &dyn CustomValue) -> bool {
        let _ = other;
        false
    }

    /// Downcasting hook for embedders.
    fn as_any(&self) -> &dyn Any;
}

// -----------------------------------------------------------------------------
// Value

/// The content of an object: one of the built-in variants, or a custom
/// extension.
#[derive(Debug)]
pub enum Value {
    Bool(bool),
    Number(Number),
    String(String),
    /// UTC seconds since the epoch.
    Date(i64),
    Blob(Vec<u8>),
    Array(Vec<Object>),
    Dict(HashMap<String, Object>),
    Custom(Box<dyn CustomValue>),
}

impl Value {
    /// The type tag this value dispatches under.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Bool(_) => TypeTag::BOOLEAN,
            Self::Number(_) => TypeTag::NUMBER,
            Self::String(_) => TypeTag::STRING,
            Self::Date(_) => TypeTag::DATE,
            Self::Blob(_) => TypeTag::DATA,
            Self::Array(_) => TypeTag::ARRAY,
            Self::Dict(_) => TypeTag::DICTIONARY,
            Self::Custom(v) => v.type_tag(),
        }
    }

    /// Reset to this variant's empty value. The variant itself never
    /// changes; a cleared number keeps its machine kind.
    pub fn clear(&mut self) {
        match self {
            Self::Bool(v) => *v = false,
            Self::Number(n) => *n = Number::zero(n.kind()),
            Self::String(s) => s.clear(),
            Self::Date(d) => *d = 0,
            Self::Blob(b) => b.clear(),
            Self::Array(items) => items.clear(),
            Self::Dict(entries) => entries.clear(),
            Self::Custom(v) => v.clear(),
        }
    }

    /// Copy per the variant's own policy: scalars deeply, containers
    /// shallowly (children stay shared), custom values as they see fit.
    pub(crate) fn try_copy(&self) -> Result<Self, crate::Error> {
        Ok(match self {
            Self::Bool(v) => Self::Bool(*v),
            Self::Number(n) => Self::Number(*n),
            Self::String(s) => Self::String(s.clone()),
            Self::Date(d) => Self::Date(*d),
            Self::Blob(b) => Self::Blob(b.clone()),
            Self::Array(items) => Self::Array(items.clone()),
            Self::Dict(entries) => Self::Dict(entries.clone()),
            Self::Custom(v) => Self::Custom(v.try_copy().ok_or(
                crate::Error::UnsupportedOperation("variant registered no copy support"),
            )?),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Blob(a), Self::Blob(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Dict(a), Self::Dict(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.value_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

// -----------------------------------------------------------------------------
// Tests
