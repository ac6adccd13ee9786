use std::io;

use thiserror::Error;

use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// Error

/// Everything the object runtime and the codec drivers can report.
///
/// The recoverable half — missing codecs, foreign or truncated input —
/// always surfaces as an `Err` value the caller can treat as "no object
/// produced". Caller-bug preconditions (destroying a shared object,
/// writing a tag that cannot be encoded) are kept out of this enum where
/// the type system can make them unrepresentable instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("no codec registered for type {0}")]
    UnsupportedType(TypeTag),

    #[error("no codec registered for element `{0}`")]
    UnsupportedElement(String),

    #[error("operation not supported: {0}")]
    UnsupportedOperation(&'static str),

    #[error("unrecognized serialization format")]
    FormatUnrecognized,

    #[error("truncated input: {needed} bytes declared, {remaining} available")]
    Truncated { needed: u64, remaining: u64 },

    #[error("malformed {0} payload")]
    MalformedPayload(&'static str),

    #[error("input produced no object")]
    NoObject,

    #[error("object is read-only")]
    ReadOnly,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Xml(#[from] obx_xml::XmlError),
}
