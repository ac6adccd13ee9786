//! The per-type codec tables.

use alloc::sync::Arc;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::codec::{BinCodec, XmlCodec};
use crate::error::Error;
use crate::hash::HashMap;
use crate::tag::TypeTag;
use crate::variant;

// -----------------------------------------------------------------------------
// CodecRegistry

/// Four independent key→codec tables: XML readers by element name, XML
/// writers, binary readers and binary writers by [`TypeTag`].
///
/// There is no hidden global registry: every driver entry point takes a
/// `&CodecRegistry`, and embedders that want one shared process-wide
/// instance wrap it in a [`CodecRegistryArc`].
///
/// A lookup miss is not an error — probing for an optional format is a
/// normal usage pattern — so the `get` side returns `Option` and the
/// drivers turn a miss into [`Error::UnsupportedType`] /
/// [`Error::UnsupportedElement`] at dispatch time. Registering a key twice
/// replaces the earlier codec.
///
/// # Example
///
/// ```
/// use obx_object::{CodecRegistry, TypeTag};
///
/// let registry = CodecRegistry::new();
/// assert!(registry.bin_reader(TypeTag::BOOLEAN).is_some());
/// assert!(registry.xml_reader("dict").is_some());
/// assert!(registry.bin_reader(TypeTag::new(99)).is_none());
/// ```
pub struct CodecRegistry {
    xml_readers: HashMap<Box<str>, Arc<dyn XmlCodec>>,
    xml_writers: HashMap<TypeTag, Arc<dyn XmlCodec>>,
    bin_readers: HashMap<TypeTag, Arc<dyn BinCodec>>,
    bin_writers: HashMap<TypeTag, Arc<dyn BinCodec>>,
}

impl Default for CodecRegistry {
    /// See [`CodecRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CodecRegistry {
    /// Create an empty registry with no codecs at all.
    pub const fn empty() -> Self {
        Self {
            xml_readers: HashMap::with_hasher(crate::hash::FixedHashState),
            xml_writers: HashMap::with_hasher(crate::hash::FixedHashState),
            bin_readers: HashMap::with_hasher(crate::hash::FixedHashState),
            bin_writers: HashMap::with_hasher(crate::hash::FixedHashState),
        }
    }

    /// Create a registry with every built-in variant registered for both
    /// wire formats.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        variant::register_builtins(&mut registry)
            .expect("built-in codec registration uses valid keys");
        registry
    }

    /// Register an XML reader under an element name.
    pub fn set_xml_reader(
        &mut self,
        name: &str,
        codec: Arc<dyn XmlCodec>,
    ) -> Result<(), Error> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("empty element name"));
        }
        self.xml_readers.insert(name.into(), codec);
        Ok(())
    }

    pub fn xml_reader(&self, name: &str) -> Option<&Arc<dyn XmlCodec>> {
        self.xml_readers.get(name)
    }

    /// Register an XML writer under a type tag.
    pub fn set_xml_writer(
        &mut self,
        tag: TypeTag,
        codec: Arc<dyn XmlCodec>,
    ) -> Result<(), Error> {
        if tag.is_none() {
            return Err(Error::InvalidArgument("reserved type tag"));
        }
        self.xml_writers.insert(tag, codec);
        Ok(())
    }

    pub fn xml_writer(&self, tag: TypeTag) -> Option<&Arc<dyn XmlCodec>> {
        self.xml_writers.get(&tag)
    }

    /// Register a binary reader under a type tag.
    pub fn set_bin_reader(
        &mut self,
        tag: TypeTag,
        codec: Arc<dyn BinCodec>,
    ) -> Result<(), Error> {
        if tag.is_none() {
            return Err(Error::InvalidArgument("reserved type tag"));
        }
        self.bin_readers.insert(tag, codec);
        Ok(())
    }

    pub fn bin_reader(&self, tag: TypeTag) -> Option<&Arc<dyn BinCodec>> {
        self.bin_readers.get(&tag)
    }

    /// Register a binary writer under a type tag.
    pub fn set_bin_writer(
        &mut self,
        tag: TypeTag,
        codec: Arc<dyn BinCodec>,
    ) -> Result<(), Error> {
        if tag.is_none() {
            return Err(Error::InvalidArgument("reserved type tag"));
        }
        self.bin_writers.insert(tag, codec);
        Ok(())
    }

    pub fn bin_writer(&self, tag: TypeTag) -> Option<&Arc<dyn BinCodec>> {
        self.bin_writers.get(&tag)
    }

    /// Drop both reader tables. Lookups afterwards simply miss; nothing
    /// crashes.
    pub fn clear_readers(&mut self) {
        self.xml_readers = HashMap::with_hasher(crate::hash::FixedHashState);
        self.bin_readers = HashMap::with_hasher(crate::hash::FixedHashState);
    }

    /// Drop both writer tables.
    pub fn clear_writers(&mut self) {
        self.xml_writers = HashMap::with_hasher(crate::hash::FixedHashState);
        self.bin_writers = HashMap::with_hasher(crate::hash::FixedHashState);
    }
}

// -----------------------------------------------------------------------------
// CodecRegistryArc

/// A shared, lock-guarded [`CodecRegistry`] for embedders that want one
/// process-wide instance. Registration happens during single-threaded
/// startup; after that the registry is read-mostly and concurrent lookups
/// through [`read`](Self::read) are cheap.
#[derive(Clone, Default)]
pub struct CodecRegistryArc {
    /// The wrapped [`CodecRegistry`].
    pub internal: Arc<RwLock<CodecRegistry>>,
}

impl CodecRegistryArc {
    /// Takes a read lock on the underlying [`CodecRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, CodecRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`CodecRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, CodecRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// -----------------------------------------------------------------------------
// Tests
