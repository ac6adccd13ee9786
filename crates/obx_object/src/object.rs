use alloc::rc::Rc;
use core::any::Any;
use core::cell::{Cell, Ref, RefCell, RefMut};
use core::fmt;

use crate::error::Error;
use crate::tag::{ObjectFlags, TypeTag};
use crate::value::{Number, Value};

// -----------------------------------------------------------------------------
// Object

/// The universal handle for any serializable value.
///
/// An `Object` is a cheap shared handle: cloning it shares the underlying
/// value, and the value is released exactly once, when the last handle
/// drops. The variant (the [`TypeTag`]) is fixed at construction and never
/// changes; codecs are looked up by it.
///
/// Objects are deliberately not internally synchronized (`Rc` + `RefCell`,
/// hence `!Send`). An object graph belongs to one thread or behind one
/// lock; the surrounding platform supplies atomics for callers who need
/// cross-thread sharing.
///
/// # Read-only objects
///
/// [`freeze`](Self::freeze) disables all content mutation: `clear` becomes
/// a no-op and `value_mut` plus the container helpers return
/// [`Error::ReadOnly`]. Cloning the handle stays allowed (it copies the
/// handle, not the object), and the private slot stays writable since it
/// is caller metadata, not content.
///
/// # Examples
///
/// ```
/// use obx_object::Object;
///
/// let array = Object::array();
/// array.append(Object::number(1u8)).unwrap();
/// array.append(Object::string("two")).unwrap();
///
/// assert_eq!(array.len(), 2);
/// assert_eq!(array.at(1).unwrap().as_str().as_deref(), Some("two"));
/// ```
pub struct Object {
    inner: Rc<ObjectInner>,
}

struct ObjectInner {
    ty: TypeTag,
    flags: Cell<ObjectFlags>,
    value: RefCell<Value>,
    /// Opaque caller-attached slot; a weak back-reference point for
    /// embedding contexts. The runtime never interprets it.
    private: RefCell<Option<Rc<dyn Any>>>,
}

impl Object {
    /// Wrap a value in a fresh object with a reference count of 1.
    pub fn new(value: Value) -> Self {
        Self::with_flags(value, ObjectFlags::empty())
    }

    /// Wrap a value with explicit flags.
    pub fn with_flags(value: Value, flags: ObjectFlags) -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                ty: value.type_tag(),
                flags: Cell::new(flags),
                value: RefCell::new(value),
                private: RefCell::new(None),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Variant constructors

    pub fn bool(value: bool) -> Self {
        Self::new(Value::Bool(value))
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Self::new(Value::Number(value.into()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(Value::String(value.into()))
    }

    /// A date from UTC seconds since the epoch.
    pub fn date(epoch_seconds: i64) -> Self {
        Self::new(Value::Date(epoch_seconds))
    }

    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Value::Blob(bytes.into()))
    }

    /// An empty array.
    pub fn array() -> Self {
        Self::new(Value::Array(Vec::new()))
    }

    /// An empty dictionary.
    pub fn dict() -> Self {
        Self::new(Value::Dict(crate::hash::HashMap::default()))
    }

    // ------------------------------------------------------------------
    // Runtime operations

    /// The tag this object dispatches under; stable for its lifetime.
    pub fn type_tag(&self) -> TypeTag {
        self.inner.ty
    }

    pub fn flags(&self) -> ObjectFlags {
        self.inner.flags.get()
    }

    pub fn is_readonly(&self) -> bool {
        self.flags().contains(ObjectFlags::READONLY)
    }

    /// Permanently disable content mutation on this object.
    pub fn freeze(&self) {
        self.inner.flags.set(self.flags() | ObjectFlags::READONLY);
    }

    /// The number of live handles to this object.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Borrow the value.
    pub fn value(&self) -> Ref<'_, Value> {
        self.inner.value.borrow()
    }

    /// Mutably borrow the value; rejected for read-only objects.
    pub fn value_mut(&self) -> Result<RefMut<'_, Value>, Error> {
        if self.is_readonly() {
            return Err(Error::ReadOnly);
        }
        Ok(self.inner.value.borrow_mut())
    }

    /// Reset the value to its variant's empty value. No-op when the
    /// object is read-only; the variant itself never changes.
    pub fn clear(&self) {
        if let Ok(mut value) = self.value_mut() {
            value.clear();
        }
    }

    /// Copy per the variant's own policy: scalars deeply, containers
    /// shallowly (children stay shared). Fails with
    /// [`Error::UnsupportedOperation`] when a custom variant registered no
    /// copy support. The copy is a fresh, mutable object.
    pub fn try_copy(&self) -> Result<Self, Error> {
        Ok(Self::new(self.value().try_copy()?))
    }

    /// Take the value out of a solely-owned object, destroying it now.
    ///
    /// Requires this handle to be the only one (the historical
    /// "reference count must be 1" destroy path) and the object to be
    /// mutable; otherwise the handle comes back unchanged as `Err`.
    pub fn try_into_value(self) -> Result<Value, Self> {
        if self.is_readonly() {
            return Err(self);
        }
        match Rc::try_unwrap(self.inner) {
            Ok(inner) => Ok(inner.value.into_inner()),
            Err(inner) => Err(Self { inner }),
        }
    }

    /// Attach caller metadata. Deliberately unconditional: the slot is
    /// not object content, so READONLY is not consulted.
    pub fn set_private(&self, private: Option<Rc<dyn Any>>) {
        *self.inner.private.borrow_mut() = private;
    }

    /// The caller-attached metadata, if any.
    pub fn private(&self) -> Option<Rc<dyn Any>> {
        self.inner.private.borrow().clone()
    }

    // ------------------------------------------------------------------
    // Typed accessors

    pub fn as_bool(&self) -> Option<bool> {
        match &*self.value() {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match &*self.value() {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<i64> {
        match &*self.value() {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<Ref<'_, str>> {
        Ref::filter_map(self.value(), |v| match v {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        })
        .ok()
    }

    pub fn as_blob(&self) -> Option<Ref<'_, [u8]>> {
        Ref::filter_map(self.value(), |v| match v {
            Value::Blob(b) => Some(b.as_slice()),
            _ => None,
        })
        .ok()
    }

    // ------------------------------------------------------------------
    // Container helpers

    /// Element or entry count for containers, byte length for strings and
    /// blobs, 0 for the other scalars.
    pub fn len(&self) -> usize {
        match &*self.value() {
            Value::String(s) => s.len(),
            Value::Blob(b) => b.len(),
            Value::Array(items) => items.len(),
            Value::Dict(entries) => entries.len(),
            _ => 0,
        }
    }

    /// Append to an array object.
    pub fn append(&self, item: Object) -> Result<(), Error> {
        match &mut *self.value_mut()? {
            Value::Array(items) => {
                items.push(item);
                Ok(())
            }
            _ => Err(Error::UnsupportedOperation("append on a non-array object")),
        }
    }

    /// Insert into a dictionary object, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, item: Object) -> Result<(), Error> {
        match &mut *self.value_mut()? {
            Value::Dict(entries) => {
                entries.insert(key.into(), item);
                Ok(())
            }
            _ => Err(Error::UnsupportedOperation(
                "insert on a non-dictionary object",
            )),
        }
    }

    /// Remove a dictionary entry, returning the removed handle.
    pub fn remove(&self, key: &str) -> Result<Option<Object>, Error> {
        match &mut *self.value_mut()? {
            Value::Dict(entries) => Ok(entries.remove(key)),
            _ => Err(Error::UnsupportedOperation(
                "remove on a non-dictionary object",
            )),
        }
    }

    /// Dictionary lookup; the returned handle shares the child.
    pub fn get(&self, key: &str) -> Option<Object> {
        match &*self.value() {
            Value::Dict(entries) => entries.get(key).cloned(),
            _ => None,
        }
    }

    /// Array indexing; the returned handle shares the child.
    pub fn at(&self, index: usize) -> Option<Object> {
        match &*self.value() {
            Value::Array(items) => items.get(index).cloned(),
            _ => None,
        }
    }
}

impl Clone for Object {
    /// Share the object: another live handle, same value.
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl PartialEq for Object {
    /// Deep structural equality on the values, not handle identity.
    fn eq(&self, other: &Self) -> bool {
        *self.value() == *other.value()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.value.try_borrow() {
            Ok(value) => f
                .debug_struct("Object")
                .field("type", &self.inner.ty)
                .field("value", &*value)
                .finish(),
            Err(_) => f
                .debug_struct("Object")
                .field("type", &self.inner.ty)
                .finish_non_exhaustive(),
        }
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_object_has_one_handle() {
        let obj = Object::bool(true);
        assert_eq!(obj.ref_count(), 1);
        assert_eq!(obj.type_tag(), TypeTag::BOOLEAN);
    }

    #[test]
    fn clone_then_drop_restores_the_count() {
        let obj = Object::number(9u32);
        let alias = obj.clone();
        assert_eq!(obj.ref_count(), 2);
        drop(alias);
        assert_eq!(obj.ref_count(), 1);
        // Still alive and intact.
        assert_eq!(obj.as_number(), Some(Number::U32(9)));
    }

    #[test]
    fn children_are_released_with_the_last_handle() {
        let child = Object::string("payload");
        let parent = Object::array();
        parent.append(child.clone()).unwrap();
        assert_eq!(child.ref_count(), 2);
        drop(parent);
        assert_eq!(child.ref_count(), 1);
    }

    #[test]
    fn try_into_value_requires_sole_ownership() {
        let obj = Object::string("x");
        let alias = obj.clone();
        let obj = obj.try_into_value().unwrap_err();
        drop(alias);
        assert_eq!(obj.try_into_value().unwrap(), Value::String("x".into()));
    }

    #[test]
    fn frozen_objects_reject_mutation() {
        let obj = Object::string("keep");
        obj.freeze();
        assert!(obj.is_readonly());

        obj.clear(); // no-op
        assert!(matches!(obj.value_mut(), Err(Error::ReadOnly)));
        assert_eq!(obj.as_str().as_deref(), Some("keep"));
        assert_eq!(obj.ref_count(), 1);
    }

    #[test]
    fn frozen_objects_keep_a_writable_private_slot() {
        let obj = Object::bool(false);
        obj.freeze();
        obj.set_private(Some(Rc::new(7u32)));
        let private = obj.private().unwrap();
        assert_eq!(private.downcast_ref::<u32>(), Some(&7));
    }

    #[test]
    fn frozen_objects_never_yield_their_value() {
        let obj = Object::bool(true);
        obj.freeze();
        assert!(obj.try_into_value().is_err());
    }

    #[test]
    fn clear_is_variant_stable() {
        let obj = Object::number(123u16);
        obj.clear();
        assert_eq!(obj.as_number(), Some(Number::U16(0)));
        assert_eq!(obj.type_tag(), TypeTag::NUMBER);
    }

    #[test]
    fn copy_of_container_is_shallow() {
        let child = Object::number(1u8);
        let array = Object::array();
        array.append(child.clone()).unwrap();

        let copy = array.try_copy().unwrap();
        assert_eq!(child.ref_count(), 3); // original array + copy + local
        assert_eq!(copy, array);
        assert!(!copy.is_readonly());
    }

    #[test]
    fn copy_of_scalar_is_independent() {
        let a = Object::string("a");
        let b = a.try_copy().unwrap();
        b.value_mut().map(|mut v| v.clear()).unwrap();
        assert_eq!(a.as_str().as_deref(), Some("a"));
        assert_eq!(b.as_str().as_deref(), Some(""));
    }

    #[test]
    fn dictionary_helpers() {
        let dict = Object::dict();
        dict.insert("k", Object::bool(true)).unwrap();
        dict.insert("k", Object::bool(false)).unwrap(); // replace
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get("k").unwrap().as_bool(), Some(false));
        assert!(dict.remove("k").unwrap().is_some());
        assert_eq!(dict.len(), 0);
        assert!(dict.append(Object::bool(true)).is_err());
    }

    #[test]
    fn structural_equality_ignores_handle_identity() {
        let a = Object::array();
        a.append(Object::number(1i64)).unwrap();
        let b = Object::array();
        b.append(Object::number(1u8)).unwrap();
        assert_eq!(a, b);
    }
}
