//! Serde bridge: hand object graphs to any serde format.
//!
//! Only serialization is offered; deserializing into an object graph goes
//! through the wire formats, which carry the variant tags serde data
//! models erase. Custom variants have no serde mapping and report a
//! serializer error.

use serde_core::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::object::Object;
use crate::value::{Number, Value};

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Date(d) => serializer.serialize_i64(*d),
            Self::Blob(b) => serializer.serialize_bytes(b),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Custom(_) => Err(S::Error::custom(
                "custom variants have no serde representation",
            )),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::U8(v) => serializer.serialize_u8(v),
            Self::U16(v) => serializer.serialize_u16(v),
            Self::U32(v) => serializer.serialize_u32(v),
            Self::U64(v) => serializer.serialize_u64(v),
            Self::I8(v) => serializer.serialize_i8(v),
            Self::I16(v) => serializer.serialize_i16(v),
            Self::I32(v) => serializer.serialize_i32(v),
            Self::I64(v) => serializer.serialize_i64(v),
            Self::F32(v) => serializer.serialize_f32(v),
            Self::F64(v) => serializer.serialize_f64(v),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::object::Object;

    #[test]
    fn object_graphs_render_as_json() {
        let dict = Object::dict();
        dict.insert("a", Object::number(1u32)).unwrap();
        dict.insert("b", Object::bool(true)).unwrap();

        let array = Object::array();
        array.append(Object::string("x")).unwrap();
        array.append(Object::number(-2i8)).unwrap();
        dict.insert("items", array).unwrap();

        let rendered = serde_json::to_value(&dict).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({
                "a": 1,
                "b": true,
                "items": ["x", -2],
            })
        );
    }

    #[test]
    fn dates_render_as_epoch_seconds() {
        let date = Object::date(123);
        assert_eq!(serde_json::to_value(&date).unwrap(), serde_json::json!(123));
    }
}
