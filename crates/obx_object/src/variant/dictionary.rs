//! The dictionary variant.
//!
//! Binary form: the frame tag carries the entry count; each entry is a
//! string frame (the key) immediately followed by the value's frame. XML
//! form is plist-shaped: `<dict><key>name</key><value…/>…</dict>`, with
//! `<key>` handled by this codec, not registered as a variant element.

use alloc::sync::Arc;

use obx_stream::{Sink, Source};
use obx_xml::{XmlEvent, XmlReader, XmlWriter};

use crate::codec::{BinCodec, XmlCodec, bin, xml};
use crate::error::Error;
use crate::hash::HashMap;
use crate::object::Object;
use crate::registry::CodecRegistry;
use crate::tag::TypeTag;
use crate::value::Value;

pub struct DictionaryCodec;

impl BinCodec for DictionaryCodec {
    fn read_bin(
        &self,
        src: &mut dyn Source,
        registry: &CodecRegistry,
        _tag: TypeTag,
        size: usize,
    ) -> Result<Object, Error> {
        let mut entries = HashMap::default();
        for _ in 0..size {
            let (tag, key_len) = bin::read_tag(src)?
                .ok_or(Error::MalformedPayload("dictionary"))?;
            if tag != TypeTag::STRING {
                return Err(Error::MalformedPayload("dictionary"));
            }
            let key = String::from_utf8(bin::read_payload(src, key_len)?)
                .map_err(|_| Error::MalformedPayload("dictionary"))?;
            let value = bin::read_child(registry, src)?
                .ok_or(Error::MalformedPayload("dictionary"))?;
            entries.insert(key, value);
        }
        Ok(Object::new(Value::Dict(entries)))
    }

    fn write_bin(
        &self,
        object: &Object,
        sink: &mut dyn Sink,
        registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object.value();
        let Value::Dict(entries) = &*value else {
            return Err(Error::UnsupportedOperation(
                "dictionary codec on non-dictionary",
            ));
        };
        bin::write_tag(sink, TypeTag::DICTIONARY, entries.len())?;
        for (key, child) in entries {
            bin::write_tag(sink, TypeTag::STRING, key.len())?;
            sink.write_all(key.as_bytes())?;
            bin::write_child(registry, child, sink)?;
        }
        Ok(())
    }
}

impl XmlCodec for DictionaryCodec {
    fn read_xml(
        &self,
        reader: &mut XmlReader<'_>,
        event: &XmlEvent,
        registry: &CodecRegistry,
    ) -> Result<Object, Error> {
        let mut entries = HashMap::default();
        if matches!(event, XmlEvent::ElementBeg(_)) {
            let mut pending_key: Option<String> = None;
            loop {
                let child_event = reader.next_event()?;
                match &child_event {
                    XmlEvent::Text(_) => {}
                    XmlEvent::ElementEnd(_) => {
                        if pending_key.is_some() {
                            // A key with no value before the close.
                            return Err(Error::MalformedPayload("dictionary"));
                        }
                        break;
                    }
                    XmlEvent::Done => {
                        return Err(Error::Xml(obx_xml::XmlError::UnexpectedEof));
                    }
                    XmlEvent::ElementBeg(name) | XmlEvent::ElementEmpty(name) => {
                        if name == "key" {
                            if pending_key.is_some() {
                                return Err(Error::MalformedPayload("dictionary"));
                            }
                            pending_key = Some(xml::read_leaf_text(
                                reader,
                                &child_event,
                                "dictionary",
                            )?);
                        } else {
                            let key = pending_key
                                .take()
                                .ok_or(Error::MalformedPayload("dictionary"))?;
                            let value =
                                xml::read_child(registry, reader, &child_event)?;
                            entries.insert(key, value);
                        }
                    }
                }
            }
        }
        Ok(Object::new(Value::Dict(entries)))
    }

    fn write_xml(
        &self,
        object: &Object,
        writer: &mut XmlWriter<'_>,
        registry: &CodecRegistry,
    ) -> Result<(), Error> {
        let value = object.value();
        let Value::Dict(entries) = &*value else {
            return Err(Error::UnsupportedOperation(
                "dictionary codec on non-dictionary",
            ));
        };
        if entries.is_empty() {
            writer.empty("dict")?;
            return Ok(());
        }
        writer.open("dict")?;
        for (key, child) in entries {
            writer.leaf("key", key)?;
            xml::write_child(registry, child, writer)?;
        }
        writer.close("dict")?;
        Ok(())
    }
}

pub fn register(registry: &mut CodecRegistry) -> Result<(), Error> {
    let codec = Arc::new(DictionaryCodec);
    registry.set_xml_reader("dict", codec.clone())?;
    registry.set_xml_writer(TypeTag::DICTIONARY, codec.clone())?;
    registry.set_bin_reader(TypeTag::DICTIONARY, codec.clone())?;
    registry.set_bin_writer(TypeTag::DICTIONARY, codec)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use obx_stream::{Reader, Writer};

    use super::*;

    #[test]
    fn xml_keys_pair_with_values() {
        let registry = CodecRegistry::new();
        let doc = "<dict>\n\t<key>name</key>\n\t<string>obx</string>\n\t<key>ok</key>\n\t<true/>\n</dict>";
        let mut src = Reader::from_slice(doc.as_bytes());
        let dict = xml::read(&registry, &mut src).unwrap();

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("name").unwrap().as_str().as_deref(), Some("obx"));
        assert_eq!(dict.get("ok").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn dangling_key_is_malformed() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<dict><key>orphan</key></dict>");
        assert!(matches!(
            xml::read(&registry, &mut src),
            Err(Error::MalformedPayload("dictionary"))
        ));
    }

    #[test]
    fn value_without_key_is_malformed() {
        let registry = CodecRegistry::new();
        let mut src = Reader::from_slice(b"<dict><true/></dict>");
        assert!(matches!(
            xml::read(&registry, &mut src),
            Err(Error::MalformedPayload("dictionary"))
        ));
    }

    #[test]
    fn binary_entries_round_trip() {
        let registry = CodecRegistry::new();
        let dict = Object::dict();
        dict.insert("empty", Object::dict()).unwrap();
        dict.insert("blob", Object::blob(vec![1, 2, 3])).unwrap();
        dict.insert("", Object::string("empty key")).unwrap();

        let mut sink = Writer::to_vec();
        bin::write(&registry, &dict, &mut sink).unwrap();
        let bytes = sink.into_vec();

        let mut src = Reader::from_slice(&bytes);
        let back = bin::read(&registry, &mut src).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn non_string_key_frame_is_malformed() {
        let registry = CodecRegistry::new();
        let mut sink = Writer::to_vec();
        bin::write_tag(&mut sink, TypeTag::DICTIONARY, 1).unwrap();
        // A boolean frame where the key's string frame belongs.
        bin::write_child(&registry, &Object::bool(true), &mut sink).unwrap();
        bin::write_child(&registry, &Object::bool(true), &mut sink).unwrap();
        let bytes = sink.into_vec();

        let mut src = Reader::from_slice(&bytes);
        assert!(matches!(
            bin::read_child(&registry, &mut src),
            Err(Error::MalformedPayload("dictionary"))
        ));
    }
}
