#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use obx_object as object;
pub use obx_stream as stream;
pub use obx_xml as xml;
