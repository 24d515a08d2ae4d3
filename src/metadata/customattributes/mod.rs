//! Custom attribute blobs (ECMA-335 II.23.3).
//!
//! A blob starts with the prolog `0x0001`, followed by one value per constructor parameter and
//! a `u16` count of named field or property arguments. Nothing in the blob says which type a
//! fixed argument has, that comes from the constructor signature. This module decodes blobs
//! into [`AttrArg`] lists; which argument types are acceptable is decided by an
//! [`AttrArgTypeProvider`] supplied by the caller.
//!
//! ```rust
//! use win32json::metadata::customattributes::{
//!     parse_custom_attribute_blob, AttrArgType, AttrArgTypeProvider, AttrValue, CtorParamType,
//! };
//!
//! struct OnlyStrings;
//!
//! impl AttrArgTypeProvider for OnlyStrings {
//!     fn primitive(&self, element_type: u8) -> win32json::Result<AttrArgType> {
//!         match element_type {
//!             0x0E => Ok(AttrArgType::Str),
//!             _ => Err(win32json::Error::NotSupported),
//!         }
//!     }
//!     fn system_type(&self) -> win32json::Result<AttrArgType> { Err(win32json::Error::NotSupported) }
//!     fn from_reference(&self, _: &str, _: &str) -> win32json::Result<AttrArgType> { Err(win32json::Error::NotSupported) }
//!     fn from_serialized_name(&self, _: &str) -> win32json::Result<AttrArgType> { Err(win32json::Error::NotSupported) }
//! }
//!
//! let blob = [0x01, 0x00, 0x02, b'h', b'i', 0x00, 0x00];
//! let (fixed, named) = parse_custom_attribute_blob(&blob, &[CtorParamType::Primitive(0x0E)], &OnlyStrings)?;
//! assert_eq!(fixed[0].value, AttrValue::Str(Some("hi".to_string())));
//! assert!(named.is_empty());
//! # Ok::<(), win32json::Error>(())
//! ```

mod encoder;
mod parser;
mod types;

pub use encoder::{encode_custom_attribute, NamedArgSpec};
pub use parser::{parse_custom_attribute_blob, CustomAttributeParser};
pub use types::*;
