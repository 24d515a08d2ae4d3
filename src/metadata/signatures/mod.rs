//! Signature blobs of fields, methods and attribute constructors (ECMA-335 II.23.2).
//!
//! The decoder understands the complete type grammar, including the parts a winmd must never
//! use (by-ref, generics, function pointers, `SZARRAY`). Rejecting those is left to the type
//! resolver, so that the error names the member that carries them.
//!
//! ```rust
//! use win32json::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! // void (int32, uint8*)
//! let signature = parse_method_signature(&[0x00, 0x02, 0x01, 0x08, 0x0F, 0x05])?;
//! assert!(signature.default);
//! assert_eq!(signature.params.len(), 2);
//! assert_eq!(signature.return_type.base, TypeSignature::Void);
//! # Ok::<(), win32json::Error>(())
//! ```

mod parser;
mod types;

pub use parser::*;
pub use types::*;

use crate::Result;

/// Element type constants of ECMA-335 II.23.1.16
#[allow(missing_docs)]
#[allow(non_snake_case)]
pub mod ELEMENT_TYPE {
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const PTR: u8 = 0x0F;
    pub const BYREF: u8 = 0x10;
    pub const VALUETYPE: u8 = 0x11;
    pub const CLASS: u8 = 0x12;
    pub const VAR: u8 = 0x13;
    pub const ARRAY: u8 = 0x14;
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    pub const I: u8 = 0x18;
    pub const U: u8 = 0x19;
    pub const FNPTR: u8 = 0x1B;
    pub const OBJECT: u8 = 0x1C;
    pub const SZARRAY: u8 = 0x1D;
    pub const MVAR: u8 = 0x1E;
    pub const CMOD_REQD: u8 = 0x1F;
    pub const CMOD_OPT: u8 = 0x20;
    pub const INTERNAL: u8 = 0x21;
    pub const MODIFIER: u8 = 0x40;
    pub const SENTINEL: u8 = 0x41;
    pub const PINNED: u8 = 0x45;
    /// `System.Type` in custom attribute blobs
    pub const SYSTEM_TYPE: u8 = 0x50;
    /// Boxed object in custom attribute blobs
    pub const BOXED: u8 = 0x51;
    /// Named field marker in custom attribute blobs
    pub const FIELD: u8 = 0x53;
    /// Named property marker in custom attribute blobs
    pub const PROPERTY: u8 = 0x54;
    /// Enum in custom attribute blobs
    pub const ENUM: u8 = 0x55;
}

/// Parse a method signature blob
///
/// # Errors
/// Returns an error if the blob is truncated or malformed
pub fn parse_method_signature(data: &[u8]) -> Result<SignatureMethod> {
    let mut parser = SignatureParser::new(data);
    parser.parse_method_signature()
}

/// Parse a field signature blob
///
/// # Errors
/// Returns an error if the blob is truncated, malformed, or not a field signature
pub fn parse_field_signature(data: &[u8]) -> Result<SignatureField> {
    let mut parser = SignatureParser::new(data);
    parser.parse_field_signature()
}

/// Parse a `TypeSpec` signature blob
///
/// # Errors
/// Returns an error if the blob is truncated or malformed
pub fn parse_type_spec_signature(data: &[u8]) -> Result<SignatureTypeSpec> {
    let mut parser = SignatureParser::new(data);
    parser.parse_type_spec_signature()
}
