//! `CustomAttribute` table (0x0C).
//!
//! Each row ties a constructor (`MethodDef` or `MemberRef`) and an argument blob to the entity
//! it decorates. Decoding the blob needs the constructor signature, see
//! [`crate::metadata::customattributes`].
//!
//! # Reference
//! - [ECMA-335 II.22.10](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
