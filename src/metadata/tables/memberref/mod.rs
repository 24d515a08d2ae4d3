//! `MemberRef` table (0x0A).
//!
//! A winmd only uses member references for attribute constructors of types that live in
//! another assembly or namespace.
//!
//! # Reference
//! - [ECMA-335 II.22.25](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
