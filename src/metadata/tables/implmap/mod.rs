//! `ImplMap` table (0x1C), P/Invoke import information.
//!
//! Every free function of a winmd has exactly one row here naming its DLL and entry point.
//!
//! # Reference
//! - [ECMA-335 II.22.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;
mod reader;

pub use raw::*;
