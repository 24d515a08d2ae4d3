//! Winmd metadata reading.
//!
//! This module contains everything needed to get from the bytes of a `.winmd` file to the
//! definitions the generator works on. The lower layers follow ECMA-335 closely (root, streams,
//! tables, signatures, attribute blobs), the [`MetadataOracle`] trait on top is the only surface
//! the generator core sees.
//!
//! Two oracles exist:
//!
//! - [`WinMd`](winmd::WinMd) reads a real winmd file
//! - [`MetadataBuilder`](builder::MetadataBuilder) assembles definitions in memory, used by tests
//!   and benchmarks
//!
//! # Examples
//!
//! ```rust,no_run
//! use win32json::metadata::{winmd::WinMd, MetadataOracle};
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! for token in winmd.type_defs() {
//!     let type_def = winmd.type_def(token)?;
//!     println!("{}.{}", type_def.namespace, type_def.name);
//! }
//! # Ok::<(), win32json::Error>(())
//! ```

/// In-memory metadata for tests and benchmarks
pub mod builder;
/// Values of the `Constant` table
pub mod constants;
/// Implementation of the Header of CIL
pub mod cor20header;
/// Implementation of custom attribute blob parsing
pub mod customattributes;
/// Flags of definitions, members and imports
pub mod flags;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method and field signatures
pub mod signatures;
/// Implementation of all metadata streams (tables, heaps, etc.)
pub mod streams;
/// Implementation of the metadata tables a winmd uses
pub mod tables;
/// Commonly used metadata token type
pub mod token;
/// Reader for `.winmd` files
pub mod winmd;

mod oracle;

pub use oracle::{
    FieldInfo, ImportInfo, MetadataOracle, MethodInfo, ParamInfo, ResolutionScope, TypeDefInfo,
    TypeLayout, TypeRefInfo,
};
