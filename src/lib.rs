// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # win32json
//!
//! Turns the Win32 API description shipped as `Windows.Win32.winmd` (an ECMA-335 metadata
//! file) into one JSON document per API group, e.g. `UI.WindowsAndMessaging.json`, listing its
//! constants, types, functions and unicode aliases.
//!
//! The metadata is not taken at face value. Every definition is matched against the handful of
//! shapes win32metadata produces (native typedef, enum, struct, union, COM interface, class id,
//! function pointer) and anything that fits none of them stops the run with
//! [`Error::DataViolation`]. Known gaps in the metadata are filled by a patch table, and a patch
//! that no longer applies stops the run with [`Error::PatchViolation`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use win32json::prelude::*;
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! let summary = Generator::new(&winmd, GeneratorOptions::default()).write("out".as_ref())?;
//! println!("{} documents", summary.files.len());
//! # Ok::<(), win32json::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - Reading the winmd: PE container, streams, tables, signatures, custom
//!   attribute blobs, exposed through the [`metadata::MetadataOracle`] trait
//! - [`attributes`] - Decoding custom attributes into the closed [`attributes::Attribute`] set
//! - [`typesystem`] - The type graph, grouped by API, and type reference resolution
//! - [`classify`] - Classification and validation into output records
//! - [`patch`] - Corrections and the stale patch check
//! - [`emit`] - JSON documents
//! - [`generator`] - One run end to end
//!
//! ## Error Handling
//!
//! ```rust,no_run
//! use win32json::{metadata::winmd::WinMd, Error};
//!
//! match WinMd::from_file("Windows.Win32.winmd".as_ref()) {
//!     Ok(_) => println!("loaded"),
//!     Err(Error::NotSupported) => println!("not a winmd"),
//!     Err(Error::Malformed { message, .. }) => println!("malformed: {}", message),
//!     Err(e) => println!("error: {}", e),
//! }
//! ```
//!
//! ## Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run winmd --release
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use win32json::prelude::*;
///
/// let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
/// let graph = GraphBuilder::new(&winmd).build()?;
/// println!("{} API groups", graph.groups().count());
/// # Ok::<(), win32json::Error>(())
/// ```
pub mod prelude;

/// Reading winmd files, based on ECMA-335
///
/// Only the part of the format a winmd uses is implemented: the metadata root, the `#~`,
/// `#Strings`, `#Blob` and `#GUID` streams, the tables win32metadata populates, method and field
/// signatures, constants and custom attribute blobs. [`metadata::winmd::WinMd`] parses a file,
/// [`metadata::builder::MetadataBuilder`] assembles the same data in memory, and both implement
/// [`metadata::MetadataOracle`], which is all the rest of the crate sees.
///
/// # Examples
///
/// ```rust,no_run
/// use win32json::metadata::{winmd::WinMd, MetadataOracle};
///
/// let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
/// for token in winmd.type_defs().into_iter().take(5) {
///     let def = winmd.type_def(token)?;
///     println!("{}.{}", def.namespace, def.name);
/// }
/// # Ok::<(), win32json::Error>(())
/// ```
pub mod metadata;

pub mod attributes;
pub mod classify;
pub mod emit;
pub mod generator;
pub mod patch;
pub mod typesystem;

/// `win32json` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `win32json` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use win32json::{generator::{Generator, GeneratorOptions}, metadata::winmd::WinMd, Error};
///
/// let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
/// match Generator::new(&winmd, GeneratorOptions::default()).generate() {
///     Ok(generated) => println!("{} API groups", generated.apis.len()),
///     Err(Error::PatchViolation { message, .. }) => println!("stale patch: {}", message),
///     Err(e) => println!("error: {}", e),
/// }
/// # Ok::<(), win32json::Error>(())
/// ```
pub use error::Error;

/// Low-level byte parsing, used by the table and blob readers.
pub use file::{parser::Parser, File};
