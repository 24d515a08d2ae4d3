//! The type graph of a winmd.
//!
//! Every type definition outside the skipped namespaces becomes a [`TypeEntity`] in a
//! [`TypeGraph`]. Top-level types are grouped by namespace into [`ApiGroup`]s, one per generated
//! document, nested types hang off their enclosing type. Once built the graph is read-only; the
//! [`TypeResolver`] turns signature types and type references into the [`TypeRef`]s that appear
//! in the output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use win32json::metadata::winmd::WinMd;
//! use win32json::typesystem::GraphBuilder;
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! let graph = GraphBuilder::new(&winmd).build()?;
//! for group in graph.groups() {
//!     println!("{}: {} types", group.name(), group.types().len());
//! }
//! # Ok::<(), win32json::Error>(())
//! ```

mod builder;
mod registry;
mod resolver;
mod typeref;

pub use builder::{GraphBuilder, SENTINEL_TYPE_NAME};
pub use registry::{ApiGroup, BaseType, TypeEntity, TypeGraph, TypeId, WIN32_NAMESPACE_PREFIX};
pub use resolver::TypeResolver;
pub use typeref::{ArrayShape, NativeType, TargetKind, TypeRef};
