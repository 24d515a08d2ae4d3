//! Classification of the type graph into output records.
//!
//! Every top-level type becomes exactly one [`TypeRecord`] whose [`TypeKind`] is picked from its
//! base type and attributes, every field of an `Apis` type a [`ConstantRecord`], every method of
//! an `Apis` type a [`FunctionRecord`]. While picking a shape the classifier checks that the
//! definition looks the way that shape always looks in a winmd; anything unexpected is a
//! [`crate::Error::DataViolation`] rather than a best guess.
//!
//! Corrections from the [`PatchOverlay`](crate::patch::PatchOverlay) are looked up as each
//! definition is visited, which is what the stale-patch check counts.
//!
//! # Examples
//!
//! ```rust,no_run
//! use win32json::classify::Classifier;
//! use win32json::metadata::winmd::WinMd;
//! use win32json::patch::{PatchConfig, PatchOverlay};
//! use win32json::typesystem::GraphBuilder;
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! let graph = GraphBuilder::new(&winmd).build()?;
//! let overlay = PatchOverlay::new(&PatchConfig::win32())?;
//! let mut counters = overlay.counters();
//!
//! let classifier = Classifier::new(&winmd, &graph);
//! let foundation = graph.group("Foundation").unwrap();
//! let records = classifier.classify_group(foundation, &overlay, &mut counters)?;
//! println!("{} types", records.types.len());
//! # Ok::<(), win32json::Error>(())
//! ```

mod constants;
mod functions;
mod records;
mod types;

use std::collections::{BTreeMap, HashSet};

use log::debug;

pub use records::{
    ApiRecords, Attr, ConstantRecord, Detail, EnumValue, FieldRecord, FunctionRecord, Marker,
    ParamRecord, TypeKind, TypeRecord,
};

use crate::{
    attributes::Architectures,
    metadata::MetadataOracle,
    patch::{PatchCounters, PatchOverlay},
    typesystem::{ApiGroup, TypeGraph, TypeResolver},
    Result,
};

/// Turns the entities of a [`TypeGraph`] into records.
pub struct Classifier<'a> {
    oracle: &'a dyn MetadataOracle,
    graph: &'a TypeGraph,
    resolver: TypeResolver<'a>,
}

impl<'a> Classifier<'a> {
    /// A classifier over `graph`, reading members from `oracle`
    #[must_use]
    pub fn new(oracle: &'a dyn MetadataOracle, graph: &'a TypeGraph) -> Self {
        Classifier {
            oracle,
            graph,
            resolver: TypeResolver::new(graph, oracle),
        }
    }

    /// Classify the constants, types and functions of `group`
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] for definitions that fit no shape or carry
    /// inapplicable attributes, and [`crate::Error::PatchViolation`] for corrections that
    /// contradict the metadata
    pub fn classify_group(
        &self,
        group: &ApiGroup,
        overlay: &PatchOverlay,
        counters: &mut PatchCounters,
    ) -> Result<ApiRecords> {
        let api = overlay.api(group.name(), counters);
        let mut records = ApiRecords::default();

        let mut seen = HashSet::new();
        for token in group.constants() {
            let field = self.oracle.field(*token)?;
            let patch = api.constant(&field.name, counters);
            if !seen.insert(field.name.clone()) {
                if patch.accept_duplicate(counters) {
                    debug!("dropping second definition of {}.{}", group.name(), field.name);
                    continue;
                }
                return Err(data_violation!(
                    "constant '{}' is defined twice in {}",
                    field.name,
                    group.namespace()
                ));
            }
            records.constants.push(self.constant(&field)?);
        }

        for id in group.types() {
            let entity = self.graph.entity(*id);
            let patch = api.ty(&entity.name, counters);
            if patch.remove {
                debug!("removing {}", entity.fqn);
                continue;
            }
            records.types.push(self.classify_type(*id, patch, counters)?);
        }

        for token in group.functions() {
            let method = self.oracle.method(*token)?;
            let patch = api.func(&method.name, counters);
            records.functions.push(self.free_function(&method, patch, counters)?);
        }

        check_duplicates(&records.types, |record| (record.name.as_str(), record.architectures))?;
        check_duplicates(&records.functions, |record| {
            (record.name.as_str(), record.architectures)
        })?;
        Ok(records)
    }
}

/// Records sharing a name must either be per-architecture variants or identical
fn check_duplicates<T: PartialEq>(
    records: &[T],
    key: impl Fn(&T) -> (&str, Architectures),
) -> Result<()> {
    let mut by_name: BTreeMap<&str, Vec<(Architectures, &T)>> = BTreeMap::new();
    for record in records {
        let (name, architectures) = key(record);
        by_name.entry(name).or_default().push((architectures, record));
    }

    for (name, definitions) in by_name {
        if definitions.len() < 2 {
            continue;
        }

        let mut covered = Architectures::empty();
        let mut disjoint = true;
        for (architectures, _) in &definitions {
            if architectures.is_empty() || covered.intersects(*architectures) {
                disjoint = false;
            }
            covered |= *architectures;
        }

        let (_, first) = definitions[0];
        let identical = definitions.iter().all(|(_, record)| *record == first);
        ensure_data!(
            disjoint || identical,
            "'{}' is defined {} times with overlapping architectures and different shapes",
            name,
            definitions.len()
        );
    }

    Ok(())
}
