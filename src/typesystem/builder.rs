//! Two-pass construction of the [`TypeGraph`].
//!
//! The first pass places every top-level definition and sets nested ones aside. The second pass
//! scans the nested definitions repeatedly, placing each one whose declaring type has been
//! placed, until none are left. A scan that places nothing means the declaring-type references
//! are broken or cyclic.

use std::collections::HashSet;

use log::{debug, info};

use crate::{
    attributes::{decode_attributes, Attribute, METADATA_NAMESPACE},
    metadata::{tables::TableId, token::Token, MetadataOracle, TypeDefInfo},
    typesystem::{
        registry::{BaseType, TypeEntity, TypeGraph, TypeId, WIN32_NAMESPACE_PREFIX},
        TargetKind,
    },
    Result,
};

/// Name of the type that carries a namespace's free constants and functions
pub const SENTINEL_TYPE_NAME: &str = "Apis";

/// Builds a [`TypeGraph`] from a metadata oracle.
///
/// ```rust
/// use win32json::metadata::{builder::MetadataBuilder, flags::TypeAttributes, ResolutionScope};
/// use win32json::typesystem::GraphBuilder;
///
/// let mut metadata = MetadataBuilder::new();
/// let value_type = metadata.add_type_ref(
///     "System",
///     "ValueType",
///     ResolutionScope::AssemblyRef("netstandard".into()),
/// );
/// metadata.add_type_def("", "<Module>", TypeAttributes::empty(), None);
/// metadata.add_type_def(
///     "Windows.Win32.Foundation",
///     "POINT",
///     TypeAttributes::PUBLIC | TypeAttributes::SEQUENTIAL_LAYOUT | TypeAttributes::SEALED,
///     Some(value_type),
/// );
///
/// let graph = GraphBuilder::new(&metadata).build()?;
/// let group = graph.group("Foundation").unwrap();
/// assert_eq!(graph.entity(group.lookup("POINT")[0]).fqn, "Windows.Win32.Foundation.POINT");
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct GraphBuilder<'a> {
    oracle: &'a dyn MetadataOracle,
    skipped_namespaces: HashSet<String>,
}

impl<'a> GraphBuilder<'a> {
    /// A builder that skips the attribute classes in the metadata-support namespace
    #[must_use]
    pub fn new(oracle: &'a dyn MetadataOracle) -> Self {
        let mut skipped_namespaces = HashSet::new();
        skipped_namespaces.insert(METADATA_NAMESPACE.to_string());

        GraphBuilder {
            oracle,
            skipped_namespaces,
        }
    }

    /// Leave out every definition in `namespace`, including its nested types
    #[must_use]
    pub fn skip_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.skipped_namespaces.insert(namespace.into());
        self
    }

    /// Build the graph
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] if a definition lies outside the `Windows.Win32`
    /// namespace, a namespace has two `Apis` types, a base type is not a type reference, or
    /// declaring-type references never resolve; any oracle error is passed through
    pub fn build(self) -> Result<TypeGraph> {
        let mut graph = TypeGraph::default();
        let mut skipped: HashSet<Token> = HashSet::new();
        let mut worklist: Vec<TypeDefInfo> = Vec::new();

        for token in self.oracle.type_defs() {
            let def = self.oracle.type_def(token)?;
            if def.enclosing.is_some() {
                worklist.push(def);
                continue;
            }

            if def.namespace.is_empty() {
                ensure_data!(
                    def.name == "<Module>",
                    "type {} has an empty namespace",
                    def.name
                );
                continue;
            }

            if self.skipped_namespaces.contains(&def.namespace) {
                skipped.insert(def.token);
                continue;
            }

            let Some(api_name) = def.namespace.strip_prefix(WIN32_NAMESPACE_PREFIX) else {
                return Err(data_violation!(
                    "unexpected namespace '{}', expected it to start with '{}'",
                    def.namespace,
                    WIN32_NAMESPACE_PREFIX
                ));
            };
            let api_name = api_name.to_string();

            let group = graph.group_mut(&api_name, &def.namespace);
            if def.name == SENTINEL_TYPE_NAME {
                group.attach_sentinel(&def)?;
                continue;
            }

            let fqn = format!("{}.{}", def.namespace, def.name);
            let entity = self.entity(def, api_name, fqn, Vec::new(), None)?;
            graph.add_top_level(entity)?;
        }

        info!(
            "placed {} top-level types in {} API groups, {} nested types pending",
            graph.len(),
            graph.groups().count(),
            worklist.len()
        );

        let mut pass = 0;
        while !worklist.is_empty() {
            pass += 1;
            let before = worklist.len();
            let mut remaining = Vec::new();

            for def in worklist {
                let Some(enclosing) = def.enclosing else {
                    return Err(invariant_violation!("{} is not nested", def.token));
                };

                if skipped.contains(&enclosing) {
                    skipped.insert(def.token);
                    continue;
                }

                match graph.get(enclosing) {
                    Some(parent) => self.place_nested(&mut graph, def, parent)?,
                    None => remaining.push(def),
                }
            }

            debug!("nested type pass {}: {} types left", pass, remaining.len());
            ensure_data!(
                remaining.len() < before,
                "{} nested types have declaring types that never resolve",
                remaining.len()
            );
            worklist = remaining;
        }

        Ok(graph)
    }

    fn place_nested(&self, graph: &mut TypeGraph, def: TypeDefInfo, parent: TypeId) -> Result<()> {
        ensure_data!(
            def.namespace.is_empty(),
            "nested type {} has namespace '{}'",
            def.name,
            def.namespace
        );

        let enclosing = graph.entity(parent);
        let fqn = format!("{}+{}", enclosing.fqn, def.name);
        let api_name = enclosing.api_name.clone();
        let mut parents = enclosing.parents.clone();
        parents.push(enclosing.name.clone());

        let entity = self.entity(def, api_name, fqn, parents, Some(parent))?;
        graph.add_nested(entity)?;
        Ok(())
    }

    fn base_type(&self, def: &TypeDefInfo) -> Result<BaseType> {
        let Some(extends) = def.extends else {
            return Ok(BaseType::None);
        };
        ensure_data!(
            extends.is_table(TableId::TypeRef),
            "base type of {} is {}, expected a type reference",
            def.name,
            extends
        );

        let base = self.oracle.type_ref(extends)?;
        Ok(BaseType::from_name(&base.namespace, &base.name))
    }

    fn entity(
        &self,
        def: TypeDefInfo,
        api_name: String,
        fqn: String,
        parents: Vec<String>,
        enclosing: Option<TypeId>,
    ) -> Result<TypeEntity> {
        let base = self.base_type(&def)?;
        let attributes = decode_attributes(self.oracle, &def.attributes)?;
        let is_native_typedef = base == BaseType::Enum
            || attributes
                .iter()
                .any(|attribute| *attribute == Attribute::NativeTypedef);
        let target_kind: TargetKind = base.target_kind();

        Ok(TypeEntity {
            name: def.name.clone(),
            fqn,
            api_name,
            base,
            is_native_typedef,
            target_kind,
            parents,
            enclosing,
            nested: Vec::new(),
            attributes,
            def,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        builder::MetadataBuilder,
        flags::{FieldAttributes, TypeAttributes},
        signatures::TypeSignature,
        ResolutionScope,
    };

    const STRUCT: TypeAttributes = TypeAttributes::PUBLIC
        .union(TypeAttributes::SEQUENTIAL_LAYOUT)
        .union(TypeAttributes::SEALED);
    const NESTED: TypeAttributes = TypeAttributes::NESTED_PUBLIC
        .union(TypeAttributes::SEQUENTIAL_LAYOUT)
        .union(TypeAttributes::SEALED);

    fn system(builder: &mut MetadataBuilder, name: &str) -> Token {
        builder.add_type_ref(
            "System",
            name,
            ResolutionScope::AssemblyRef("netstandard".to_string()),
        )
    }

    /// `<Module>`, an `Apis` type and `OUTER` with two levels of nesting declared out of order
    fn sample() -> (MetadataBuilder, Token, Token, Token) {
        let mut builder = MetadataBuilder::new();
        let value_type = system(&mut builder, "ValueType");
        builder.add_type_def("", "<Module>", TypeAttributes::empty(), None);
        let apis = builder.add_type_def(
            "Windows.Win32.Foundation",
            "Apis",
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT | TypeAttributes::SEALED,
            None,
        );
        builder.add_field(apis, "MAX_PATH", FieldAttributes::PUBLIC, TypeSignature::U4);

        let inner = builder.add_type_def("", "_Inner_e__Struct", NESTED, Some(value_type));
        let middle = builder.add_type_def("", "_Anonymous_e__Union", NESTED, Some(value_type));
        let outer =
            builder.add_type_def("Windows.Win32.Foundation", "OUTER", STRUCT, Some(value_type));
        builder.nest(inner, middle).unwrap();
        builder.nest(middle, outer).unwrap();
        (builder, outer, middle, inner)
    }

    #[test]
    fn nesting_resolves_out_of_order() {
        let (builder, outer, middle, inner) = sample();
        let graph = GraphBuilder::new(&builder).build().unwrap();

        assert_eq!(graph.len(), 3);
        let group = graph.group("Foundation").unwrap();
        assert_eq!(group.namespace(), "Windows.Win32.Foundation");
        assert_eq!(group.types().len(), 1);
        assert_eq!(group.constants().len(), 1);
        assert!(group.sentinel().is_some());

        let outer_id = graph.get(outer).unwrap();
        let middle_id = graph.get(middle).unwrap();
        let inner_id = graph.get(inner).unwrap();
        assert_eq!(graph.entity(outer_id).nested, vec![middle_id]);
        assert_eq!(graph.entity(middle_id).enclosing, Some(outer_id));

        let inner = graph.entity(inner_id);
        assert_eq!(
            inner.fqn,
            "Windows.Win32.Foundation.OUTER+_Anonymous_e__Union+_Inner_e__Struct"
        );
        assert_eq!(inner.parents, vec!["OUTER", "_Anonymous_e__Union"]);
        assert_eq!(inner.api_name, "Foundation");
        assert_eq!(graph.nested_by_name(middle_id, "_Inner_e__Struct"), Some(inner_id));
    }

    #[test]
    fn building_is_deterministic() {
        let (builder, ..) = sample();
        let first = GraphBuilder::new(&builder).build().unwrap();
        let second = GraphBuilder::new(&builder).build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn cycles_are_data_violations() {
        let mut builder = MetadataBuilder::new();
        let value_type = system(&mut builder, "ValueType");
        let a = builder.add_type_def("", "A", NESTED, Some(value_type));
        let b = builder.add_type_def("", "B", NESTED, Some(value_type));
        builder.nest(a, b).unwrap();
        builder.nest(b, a).unwrap();

        let error = GraphBuilder::new(&builder).build().unwrap_err();
        assert!(error.is_data_violation());
        assert!(error.to_string().contains("never resolve"));
    }

    #[test]
    fn target_kinds_and_typedefs() {
        let mut builder = MetadataBuilder::new();
        let enum_base = system(&mut builder, "Enum");
        let delegate = system(&mut builder, "MulticastDelegate");
        let kind = builder.add_type_def("Windows.Win32.Foo", "KIND", STRUCT, Some(enum_base));
        let callback = builder.add_type_def("Windows.Win32.Foo", "PFN", STRUCT, Some(delegate));
        let interface = builder.add_type_def(
            "Windows.Win32.Foo",
            "IFoo",
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        );

        let graph = GraphBuilder::new(&builder).build().unwrap();
        let entity = |token| graph.entity(graph.get(token).unwrap());
        assert!(entity(kind).is_native_typedef);
        assert_eq!(entity(kind).base, BaseType::Enum);
        assert_eq!(entity(callback).target_kind, TargetKind::FunctionPointer);
        assert_eq!(entity(interface).target_kind, TargetKind::Com);
        assert_eq!(entity(interface).base, BaseType::None);
    }

    #[test]
    fn structural_violations() {
        let mut builder = MetadataBuilder::new();
        builder.add_type_def("", "Stray", TypeAttributes::PUBLIC, None);
        assert!(GraphBuilder::new(&builder).build().unwrap_err().is_data_violation());

        let mut builder = MetadataBuilder::new();
        builder.add_type_def("Contoso.Widgets", "Widget", TypeAttributes::PUBLIC, None);
        assert!(GraphBuilder::new(&builder).build().unwrap_err().is_data_violation());

        let mut builder = MetadataBuilder::new();
        builder.add_type_def("Windows.Win32.Foo", "Apis", TypeAttributes::PUBLIC, None);
        builder.add_type_def("Windows.Win32.Foo", "Apis", TypeAttributes::PUBLIC, None);
        let error = GraphBuilder::new(&builder).build().unwrap_err();
        assert!(error.to_string().contains("second Apis"));
    }

    #[test]
    fn skipped_namespaces() {
        let mut builder = MetadataBuilder::new();
        let attribute = builder.add_type_def(
            METADATA_NAMESPACE,
            "NativeTypedefAttribute",
            TypeAttributes::PUBLIC,
            None,
        );
        let nested = builder.add_type_def("", "Helper", TypeAttributes::NESTED_PUBLIC, None);
        builder.nest(nested, attribute).unwrap();
        builder.add_type_def("Windows.Win32.Legacy", "IOld", TypeAttributes::PUBLIC, None);

        let graph = GraphBuilder::new(&builder)
            .skip_namespace("Windows.Win32.Legacy")
            .build()
            .unwrap();
        assert!(graph.is_empty());
        assert!(graph.get(nested).is_none());
    }
}
