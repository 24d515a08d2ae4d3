//! Storage for the type graph.
//!
//! Entities live in one arena and are addressed by [`TypeId`]. Top-level entities are listed by
//! their [`ApiGroup`], nested entities by their enclosing entity. Both lists keep metadata order.

use std::collections::{BTreeMap, HashMap};

use crate::{
    attributes::Attribute,
    metadata::{token::Token, TypeDefInfo},
    typesystem::{TargetKind, TypeRef},
    Result,
};

/// Namespace prefix shared by every API group
pub const WIN32_NAMESPACE_PREFIX: &str = "Windows.Win32.";

/// Index of an entity in a [`TypeGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// Position in the arena
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The base type of a definition, which decides its shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseType {
    /// No base type, an interface
    None,
    /// `System.Enum`
    Enum,
    /// `System.ValueType`
    ValueType,
    /// `System.MulticastDelegate`
    MulticastDelegate,
    /// Anything else
    Other {
        /// Namespace of the base type
        namespace: String,
        /// Name of the base type
        name: String,
    },
}

impl BaseType {
    /// Classify a base type by its name
    #[must_use]
    pub fn from_name(namespace: &str, name: &str) -> Self {
        match (namespace, name) {
            ("System", "Enum") => BaseType::Enum,
            ("System", "ValueType") => BaseType::ValueType,
            ("System", "MulticastDelegate") => BaseType::MulticastDelegate,
            _ => BaseType::Other {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
        }
    }

    /// How references to a type with this base are used
    #[must_use]
    pub fn target_kind(&self) -> TargetKind {
        match self {
            BaseType::None => TargetKind::Com,
            BaseType::MulticastDelegate => TargetKind::FunctionPointer,
            _ => TargetKind::Default,
        }
    }
}

/// One type definition placed in the graph
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntity {
    /// Simple name
    pub name: String,
    /// `Namespace.Name` for top-level types, `Enclosing+Name` for nested ones
    pub fqn: String,
    /// API group, the namespace without [`WIN32_NAMESPACE_PREFIX`]
    pub api_name: String,
    /// Base type
    pub base: BaseType,
    /// Derived from an enum base or an explicit `NativeTypedef` attribute
    pub is_native_typedef: bool,
    /// How references to this type are used
    pub target_kind: TargetKind,
    /// Names of the enclosing types, outermost first
    pub parents: Vec<String>,
    /// The enclosing type
    pub enclosing: Option<TypeId>,
    /// Nested types in metadata order
    pub nested: Vec<TypeId>,
    /// Decoded custom attributes
    pub attributes: Vec<Attribute>,
    /// The definition
    pub def: TypeDefInfo,
}

impl TypeEntity {
    /// The `TypeDef` token
    #[must_use]
    pub fn token(&self) -> Token {
        self.def.token
    }

    /// `true` for nested types
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.enclosing.is_some()
    }

    /// The reference other definitions use for this type
    #[must_use]
    pub fn api_ref(&self) -> TypeRef {
        TypeRef::ApiRef {
            name: self.name.clone(),
            target_kind: self.target_kind,
            api: self.api_name.clone(),
            parents: self.parents.clone(),
        }
    }
}

/// All definitions of one namespace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiGroup {
    name: String,
    namespace: String,
    types: Vec<TypeId>,
    by_name: HashMap<String, Vec<TypeId>>,
    sentinel: Option<Token>,
    constants: Vec<Token>,
    functions: Vec<Token>,
}

impl ApiGroup {
    fn new(name: &str, namespace: &str) -> Self {
        ApiGroup {
            name: name.to_string(),
            namespace: namespace.to_string(),
            ..ApiGroup::default()
        }
    }

    /// Group name, e.g. `Foundation`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full namespace, e.g. `Windows.Win32.Foundation`
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Top-level types in metadata order
    #[must_use]
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    /// Every top-level type called `name`, usually one
    #[must_use]
    pub fn lookup(&self, name: &str) -> &[TypeId] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// The `Apis` type holding the free constants and functions, if any
    #[must_use]
    pub fn sentinel(&self) -> Option<Token> {
        self.sentinel
    }

    /// Fields of the `Apis` type
    #[must_use]
    pub fn constants(&self) -> &[Token] {
        &self.constants
    }

    /// Methods of the `Apis` type
    #[must_use]
    pub fn functions(&self) -> &[Token] {
        &self.functions
    }

    pub(crate) fn attach_sentinel(&mut self, def: &TypeDefInfo) -> Result<()> {
        if let Some(existing) = self.sentinel {
            return Err(data_violation!(
                "namespace {} has a second Apis type {} (first was {})",
                self.namespace,
                def.token,
                existing
            ));
        }

        self.sentinel = Some(def.token);
        self.constants.clone_from(&def.fields);
        self.functions.clone_from(&def.methods);
        Ok(())
    }
}

/// The resolved type graph of one winmd.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeGraph {
    entities: Vec<TypeEntity>,
    by_token: HashMap<Token, TypeId>,
    groups: BTreeMap<String, ApiGroup>,
}

impl TypeGraph {
    /// Number of entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// `true` if no type was placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// The entity `id`
    ///
    /// # Panics
    /// Panics if `id` was not handed out by this graph
    #[must_use]
    pub fn entity(&self, id: TypeId) -> &TypeEntity {
        &self.entities[id.0]
    }

    /// The entity of the definition `token`
    #[must_use]
    pub fn get(&self, token: Token) -> Option<TypeId> {
        self.by_token.get(&token).copied()
    }

    /// All entities with their ids, in creation order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeEntity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (TypeId(index), entity))
    }

    /// API groups, ordered by name
    pub fn groups(&self) -> impl Iterator<Item = &ApiGroup> {
        self.groups.values()
    }

    /// The API group `name`
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&ApiGroup> {
        self.groups.get(name)
    }

    /// The API group of a full namespace
    #[must_use]
    pub fn group_by_namespace(&self, namespace: &str) -> Option<&ApiGroup> {
        namespace
            .strip_prefix(WIN32_NAMESPACE_PREFIX)
            .and_then(|name| self.groups.get(name))
    }

    /// The nested type `name` of `parent`
    #[must_use]
    pub fn nested_by_name(&self, parent: TypeId, name: &str) -> Option<TypeId> {
        self.entity(parent)
            .nested
            .iter()
            .copied()
            .find(|nested| self.entity(*nested).name == name)
    }

    pub(crate) fn group_mut(&mut self, name: &str, namespace: &str) -> &mut ApiGroup {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| ApiGroup::new(name, namespace))
    }

    fn push(&mut self, entity: TypeEntity) -> Result<TypeId> {
        let id = TypeId(self.entities.len());
        if self.by_token.insert(entity.token(), id).is_some() {
            return Err(invariant_violation!("{} placed twice", entity.token()));
        }
        self.entities.push(entity);
        Ok(id)
    }

    pub(crate) fn add_top_level(&mut self, entity: TypeEntity) -> Result<TypeId> {
        if entity.is_nested() {
            return Err(invariant_violation!("{} is nested", entity.fqn));
        }

        let group = entity.api_name.clone();
        let name = entity.name.clone();
        let id = self.push(entity)?;

        let Some(group) = self.groups.get_mut(&group) else {
            return Err(invariant_violation!("API group {} does not exist", group));
        };
        group.types.push(id);
        group.by_name.entry(name).or_default().push(id);
        Ok(id)
    }

    pub(crate) fn add_nested(&mut self, entity: TypeEntity) -> Result<TypeId> {
        let Some(parent) = entity.enclosing else {
            return Err(invariant_violation!("{} is not nested", entity.fqn));
        };
        if self.nested_by_name(parent, &entity.name).is_some() {
            return Err(data_violation!(
                "nested type '{}' already exists in '{}'",
                entity.name,
                self.entity(parent).fqn
            ));
        }

        let id = self.push(entity)?;
        self.entities[parent.0].nested.push(id);
        Ok(id)
    }
}
