//! Resolution of signature types and type references against a finished [`TypeGraph`].
//!
//! Definition tokens map straight to their entity. Reference tokens are resolved by scope:
//! module-scoped references by namespace and name, type-scoped references by walking the chain of
//! enclosing references out to a module-scoped root and then back down through nested types, and
//! assembly-scoped references against the few external types a winmd is known to use.

use log::debug;

use crate::{
    metadata::{
        signatures::TypeSignature, tables::TableId, token::Token, MetadataOracle,
        ResolutionScope,
    },
    typesystem::{
        registry::{TypeGraph, TypeId},
        ArrayShape, NativeType, TypeRef,
    },
    Result,
};

/// External types that are referenced but defined in another winmd
const MISSING_CLR_TYPES: &[(&str, &str)] = &[("Windows.System", "DispatcherQueueController")];

/// Strip a `__<digits>` disambiguation suffix
fn strip_disambiguation(name: &str) -> Option<&str> {
    let (base, digits) = name.rsplit_once("__")?;
    (!base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .then_some(base)
}

/// Resolves types without mutating the graph.
pub struct TypeResolver<'a> {
    graph: &'a TypeGraph,
    oracle: &'a dyn MetadataOracle,
}

impl<'a> TypeResolver<'a> {
    /// A resolver over `graph`, reading references from `oracle`
    #[must_use]
    pub fn new(graph: &'a TypeGraph, oracle: &'a dyn MetadataOracle) -> Self {
        TypeResolver { graph, oracle }
    }

    /// The graph references resolve against
    #[must_use]
    pub fn graph(&self) -> &'a TypeGraph {
        self.graph
    }

    /// Convert a signature type
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] for signature forms a winmd does not use and for
    /// references that do not resolve
    pub fn signature(&self, signature: &TypeSignature) -> Result<TypeRef> {
        let native = match signature {
            TypeSignature::Void => NativeType::Void,
            TypeSignature::Boolean => NativeType::Boolean,
            TypeSignature::Char => NativeType::Char,
            TypeSignature::I1 => NativeType::SByte,
            TypeSignature::U1 => NativeType::Byte,
            TypeSignature::I2 => NativeType::Int16,
            TypeSignature::U2 => NativeType::UInt16,
            TypeSignature::I4 => NativeType::Int32,
            TypeSignature::U4 => NativeType::UInt32,
            TypeSignature::I8 => NativeType::Int64,
            TypeSignature::U8 => NativeType::UInt64,
            TypeSignature::R4 => NativeType::Single,
            TypeSignature::R8 => NativeType::Double,
            TypeSignature::String => NativeType::String,
            TypeSignature::I => NativeType::IntPtr,
            TypeSignature::U => NativeType::UIntPtr,
            TypeSignature::Ptr(pointer) => {
                ensure_data!(
                    pointer.modifiers.is_empty(),
                    "pointer with custom modifiers"
                );
                return Ok(TypeRef::pointer_to(self.signature(&pointer.base)?));
            }
            TypeSignature::Array(array) => {
                ensure_data!(
                    array.rank == 1 && array.dimensions.len() == 1,
                    "array of rank {} with {} dimensions",
                    array.rank,
                    array.dimensions.len()
                );
                let dimension = &array.dimensions[0];
                let (Some(size), Some(_)) = (dimension.size, dimension.lower_bound) else {
                    return Err(data_violation!(
                        "array needs one size and one lower bound, got {:?}",
                        dimension
                    ));
                };
                return Ok(TypeRef::Array {
                    shape: (size != 1).then_some(ArrayShape { size }),
                    child: Box::new(self.signature(&array.base)?),
                });
            }
            TypeSignature::ValueType(token) | TypeSignature::Class(token) => {
                return self.token(*token);
            }
            other => {
                return Err(data_violation!("unsupported signature type {:?}", other));
            }
        };

        Ok(TypeRef::native(native))
    }

    /// Resolve a `TypeDef` or `TypeRef` token
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] for unknown definitions, `TypeSpec` tokens and
    /// references that do not resolve
    pub fn token(&self, token: Token) -> Result<TypeRef> {
        if token.is_table(TableId::TypeDef) {
            let Some(id) = self.graph.get(token) else {
                return Err(data_violation!("{} is not part of any API group", token));
            };
            return Ok(self.graph.entity(id).api_ref());
        }

        ensure_data!(
            token.is_table(TableId::TypeRef),
            "{} is neither a type definition nor a type reference",
            token
        );
        self.reference(token)
    }

    fn reference(&self, token: Token) -> Result<TypeRef> {
        let reference = self.oracle.type_ref(token)?;
        match &reference.scope {
            ResolutionScope::Module => {
                let candidates = self.top_level(&reference.namespace, &reference.name)?;
                self.agree(&candidates, &reference.name)
            }
            ResolutionScope::TypeRef(_) => {
                let candidates = self.nested(token)?;
                self.agree(&candidates, &reference.name)
            }
            ResolutionScope::AssemblyRef(_) => {
                if reference.namespace == "System" && reference.name == "Guid" {
                    return Ok(TypeRef::native(NativeType::Guid));
                }
                if MISSING_CLR_TYPES
                    .iter()
                    .any(|(ns, name)| *ns == reference.namespace && *name == reference.name)
                {
                    return Ok(TypeRef::MissingClrType {
                        name: reference.name.clone(),
                        namespace: reference.namespace.clone(),
                    });
                }
                Err(data_violation!(
                    "external type {}.{} cannot be resolved",
                    reference.namespace,
                    reference.name
                ))
            }
            other => Err(data_violation!(
                "unhandled resolution scope {:?} of {}.{}",
                other,
                reference.namespace,
                reference.name
            )),
        }
    }

    /// Every top-level entity `namespace.name`
    fn top_level(&self, namespace: &str, name: &str) -> Result<Vec<TypeId>> {
        let Some(group) = self.graph.group_by_namespace(namespace) else {
            return Err(data_violation!("no API group for namespace '{}'", namespace));
        };

        let candidates = group.lookup(name);
        ensure_data!(
            !candidates.is_empty(),
            "type '{}' not found in '{}'",
            name,
            namespace
        );
        Ok(candidates.to_vec())
    }

    /// Resolve a type-scoped reference through each top-level candidate of its root
    fn nested(&self, token: Token) -> Result<Vec<TypeId>> {
        let mut path = Vec::new();
        let mut current = self.oracle.type_ref(token)?;
        loop {
            let outer = match &current.scope {
                ResolutionScope::TypeRef(outer) => *outer,
                ResolutionScope::Module => break,
                other => {
                    return Err(data_violation!(
                        "enclosing type {} has resolution scope {:?}",
                        current.name,
                        other
                    ))
                }
            };
            ensure_data!(
                current.namespace.is_empty(),
                "expected nested type {} to have an empty namespace",
                current.name
            );
            path.push(current.name.clone());
            current = self.oracle.type_ref(outer)?;
        }
        path.reverse();

        let mut resolved = Vec::new();
        for root in self.top_level(&current.namespace, &current.name)? {
            if let Some(id) = self.walk(root, &path) {
                resolved.push(id);
            }
        }

        ensure_data!(
            !resolved.is_empty(),
            "nested type {}.{}+{} not found",
            current.namespace,
            current.name,
            path.join("+")
        );
        Ok(resolved)
    }

    fn walk(&self, root: TypeId, path: &[String]) -> Option<TypeId> {
        let mut current = root;
        for name in path {
            current = match self.graph.nested_by_name(current, name) {
                Some(found) => found,
                None => {
                    let base = strip_disambiguation(name)?;
                    debug!(
                        "retrying nested type '{}' of '{}' as '{}'",
                        name,
                        self.graph.entity(current).fqn,
                        base
                    );
                    self.graph.nested_by_name(current, base)?
                }
            };
        }
        Some(current)
    }

    /// All candidates must describe the same reference
    fn agree(&self, candidates: &[TypeId], name: &str) -> Result<TypeRef> {
        let Some((first, rest)) = candidates.split_first() else {
            return Err(invariant_violation!("no candidates for {}", name));
        };

        let resolved = self.graph.entity(*first).api_ref();
        for other in rest {
            ensure_data!(
                self.graph.entity(*other).api_ref() == resolved,
                "duplicate definitions of '{}' resolve differently",
                name
            );
        }
        Ok(resolved)
    }
}
