//! Type shapes.

use log::warn;

use crate::{
    attributes::{decode_attributes, Architectures, Attribute, CallingConvention},
    classify::{
        functions::MethodShape,
        records::{Attr, EnumValue, FieldRecord, Marker, TypeKind, TypeRecord},
        Classifier,
    },
    metadata::{
        flags::{FieldAttributes, MethodAttributes, TypeAttributes},
        FieldInfo, TypeDefInfo,
    },
    patch::{FuncPatch, PatchCounters, TypePatch},
    typesystem::{BaseType, TypeEntity, TypeId, TypeRef},
    Result,
};

const LITERAL_FIELD: FieldAttributes = FieldAttributes::PUBLIC
    .union(FieldAttributes::STATIC)
    .union(FieldAttributes::LITERAL)
    .union(FieldAttributes::HAS_DEFAULT);
const ENUM_VALUE_FIELD: FieldAttributes = FieldAttributes::PUBLIC
    .union(FieldAttributes::SPECIAL_NAME)
    .union(FieldAttributes::RT_SPECIAL_NAME);

/// The shape a type definition is classified as, before its members are looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeShape {
    NativeTypedef,
    Com,
    Enum,
    ValueType,
    FunctionPointer,
}

/// Attributes of a type, one slot per attribute
#[derive(Debug, Default)]
struct TypeAttrs {
    guid: Option<uguid::Guid>,
    free_func: Option<String>,
    native_typedef: bool,
    flags: bool,
    platform: Option<String>,
    also_usable_for: Option<String>,
    architectures: Option<Architectures>,
    scoped: bool,
    invalid_handle_values: Vec<i64>,
    agile: bool,
    calling_convention: Option<CallingConvention>,
}

fn fill<T>(slot: &mut Option<T>, value: T, what: &str, fqn: &str) -> Result<()> {
    ensure_data!(slot.is_none(), "type '{}' has more than one {} attribute", fqn, what);
    *slot = Some(value);
    Ok(())
}

fn mark(slot: &mut bool, what: &str, fqn: &str) -> Result<()> {
    ensure_data!(!*slot, "type '{}' has more than one {} attribute", fqn, what);
    *slot = true;
    Ok(())
}

impl TypeAttrs {
    fn decode(attributes: &[Attribute], fqn: &str) -> Result<Self> {
        let mut attrs = TypeAttrs::default();
        for attribute in attributes {
            match attribute {
                Attribute::Guid(guid) => fill(&mut attrs.guid, *guid, "Guid", fqn)?,
                Attribute::RaiiFree(func) => {
                    fill(&mut attrs.free_func, func.clone(), "RAIIFree", fqn)?
                }
                Attribute::NativeTypedef => mark(&mut attrs.native_typedef, "NativeTypedef", fqn)?,
                Attribute::Flags => mark(&mut attrs.flags, "Flags", fqn)?,
                Attribute::SupportedOsPlatform(platform) => {
                    fill(&mut attrs.platform, platform.clone(), "SupportedOSPlatform", fqn)?;
                }
                Attribute::AlsoUsableFor(name) => {
                    fill(&mut attrs.also_usable_for, name.clone(), "AlsoUsableFor", fqn)?;
                }
                Attribute::SupportedArchitecture(architectures) => {
                    fill(&mut attrs.architectures, *architectures, "SupportedArchitecture", fqn)?;
                }
                Attribute::ScopedEnum => mark(&mut attrs.scoped, "ScopedEnum", fqn)?,
                Attribute::InvalidHandleValue(value) => attrs.invalid_handle_values.push(*value),
                Attribute::Agile => mark(&mut attrs.agile, "Agile", fqn)?,
                Attribute::UnmanagedFunctionPointer(convention) => fill(
                    &mut attrs.calling_convention,
                    *convention,
                    "UnmanagedFunctionPointer",
                    fqn,
                )?,
                other => {
                    return Err(data_violation!(
                        "attribute {:?} is not valid on type '{}'",
                        other,
                        fqn
                    ))
                }
            }
        }
        Ok(attrs)
    }

    /// Names of the filled slots
    fn present(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        let slots = [
            (self.guid.is_some(), "Guid"),
            (self.free_func.is_some(), "RAIIFree"),
            (self.native_typedef, "NativeTypedef"),
            (self.flags, "Flags"),
            (self.also_usable_for.is_some(), "AlsoUsableFor"),
            (self.scoped, "ScopedEnum"),
            (!self.invalid_handle_values.is_empty(), "InvalidHandleValue"),
            (self.agile, "Agile"),
            (self.calling_convention.is_some(), "UnmanagedFunctionPointer"),
        ];
        for (filled, name) in slots {
            if filled {
                present.push(name);
            }
        }
        present
    }

    /// Every filled slot must be one `kind` accepts; architecture and platform apply to all
    fn only(&self, allowed: &[&str], kind: &str, fqn: &str) -> Result<()> {
        for name in self.present() {
            ensure_data!(
                allowed.contains(&name),
                "{} attribute is not valid on {} '{}'",
                name,
                kind,
                fqn
            );
        }
        Ok(())
    }
}

/// Checks every type shape shares
fn check_structure(entity: &TypeEntity) -> Result<()> {
    let def = &entity.def;
    let fqn = &entity.fqn;

    let expected = if entity.is_nested() {
        TypeAttributes::NESTED_PUBLIC
    } else {
        TypeAttributes::PUBLIC
    };
    ensure_data!(
        def.flags.visibility() == expected.bits(),
        "type '{}' has visibility {}, expected {}",
        fqn,
        def.flags.visibility(),
        expected.bits()
    );

    let no_base = def.extends.is_none();
    ensure_data!(
        no_base == def.flags.contains(TypeAttributes::INTERFACE)
            && no_base == def.flags.contains(TypeAttributes::ABSTRACT)
            && no_base != def.flags.contains(TypeAttributes::SEALED),
        "type '{}' has flags {:?}, which do not match {}",
        fqn,
        def.flags,
        if no_base { "an interface" } else { "a sealed type" }
    );

    ensure_data!(def.event_count == 0, "type '{}' has events", fqn);
    ensure_data!(def.property_count == 0, "type '{}' has properties", fqn);
    ensure_data!(def.generic_param_count == 0, "type '{}' has generic parameters", fqn);
    ensure_data!(def.method_impl_count == 0, "type '{}' has method implementations", fqn);
    ensure_data!(def.decl_security_count == 0, "type '{}' has declarative security", fqn);
    ensure_data!(
        no_base || def.interfaces.is_empty(),
        "type '{}' implements interfaces but is not an interface",
        fqn
    );
    ensure_data!(
        def.nested.len() == entity.nested.len(),
        "type '{}' declares {} nested types but {} were placed",
        fqn,
        def.nested.len(),
        entity.nested.len()
    );
    Ok(())
}

fn check_layout(def: &TypeDefInfo, expected: u32, fqn: &str) -> Result<()> {
    ensure_data!(
        def.flags.layout() == expected,
        "type '{}' has layout {}, expected {}",
        fqn,
        def.flags.layout(),
        expected
    );
    Ok(())
}

impl Classifier<'_> {
    /// Classify the type `id` and its nested types
    pub(super) fn classify_type(
        &self,
        id: TypeId,
        patch: &TypePatch,
        counters: &mut PatchCounters,
    ) -> Result<TypeRecord> {
        let entity = self.graph.entity(id);
        let fqn = entity.fqn.as_str();
        check_structure(entity)?;
        let attrs = TypeAttrs::decode(&entity.attributes, fqn)?;

        let shape = if attrs.native_typedef {
            TypeShape::NativeTypedef
        } else {
            match &entity.base {
                BaseType::None => TypeShape::Com,
                BaseType::Enum => TypeShape::Enum,
                BaseType::ValueType => TypeShape::ValueType,
                BaseType::MulticastDelegate => TypeShape::FunctionPointer,
                BaseType::Other { namespace, name } => {
                    return Err(data_violation!(
                        "type '{}' derives from unexpected base '{}.{}'",
                        fqn,
                        namespace,
                        name
                    ));
                }
            }
        };

        if !patch.is_empty() && patch.is_com != (shape == TypeShape::Com) {
            return Err(patch_violation!(
                "type '{}' is patched as {} but is {}",
                fqn,
                if patch.is_com { "a COM type" } else { "a non-COM type" },
                if shape == TypeShape::Com { "a COM type" } else { "a non-COM type" }
            ));
        }

        let kind = match shape {
            TypeShape::NativeTypedef => self.native_typedef(entity, &attrs)?,
            TypeShape::Com => self.com(entity, &attrs, patch, counters)?,
            TypeShape::Enum => self.enumeration(entity, &attrs)?,
            TypeShape::ValueType => self.value_type(entity, &attrs, patch, counters)?,
            TypeShape::FunctionPointer => self.function_pointer(entity, &attrs, counters)?,
        };

        let mut nested_types = Vec::with_capacity(entity.nested.len());
        for nested in &entity.nested {
            let name = &self.graph.entity(*nested).name;
            let nested_patch = patch.nested(name, counters);
            if nested_patch.remove {
                continue;
            }
            nested_types.push(self.classify_type(*nested, nested_patch, counters)?);
        }

        Ok(TypeRecord {
            name: entity.name.clone(),
            architectures: attrs.architectures.unwrap_or_default(),
            platform: attrs.platform.clone(),
            kind,
            nested_types,
        })
    }

    fn native_typedef(&self, entity: &TypeEntity, attrs: &TypeAttrs) -> Result<TypeKind> {
        let def = &entity.def;
        let fqn = entity.fqn.as_str();
        attrs.only(
            &["NativeTypedef", "RAIIFree", "AlsoUsableFor", "InvalidHandleValue"],
            "native typedef",
            fqn,
        )?;
        check_layout(def, TypeAttributes::SEQUENTIAL_LAYOUT.bits(), fqn)?;
        ensure_data!(def.methods.is_empty(), "native typedef '{}' has methods", fqn);
        ensure_data!(def.nested.is_empty(), "native typedef '{}' has nested types", fqn);
        let [field] = def.fields.as_slice() else {
            return Err(data_violation!(
                "native typedef '{}' has {} fields, expected 1",
                fqn,
                def.fields.len()
            ));
        };

        let field = self.oracle.field(*field)?;
        ensure_data!(
            field.flags == FieldAttributes::PUBLIC,
            "field of native typedef '{}' has flags {:?}",
            fqn,
            field.flags
        );
        ensure_data!(
            field.attributes.is_empty(),
            "field of native typedef '{}' has attributes",
            fqn
        );

        Ok(TypeKind::NativeTypedef {
            also_usable_for: attrs.also_usable_for.clone(),
            def: self.field_type(&field)?,
            free_func: attrs.free_func.clone(),
            invalid_handle_values: attrs.invalid_handle_values.clone(),
        })
    }

    fn com(
        &self,
        entity: &TypeEntity,
        attrs: &TypeAttrs,
        patch: &TypePatch,
        counters: &mut PatchCounters,
    ) -> Result<TypeKind> {
        let def = &entity.def;
        let fqn = entity.fqn.as_str();
        attrs.only(&["Guid", "Agile"], "COM type", fqn)?;
        check_layout(def, 0, fqn)?;
        ensure_data!(def.fields.is_empty(), "COM type '{}' has fields", fqn);

        let interface = match def.interfaces.as_slice() {
            [] => None,
            [interface] => Some(self.resolver.token(*interface)?),
            more => {
                return Err(data_violation!(
                    "COM type '{}' implements {} interfaces",
                    fqn,
                    more.len()
                ))
            }
        };

        let mut methods = Vec::with_capacity(def.methods.len());
        for token in &def.methods {
            let method = self.oracle.method(*token)?;
            let method_patch = patch.method(&method.name, counters);
            methods.push(self.method(&method, MethodShape::Com, method_patch, counters)?);
        }

        Ok(TypeKind::Com {
            guid: attrs.guid,
            agile: attrs.agile,
            interface,
            methods,
        })
    }

    fn enumeration(&self, entity: &TypeEntity, attrs: &TypeAttrs) -> Result<TypeKind> {
        let def = &entity.def;
        let fqn = entity.fqn.as_str();
        attrs.only(&["Flags", "ScopedEnum"], "enum", fqn)?;
        check_layout(def, 0, fqn)?;
        ensure_data!(def.methods.is_empty(), "enum '{}' has methods", fqn);
        ensure_data!(def.nested.is_empty(), "enum '{}' has nested types", fqn);

        let Some((first, rest)) = def.fields.split_first() else {
            return Err(data_violation!("enum '{}' has no value__ field", fqn));
        };
        let storage = self.oracle.field(*first)?;
        ensure_data!(
            storage.name == "value__" && storage.flags == ENUM_VALUE_FIELD,
            "first field of enum '{}' is '{}' with flags {:?}",
            fqn,
            storage.name,
            storage.flags
        );
        let integer_base = match self.field_type(&storage)?.as_native() {
            Some(native) if native.is_integer() => native,
            other => {
                return Err(data_violation!(
                    "enum '{}' is based on {:?}, expected an integer type",
                    fqn,
                    other
                ))
            }
        };

        let mut values = Vec::with_capacity(rest.len());
        for token in rest {
            let field = self.oracle.field(*token)?;
            ensure_data!(
                field.flags == LITERAL_FIELD,
                "value '{}' of enum '{}' has flags {:?}",
                field.name,
                fqn,
                field.flags
            );
            ensure_data!(
                field.attributes.is_empty() && field.offset.is_none() && !field.has_rva,
                "value '{}' of enum '{}' has attributes, an offset or an RVA",
                field.name,
                fqn
            );
            let Some(constant) = &field.constant else {
                return Err(data_violation!(
                    "value '{}' of enum '{}' has no constant",
                    field.name,
                    fqn
                ));
            };
            let (native, value) = Self::constant_value(constant)?;
            ensure_data!(
                native == integer_base,
                "value '{}' of enum '{}' is {}, expected {}",
                field.name,
                fqn,
                native.name(),
                integer_base.name()
            );
            values.push(EnumValue {
                name: field.name,
                value,
            });
        }

        Ok(TypeKind::Enum {
            flags: attrs.flags,
            scoped: attrs.scoped,
            values,
            integer_base,
        })
    }

    fn value_type(
        &self,
        entity: &TypeEntity,
        attrs: &TypeAttrs,
        patch: &TypePatch,
        counters: &mut PatchCounters,
    ) -> Result<TypeKind> {
        let def = &entity.def;
        let fqn = entity.fqn.as_str();
        ensure_data!(def.methods.is_empty(), "struct '{}' has methods", fqn);

        if let Some(guid) = attrs.guid {
            attrs.only(&["Guid"], "COM class id", fqn)?;
            ensure_data!(
                def.fields.is_empty() && def.nested.is_empty(),
                "COM class id '{}' has fields or nested types",
                fqn
            );
            return Ok(TypeKind::ComClassId { guid });
        }

        let is_union = if def.flags.is_sequential() {
            false
        } else if def.flags.is_explicit() {
            true
        } else {
            return Err(data_violation!(
                "struct '{}' has layout {}, expected sequential or explicit",
                fqn,
                def.flags.layout()
            ));
        };
        attrs.only(&[], if is_union { "union" } else { "struct" }, fqn)?;

        let mut fields = Vec::with_capacity(def.fields.len());
        for token in &def.fields {
            let field = self.oracle.field(*token)?;
            if field.flags == LITERAL_FIELD {
                warn!("skipping constant field '{}' of '{}'", field.name, fqn);
                continue;
            }
            ensure_data!(
                field.flags == FieldAttributes::PUBLIC,
                "field '{}' of '{}' has flags {:?}",
                field.name,
                fqn,
                field.flags
            );
            ensure_data!(!field.has_rva, "field '{}' of '{}' has an RVA", field.name, fqn);
            if is_union {
                ensure_data!(
                    field.offset == Some(0),
                    "field '{}' of union '{}' is at offset {:?}",
                    field.name,
                    fqn,
                    field.offset
                );
            } else {
                ensure_data!(
                    field.offset.is_none(),
                    "field '{}' of struct '{}' has an explicit offset",
                    field.name,
                    fqn
                );
            }
            let field_patch = patch.field(&field.name, counters);
            fields.push(self.field(&field, field_patch.optional)?);
        }

        let (size, packing_size) = def
            .layout
            .map_or((0, 0), |layout| (layout.class_size, layout.packing_size));

        Ok(if is_union {
            TypeKind::Union {
                size,
                packing_size,
                fields,
            }
        } else {
            TypeKind::Struct {
                size,
                packing_size,
                fields,
            }
        })
    }

    fn function_pointer(
        &self,
        entity: &TypeEntity,
        attrs: &TypeAttrs,
        counters: &mut PatchCounters,
    ) -> Result<TypeKind> {
        let def = &entity.def;
        let fqn = entity.fqn.as_str();
        attrs.only(&["UnmanagedFunctionPointer"], "function pointer", fqn)?;
        check_layout(def, 0, fqn)?;
        ensure_data!(def.fields.is_empty(), "function pointer '{}' has fields", fqn);
        ensure_data!(def.nested.is_empty(), "function pointer '{}' has nested types", fqn);

        let [ctor, invoke] = def.methods.as_slice() else {
            return Err(data_violation!(
                "function pointer '{}' has {} methods, expected .ctor and Invoke",
                fqn,
                def.methods.len()
            ));
        };

        let ctor = self.oracle.method(*ctor)?;
        ensure_data!(
            ctor.name == ".ctor"
                && ctor
                    .flags
                    .contains(MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME),
            "first method of function pointer '{}' is '{}' with flags {:?}",
            fqn,
            ctor.name,
            ctor.flags
        );

        let invoke = self.oracle.method(*invoke)?;
        ensure_data!(
            invoke.name == "Invoke",
            "second method of function pointer '{}' is '{}'",
            fqn,
            invoke.name
        );
        let record = self.method(&invoke, MethodShape::Invoke, FuncPatch::none(), counters)?;

        Ok(TypeKind::FunctionPointer {
            calling_convention: attrs.calling_convention.unwrap_or(CallingConvention::Winapi),
            return_type: record.return_type,
            return_attrs: record.return_attrs,
            params: record.params,
        })
    }

    /// The declared type of a field
    pub(super) fn field_type(&self, field: &FieldInfo) -> Result<TypeRef> {
        ensure_data!(
            field.signature.modifiers.is_empty(),
            "field '{}' has custom modifiers",
            field.name
        );
        self.resolver.signature(&field.signature.base)
    }

    fn field(&self, field: &FieldInfo, patch_optional: bool) -> Result<FieldRecord> {
        let mut attrs = Vec::new();
        for attribute in decode_attributes(self.oracle, &field.attributes)? {
            let Some(attr) = Self::member_attr(&attribute) else {
                return Err(data_violation!(
                    "attribute {:?} is not valid on field '{}'",
                    attribute,
                    field.name
                ));
            };
            attrs.push(attr);
        }

        if patch_optional {
            if attrs.iter().any(|attr| attr.is(Marker::Optional)) {
                return Err(patch_violation!(
                    "field '{}' is patched optional but already is",
                    field.name
                ));
            }
            attrs.push(Attr::Marker(Marker::Optional));
        }

        Ok(FieldRecord {
            name: field.name.clone(),
            ty: self.field_type(field)?,
            attrs,
        })
    }
}
