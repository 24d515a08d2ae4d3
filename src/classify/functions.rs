//! Functions, COM methods and delegate signatures.

use crate::{
    attributes::{decode_attributes, Architectures, Attribute},
    classify::{
        records::{Attr, Detail, FunctionRecord, Marker, ParamRecord},
        Classifier,
    },
    metadata::{
        flags::{MethodAttributes, MethodImplAttributes, PInvokeAttributes, ParamAttributes},
        signatures::SignatureParameter,
        token::Token,
        MethodInfo, ParamInfo,
    },
    patch::{FuncPatch, PatchCounters},
    typesystem::TypeRef,
    Result,
};

const FREE_FUNCTION: MethodAttributes = MethodAttributes::PUBLIC
    .union(MethodAttributes::STATIC)
    .union(MethodAttributes::PINVOKE_IMPL)
    .union(MethodAttributes::HIDE_BY_SIG);
const COM_METHOD: MethodAttributes = MethodAttributes::PUBLIC
    .union(MethodAttributes::VIRTUAL)
    .union(MethodAttributes::HIDE_BY_SIG)
    .union(MethodAttributes::NEW_SLOT)
    .union(MethodAttributes::ABSTRACT);
const INVOKE: MethodAttributes = MethodAttributes::PUBLIC
    .union(MethodAttributes::VIRTUAL)
    .union(MethodAttributes::HIDE_BY_SIG)
    .union(MethodAttributes::NEW_SLOT);
const PARAM_FLAGS: ParamAttributes = ParamAttributes::IN
    .union(ParamAttributes::OUT)
    .union(ParamAttributes::OPTIONAL);

/// The three kinds of method a winmd declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MethodShape {
    /// A function imported from a DLL, on an `Apis` type
    Free,
    /// A vtable slot of a COM interface
    Com,
    /// The `Invoke` method of a delegate
    Invoke,
}

/// Function level attributes
#[derive(Debug, Default)]
struct MethodAttrs {
    architectures: Option<Architectures>,
    platform: Option<String>,
    attrs: Vec<Attr>,
}

impl MethodAttrs {
    fn decode(attributes: &[Attribute], name: &str) -> Result<Self> {
        let mut decoded = MethodAttrs::default();
        for attribute in attributes {
            match attribute {
                Attribute::SupportedArchitecture(architectures) => {
                    ensure_data!(
                        decoded.architectures.is_none(),
                        "function '{}' has more than one SupportedArchitecture attribute",
                        name
                    );
                    decoded.architectures = Some(*architectures);
                }
                Attribute::SupportedOsPlatform(platform) => {
                    ensure_data!(
                        decoded.platform.is_none(),
                        "function '{}' has more than one SupportedOSPlatform attribute",
                        name
                    );
                    decoded.platform = Some(platform.clone());
                }
                Attribute::DoesNotReturn => decoded.attrs.push(Marker::DoesNotReturn.into()),
                Attribute::Obsolete(message) => decoded.attrs.push(
                    Detail::Obsolete {
                        message: message.clone(),
                    }
                    .into(),
                ),
                other => {
                    return Err(data_violation!(
                        "attribute {:?} is not valid on function '{}'",
                        other,
                        name
                    ))
                }
            }
        }
        Ok(decoded)
    }
}

fn check_return(return_type: &SignatureParameter, name: &str) -> Result<()> {
    ensure_data!(
        !return_type.by_ref && return_type.modifiers.is_empty(),
        "return type of '{}' is by-ref or has custom modifiers",
        name
    );
    Ok(())
}

impl Classifier<'_> {
    /// Classify a free function of an `Apis` type
    pub(super) fn free_function(
        &self,
        method: &MethodInfo,
        patch: &FuncPatch,
        counters: &mut PatchCounters,
    ) -> Result<FunctionRecord> {
        self.method(method, MethodShape::Free, patch, counters)
    }

    pub(super) fn method(
        &self,
        method: &MethodInfo,
        shape: MethodShape,
        patch: &FuncPatch,
        counters: &mut PatchCounters,
    ) -> Result<FunctionRecord> {
        let name = method.name.as_str();
        let signature = &method.signature;

        ensure_data!(
            method.decl_security_count == 0,
            "method '{}' has declarative security",
            name
        );
        ensure_data!(
            signature.default && !signature.vararg && signature.varargs.is_empty(),
            "method '{}' does not use the default calling convention",
            name
        );
        ensure_data!(
            signature.param_count_generic == 0,
            "method '{}' is generic",
            name
        );

        let (set_last_error, dll_import) = match shape {
            MethodShape::Free => {
                ensure_data!(
                    method.flags == FREE_FUNCTION,
                    "function '{}' has flags {:?}",
                    name,
                    method.flags
                );
                ensure_data!(
                    method.impl_flags == MethodImplAttributes::PRESERVE_SIG,
                    "function '{}' has implementation flags {:?}",
                    name,
                    method.impl_flags
                );
                ensure_data!(!signature.has_this, "function '{}' has a this pointer", name);

                let Some(import) = &method.import else {
                    return Err(data_violation!("function '{}' is not imported", name));
                };
                let flags = import.flags;
                ensure_data!(
                    flags.contains(PInvokeAttributes::NO_MANGLE)
                        && flags.char_set() == 0
                        && flags.best_fit() == 0
                        && flags.call_conv() == PInvokeAttributes::CALL_CONV_WINAPI.bits()
                        && flags.throw_on_unmappable() == 0,
                    "import of '{}' has flags {:?}",
                    name,
                    flags
                );
                ensure_data!(
                    import.name == name,
                    "function '{}' is imported as '{}'",
                    name,
                    import.name
                );
                (
                    flags.contains(PInvokeAttributes::SUPPORTS_LAST_ERROR),
                    Some(import.module.clone()),
                )
            }
            MethodShape::Com => {
                ensure_data!(
                    method.flags == COM_METHOD,
                    "COM method '{}' has flags {:?}",
                    name,
                    method.flags
                );
                ensure_data!(
                    (method.impl_flags - MethodImplAttributes::PRESERVE_SIG).is_empty(),
                    "COM method '{}' has implementation flags {:?}",
                    name,
                    method.impl_flags
                );
                ensure_data!(signature.has_this, "COM method '{}' has no this pointer", name);
                ensure_data!(method.import.is_none(), "COM method '{}' is imported", name);
                (false, None)
            }
            MethodShape::Invoke => {
                ensure_data!(
                    method.flags == INVOKE,
                    "delegate method '{}' has flags {:?}",
                    name,
                    method.flags
                );
                ensure_data!(
                    method.impl_flags.code_type() == MethodImplAttributes::RUNTIME.bits(),
                    "delegate method '{}' is not runtime implemented",
                    name
                );
                ensure_data!(signature.has_this, "delegate method '{}' has no this pointer", name);
                ensure_data!(method.import.is_none(), "delegate method '{}' is imported", name);
                (false, None)
            }
        };

        let method_attrs =
            MethodAttrs::decode(&decode_attributes(self.oracle, &method.attributes)?, name)?;
        if shape == MethodShape::Invoke {
            ensure_data!(
                method_attrs.architectures.is_none()
                    && method_attrs.platform.is_none()
                    && method_attrs.attrs.is_empty(),
                "delegate method '{}' has attributes",
                name
            );
        }

        check_return(&signature.return_type, name)?;
        let return_type = self.resolver.signature(&signature.return_type.base)?;
        let (mut return_attrs, params) = if patch.skip_params {
            (Vec::new(), self.unnamed_params(method)?)
        } else {
            self.params(method, patch, counters)?
        };

        if patch.return_type(counters).optional {
            if return_attrs.iter().any(|attr| attr.is(Marker::Optional)) {
                return Err(patch_violation!(
                    "return value of '{}' is patched optional but already is",
                    name
                ));
            }
            return_attrs.push(Marker::Optional.into());
        }

        Ok(FunctionRecord {
            name: method.name.clone(),
            set_last_error,
            dll_import,
            return_type,
            return_attrs,
            architectures: method_attrs.architectures.unwrap_or_default(),
            platform: method_attrs.platform,
            attrs: method_attrs.attrs,
            params,
        })
    }

    /// Parameters taken from the signature alone, named by position
    fn unnamed_params(&self, method: &MethodInfo) -> Result<Vec<ParamRecord>> {
        method
            .signature
            .params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                Ok(ParamRecord {
                    name: format!("param{}", index + 1),
                    ty: self.param_type(param, &method.name)?,
                    attrs: Vec::new(),
                })
            })
            .collect()
    }

    fn params(
        &self,
        method: &MethodInfo,
        patch: &FuncPatch,
        counters: &mut PatchCounters,
    ) -> Result<(Vec<Attr>, Vec<ParamRecord>)> {
        let name = method.name.as_str();
        let types = &method.signature.params;

        let mut rows = method.params.as_slice();
        let mut return_attrs = Vec::new();
        if let Some((first, rest)) = rows.split_first() {
            if first.sequence == 0 {
                ensure_data!(
                    first.flags.is_empty() && !first.has_default,
                    "return row of '{}' has flags {:?}",
                    name,
                    first.flags
                );
                return_attrs = self.member_attrs(&first.attributes, name)?;
                rows = rest;
            }
        }

        ensure_data!(
            rows.len() == types.len(),
            "'{}' has {} parameter rows for {} parameters",
            name,
            rows.len(),
            types.len()
        );

        let mut params = Vec::with_capacity(rows.len());
        for (index, (row, param_type)) in rows.iter().zip(types).enumerate() {
            ensure_data!(
                usize::from(row.sequence) == index + 1,
                "parameters of '{}' are not in order, found sequence {} at position {}",
                name,
                row.sequence,
                index + 1
            );
            ensure_data!(
                !row.name.is_empty(),
                "parameter {} of '{}' has no name",
                row.sequence,
                name
            );
            ensure_data!(
                !row.has_default,
                "parameter '{}' of '{}' has a default value",
                row.name,
                name
            );
            ensure_data!(
                (row.flags - PARAM_FLAGS).is_empty(),
                "parameter '{}' of '{}' has flags {:?}",
                row.name,
                name,
                row.flags
            );

            let param_patch = patch.param(&row.name, counters);
            let attrs = self.param_attrs(row, name, param_patch.optional, param_patch.is_const)?;
            params.push(ParamRecord {
                name: row.name.clone(),
                ty: self.param_type(param_type, name)?,
                attrs,
            });
        }

        Ok((return_attrs, params))
    }

    fn param_type(&self, param: &SignatureParameter, method: &str) -> Result<TypeRef> {
        ensure_data!(
            !param.by_ref && param.modifiers.is_empty(),
            "a parameter of '{}' is by-ref or has custom modifiers",
            method
        );
        self.resolver.signature(&param.base)
    }

    fn param_attrs(
        &self,
        row: &ParamInfo,
        method: &str,
        patch_optional: bool,
        patch_const: bool,
    ) -> Result<Vec<Attr>> {
        let mut attrs = Vec::new();
        if row.flags.contains(ParamAttributes::IN) {
            attrs.push(Marker::In.into());
        }
        if row.flags.contains(ParamAttributes::OUT) {
            attrs.push(Marker::Out.into());
        }
        if row.flags.contains(ParamAttributes::OPTIONAL) {
            attrs.push(Marker::Optional.into());
        }
        for attr in self.member_attrs(&row.attributes, method)? {
            if !attrs.contains(&attr) {
                attrs.push(attr);
            }
        }

        let patched_markers = [(patch_optional, Marker::Optional), (patch_const, Marker::Const)];
        for (patched, marker) in patched_markers {
            if !patched {
                continue;
            }
            if attrs.iter().any(|attr| attr.is(marker)) {
                return Err(patch_violation!(
                    "parameter '{}' of '{}' is patched {:?} but already is",
                    row.name,
                    method,
                    marker
                ));
            }
            attrs.push(marker.into());
        }

        Ok(attrs)
    }

    fn member_attrs(&self, tokens: &[Token], owner: &str) -> Result<Vec<Attr>> {
        decode_attributes(self.oracle, tokens)?
            .iter()
            .map(|attribute| {
                Self::member_attr(attribute).ok_or_else(|| {
                    data_violation!(
                        "attribute {:?} is not valid on a parameter of '{}'",
                        attribute,
                        owner
                    )
                })
            })
            .collect()
    }

    /// The output form of an attribute allowed on fields, parameters and return values
    pub(super) fn member_attr(attribute: &Attribute) -> Option<Attr> {
        let attr: Attr = match attribute {
            Attribute::Const => Marker::Const.into(),
            Attribute::ComOutPtr => Marker::ComOutPtr.into(),
            Attribute::NotNullTerminated => Marker::NotNullTerminated.into(),
            Attribute::NullNullTerminated => Marker::NullNullTerminated.into(),
            Attribute::RetVal => Marker::RetVal.into(),
            Attribute::Reserved => Marker::Reserved.into(),
            Attribute::DoNotRelease => Marker::DoNotRelease.into(),
            Attribute::Optional => Marker::Optional.into(),
            Attribute::NativeArrayInfo {
                count_const,
                count_param_index,
                count_field_name,
            } => Detail::NativeArrayInfo {
                count_const: *count_const,
                count_param_index: *count_param_index,
                count_field_name: count_field_name.clone(),
            }
            .into(),
            Attribute::MemorySize { bytes_param_index } => Detail::MemorySize {
                bytes_param_index: *bytes_param_index,
            }
            .into(),
            Attribute::FreeWith(func) => Detail::FreeWith { func: func.clone() }.into(),
            Attribute::NativeTypeInfo {
                unmanaged_type,
                is_null_terminated,
            } => Detail::NativeTypeInfo {
                unmanaged_type: *unmanaged_type,
                is_null_terminated: *is_null_terminated,
            }
            .into(),
            Attribute::Obsolete(message) => Detail::Obsolete {
                message: message.clone(),
            }
            .into(),
            _ => return None,
        };
        Some(attr)
    }
}
