//! Interpretation of custom attributes.
//!
//! A winmd annotates types, fields, methods and parameters with custom attributes whose blobs are
//! only loosely typed. This module turns a [`RawAttribute`] into exactly one variant of the closed
//! [`Attribute`] enum. Every variant enforces its constructor arity and the exact set of named
//! arguments it accepts; an attribute the generator does not know is a
//! [`crate::Error::DataViolation`].
//!
//! Argument types are resolved by [`ArgTypes`], which accepts the scalar types and the three
//! enums (`CallingConvention`, `UnmanagedType`, `Architecture`) winmd attributes are built from.
//!
//! # Examples
//!
//! ```rust
//! use win32json::attributes::{decode_attribute, Attribute};
//! use win32json::metadata::{builder::MetadataBuilder, flags::TypeAttributes};
//!
//! let mut builder = MetadataBuilder::new();
//! let handle = builder.add_type_def("Windows.Win32.Foundation", "HANDLE", TypeAttributes::PUBLIC, None);
//! let token = builder.add_attribute(
//!     handle,
//!     "Windows.Win32.Foundation.Metadata",
//!     "NativeTypedefAttribute",
//!     Vec::new(),
//!     &[],
//!     &[],
//! )?;
//!
//! assert_eq!(decode_attribute(&builder, token)?, Attribute::NativeTypedef);
//! # Ok::<(), win32json::Error>(())
//! ```

use bitflags::bitflags;
use serde::{ser::SerializeSeq, Serialize, Serializer};
use strum::{FromRepr, IntoStaticStr};

use crate::{
    metadata::{
        customattributes::{AttrArgType, AttrArgTypeProvider, AttrValue, NamedArg, RawAttribute},
        signatures::ELEMENT_TYPE,
        token::Token,
        MetadataOracle,
    },
    Result,
};

/// Namespace of the attribute classes win32metadata defines
pub const METADATA_NAMESPACE: &str = "Windows.Win32.Foundation.Metadata";

/// Namespace older winmd releases used for the same attribute classes
pub const LEGACY_INTEROP_NAMESPACE: &str = "Windows.Win32.Interop";

/// `System.Runtime.InteropServices.CallingConvention`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Serialize)]
#[repr(i32)]
pub enum CallingConvention {
    /// The platform default
    Winapi = 1,
    /// `__cdecl`
    Cdecl = 2,
    /// `__stdcall`
    StdCall = 3,
    /// `__thiscall`
    ThisCall = 4,
    /// `__fastcall`
    FastCall = 5,
}

/// `System.Runtime.InteropServices.UnmanagedType`, the values a winmd can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr, IntoStaticStr, Serialize)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum UnmanagedType {
    Bool = 2,
    I1 = 3,
    U1 = 4,
    I2 = 5,
    U2 = 6,
    I4 = 7,
    U4 = 8,
    I8 = 9,
    U8 = 10,
    R4 = 11,
    R8 = 12,
    Currency = 15,
    BStr = 19,
    LPStr = 20,
    LPWStr = 21,
    LPTStr = 22,
    ByValTStr = 23,
    IUnknown = 25,
    IDispatch = 26,
    Struct = 27,
    Interface = 28,
    SafeArray = 29,
    ByValArray = 30,
    SysInt = 31,
    SysUInt = 32,
    VBByRefStr = 34,
    AnsiBStr = 35,
    TBStr = 36,
    VariantBool = 37,
    FunctionPtr = 38,
    AsAny = 40,
    LPArray = 42,
    LPStruct = 43,
    CustomMarshaler = 44,
    Error = 45,
    IInspectable = 46,
    HString = 47,
    LPUTF8Str = 48,
}

bitflags! {
    /// `Windows.Win32.Foundation.Metadata.Architecture`, the platforms a definition exists on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Architectures: i32 {
        /// 32-bit x86
        const X86 = 0x1;
        /// x86-64
        const X64 = 0x2;
        /// AArch64
        const ARM64 = 0x4;
    }
}

impl Serialize for Architectures {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.iter().count()))?;
        for arch in self.iter() {
            let name = if arch == Architectures::X86 {
                "X86"
            } else if arch == Architectures::X64 {
                "X64"
            } else {
                "Arm64"
            };
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

/// A property key, a format id plus property id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyKey {
    /// Format id
    pub fmtid: uguid::Guid,
    /// Property id
    pub pid: u32,
}

/// The closed set of attributes the generator understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// The pointee is not written through
    Const,
    /// How many elements a pointer addresses
    NativeArrayInfo {
        /// Fixed element count
        count_const: Option<i32>,
        /// Index of the parameter holding the element count
        count_param_index: Option<i16>,
        /// Name of the field holding the element count
        count_field_name: Option<String>,
    },
    /// Index of the parameter holding the buffer size in bytes
    MemorySize {
        /// Parameter index
        bytes_param_index: i16,
    },
    /// Marshalling hint
    NativeTypeInfo {
        /// Unmanaged representation
        unmanaged_type: UnmanagedType,
        /// The string is null terminated
        is_null_terminated: bool,
    },
    /// Deprecated, with a message
    Obsolete(String),
    /// Interface id or class id
    Guid(uguid::Guid),
    /// Property key constant
    PropertyKey(PropertyKey),
    /// Function that releases a handle type
    RaiiFree(String),
    /// Function that releases the value of a parameter or field
    FreeWith(String),
    /// The struct is a typedef of its single field
    NativeTypedef,
    /// Calling convention of a delegate
    UnmanagedFunctionPointer(CallingConvention),
    /// Receives a COM interface pointer
    ComOutPtr,
    /// A string buffer that is not null terminated
    NotNullTerminated,
    /// A list of strings terminated by an empty string
    NullNullTerminated,
    /// Enum values combine as bit flags
    Flags,
    /// Platforms the definition exists on
    SupportedArchitecture(Architectures),
    /// Minimum OS platform
    SupportedOsPlatform(String),
    /// Another handle type this one may be passed as
    AlsoUsableFor(String),
    /// May be null
    Optional,
    /// Receives the logical return value
    RetVal,
    /// Must be null or zero
    Reserved,
    /// The caller must not release the returned value
    DoNotRelease,
    /// The function does not return
    DoesNotReturn,
    /// Enum values are accessed through the enum name
    ScopedEnum,
    /// A value of a handle type that marks an invalid handle
    InvalidHandleValue(i64),
    /// The COM class is agile
    Agile,
}

/// Where an attribute class is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Metadata,
    System,
    InteropServices,
    Versioning,
    CodeAnalysis,
}

impl Origin {
    fn of(namespace: &str) -> Option<Origin> {
        match namespace {
            METADATA_NAMESPACE | LEGACY_INTEROP_NAMESPACE => Some(Origin::Metadata),
            "System" => Some(Origin::System),
            "System.Runtime.InteropServices" => Some(Origin::InteropServices),
            "System.Runtime.Versioning" => Some(Origin::Versioning),
            "System.Diagnostics.CodeAnalysis" => Some(Origin::CodeAnalysis),
            _ => None,
        }
    }
}

/// Resolves attribute argument types for win32metadata attributes.
pub struct ArgTypes;

impl ArgTypes {
    fn from_full_name(full_name: &str) -> Option<AttrArgType> {
        match full_name {
            "System.Runtime.InteropServices.CallingConvention" => Some(AttrArgType::CallConv),
            "System.Runtime.InteropServices.UnmanagedType" => Some(AttrArgType::UnmanagedType),
            "Windows.Win32.Foundation.Metadata.Architecture"
            | "Windows.Win32.Interop.Architecture" => Some(AttrArgType::Architecture),
            _ => None,
        }
    }
}

impl AttrArgTypeProvider for ArgTypes {
    fn primitive(&self, element_type: u8) -> Result<AttrArgType> {
        match element_type {
            ELEMENT_TYPE::BOOLEAN => Ok(AttrArgType::Bool),
            ELEMENT_TYPE::U1 => Ok(AttrArgType::Byte),
            ELEMENT_TYPE::I2 => Ok(AttrArgType::Int16),
            ELEMENT_TYPE::U2 => Ok(AttrArgType::UInt16),
            ELEMENT_TYPE::I4 => Ok(AttrArgType::Int32),
            ELEMENT_TYPE::U4 => Ok(AttrArgType::UInt32),
            ELEMENT_TYPE::I8 => Ok(AttrArgType::Int64),
            ELEMENT_TYPE::STRING => Ok(AttrArgType::Str),
            other => Err(data_violation!(
                "attribute argument of element type 0x{:02X}",
                other
            )),
        }
    }

    fn system_type(&self) -> Result<AttrArgType> {
        Ok(AttrArgType::SystemType)
    }

    fn from_reference(&self, namespace: &str, name: &str) -> Result<AttrArgType> {
        ArgTypes::from_full_name(&format!("{namespace}.{name}")).ok_or_else(|| {
            data_violation!("attribute argument of type '{}.{}'", namespace, name)
        })
    }

    fn from_serialized_name(&self, name: &str) -> Result<AttrArgType> {
        let full_name = name.split(',').next().unwrap_or(name).trim();
        ArgTypes::from_full_name(full_name)
            .ok_or_else(|| data_violation!("attribute argument of serialized type '{}'", name))
    }
}

/// Checked access to the arguments of one raw attribute
struct Args<'a> {
    raw: &'a RawAttribute,
}

impl<'a> Args<'a> {
    fn arity(&self, fixed: usize, named: usize) -> Result<()> {
        ensure_data!(
            self.raw.fixed.len() == fixed,
            "attribute {} has {} fixed arguments, expected {}",
            self.raw.name,
            self.raw.fixed.len(),
            fixed
        );
        ensure_data!(
            self.raw.named.len() == named,
            "attribute {} has {} named arguments, expected {}",
            self.raw.name,
            self.raw.named.len(),
            named
        );
        Ok(())
    }

    fn fixed(&self, index: usize, ty: AttrArgType) -> Result<&'a AttrValue> {
        let Some(arg) = self.raw.fixed.get(index) else {
            return Err(data_violation!(
                "attribute {} has no argument {}",
                self.raw.name,
                index
            ));
        };
        ensure_data!(
            arg.ty == ty,
            "argument {} of attribute {} is {:?}, expected {:?}",
            index,
            self.raw.name,
            arg.ty,
            ty
        );
        Ok(&arg.value)
    }

    fn string(&self, index: usize) -> Result<String> {
        match self.fixed(index, AttrArgType::Str)? {
            AttrValue::Str(Some(value)) => Ok(value.clone()),
            other => Err(data_violation!(
                "argument {} of attribute {} is {:?}, expected a string",
                index,
                self.raw.name,
                other
            )),
        }
    }

    fn enum_value(&self, index: usize, ty: AttrArgType) -> Result<i32> {
        match self.fixed(index, ty)? {
            AttrValue::I32(value) => Ok(*value),
            other => Err(data_violation!(
                "argument {} of attribute {} is {:?}, expected {:?}",
                index,
                self.raw.name,
                other,
                ty
            )),
        }
    }

    /// Reads the guid spelled as `u32, u16, u16, u8 x 8` starting at argument `start`
    fn guid_parts(&self, start: usize) -> Result<uguid::Guid> {
        let AttrValue::U32(a) = self.fixed(start, AttrArgType::UInt32)? else {
            return Err(data_violation!("guid of {} lacks its first part", self.raw.name));
        };
        let AttrValue::U16(b) = self.fixed(start + 1, AttrArgType::UInt16)? else {
            return Err(data_violation!("guid of {} lacks its second part", self.raw.name));
        };
        let AttrValue::U16(c) = self.fixed(start + 2, AttrArgType::UInt16)? else {
            return Err(data_violation!("guid of {} lacks its third part", self.raw.name));
        };

        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&a.to_le_bytes());
        bytes[4..6].copy_from_slice(&b.to_le_bytes());
        bytes[6..8].copy_from_slice(&c.to_le_bytes());
        for (offset, byte) in bytes[8..].iter_mut().enumerate() {
            let AttrValue::U8(value) = self.fixed(start + 3 + offset, AttrArgType::Byte)? else {
                return Err(data_violation!("guid of {} lacks a node byte", self.raw.name));
            };
            *byte = *value;
        }

        Ok(uguid::Guid::from_bytes(bytes))
    }
}

fn named_i16(arg: &NamedArg) -> Result<i16> {
    match (&arg.arg.ty, &arg.arg.value) {
        (AttrArgType::Int16, AttrValue::I16(value)) => Ok(*value),
        _ => Err(data_violation!(
            "named argument {} is {:?}, expected Int16",
            arg.name,
            arg.arg
        )),
    }
}

fn named_i32(arg: &NamedArg) -> Result<i32> {
    match (&arg.arg.ty, &arg.arg.value) {
        (AttrArgType::Int32, AttrValue::I32(value)) => Ok(*value),
        _ => Err(data_violation!(
            "named argument {} is {:?}, expected Int32",
            arg.name,
            arg.arg
        )),
    }
}

fn named_string(arg: &NamedArg) -> Result<String> {
    match (&arg.arg.ty, &arg.arg.value) {
        (AttrArgType::Str, AttrValue::Str(Some(value))) => Ok(value.clone()),
        _ => Err(data_violation!(
            "named argument {} is {:?}, expected a string",
            arg.name,
            arg.arg
        )),
    }
}

fn named_bool(arg: &NamedArg) -> Result<bool> {
    match (&arg.arg.ty, &arg.arg.value) {
        (AttrArgType::Bool, AttrValue::Bool(value)) => Ok(*value),
        _ => Err(data_violation!(
            "named argument {} is {:?}, expected Boolean",
            arg.name,
            arg.arg
        )),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, name: &str) -> Result<()> {
    ensure_data!(slot.is_none(), "named argument {} given twice", name);
    *slot = Some(value);
    Ok(())
}

impl Attribute {
    /// Interpret a raw attribute
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] for unknown attributes and for arguments that
    /// do not match the attribute's constructor
    pub fn from_raw(raw: &RawAttribute) -> Result<Attribute> {
        let Some(origin) = Origin::of(&raw.namespace) else {
            return Err(data_violation!(
                "unhandled custom attribute \"{}\", \"{}\"",
                raw.namespace,
                raw.name
            ));
        };
        let args = Args { raw };

        let marker = |attribute: Attribute| -> Result<Attribute> {
            args.arity(0, 0)?;
            Ok(attribute)
        };

        match (origin, raw.name.as_str()) {
            (Origin::Metadata, "ConstAttribute") => marker(Attribute::Const),
            (Origin::Metadata, "NativeTypedefAttribute") => marker(Attribute::NativeTypedef),
            (Origin::Metadata, "ComOutPtrAttribute") => marker(Attribute::ComOutPtr),
            (Origin::Metadata, "NotNullTerminatedAttribute") => {
                marker(Attribute::NotNullTerminated)
            }
            (Origin::Metadata, "NullNullTerminatedAttribute") => {
                marker(Attribute::NullNullTerminated)
            }
            (Origin::Metadata, "RetValAttribute") => marker(Attribute::RetVal),
            (Origin::Metadata, "ReservedAttribute") => marker(Attribute::Reserved),
            (Origin::Metadata, "DoNotReleaseAttribute") => marker(Attribute::DoNotRelease),
            (Origin::Metadata, "ScopedEnumAttribute") => marker(Attribute::ScopedEnum),
            (Origin::Metadata, "AgileAttribute") => marker(Attribute::Agile),
            (Origin::System, "FlagsAttribute") => marker(Attribute::Flags),
            (Origin::InteropServices, "OptionalAttribute") => marker(Attribute::Optional),
            (Origin::CodeAnalysis, "DoesNotReturnAttribute") => marker(Attribute::DoesNotReturn),

            (Origin::Metadata, "NativeArrayInfoAttribute") => {
                args.arity(0, raw.named.len())?;
                let mut count_const = None;
                let mut count_param_index = None;
                let mut count_field_name = None;
                for arg in &raw.named {
                    match arg.name.as_str() {
                        "CountConst" => set_once(&mut count_const, named_i32(arg)?, &arg.name)?,
                        "CountParamIndex" => {
                            set_once(&mut count_param_index, named_i16(arg)?, &arg.name)?;
                        }
                        "CountFieldName" => {
                            set_once(&mut count_field_name, named_string(arg)?, &arg.name)?;
                        }
                        other => {
                            return Err(data_violation!(
                                "NativeArrayInfo has unknown named argument {}",
                                other
                            ))
                        }
                    }
                }
                Ok(Attribute::NativeArrayInfo {
                    count_const,
                    count_param_index,
                    count_field_name,
                })
            }
            (Origin::Metadata, "MemorySizeAttribute") => {
                args.arity(0, 1)?;
                let arg = &raw.named[0];
                ensure_data!(
                    arg.name == "BytesParamIndex",
                    "MemorySize has unknown named argument {}",
                    arg.name
                );
                Ok(Attribute::MemorySize {
                    bytes_param_index: named_i16(arg)?,
                })
            }
            (Origin::Metadata, "NativeTypeInfoAttribute") => {
                args.arity(1, 1)?;
                let value = args.enum_value(0, AttrArgType::UnmanagedType)?;
                let unmanaged_type = UnmanagedType::from_repr(value)
                    .ok_or_else(|| data_violation!("unknown UnmanagedType {}", value))?;
                let arg = &raw.named[0];
                ensure_data!(
                    arg.name == "IsNullTerminated",
                    "NativeTypeInfo has unknown named argument {}",
                    arg.name
                );
                Ok(Attribute::NativeTypeInfo {
                    unmanaged_type,
                    is_null_terminated: named_bool(arg)?,
                })
            }
            (Origin::System, "ObsoleteAttribute") => {
                args.arity(1, 0)?;
                Ok(Attribute::Obsolete(args.string(0)?))
            }
            (Origin::InteropServices, "GuidAttribute") => {
                args.arity(1, 0)?;
                let text = args.string(0)?;
                let guid = uguid::Guid::try_parse(&text)
                    .map_err(|_| data_violation!("invalid guid string '{}'", text))?;
                Ok(Attribute::Guid(guid))
            }
            (Origin::Metadata, "GuidAttribute") => {
                args.arity(11, 0)?;
                Ok(Attribute::Guid(args.guid_parts(0)?))
            }
            (Origin::Metadata, "PropertyKeyAttribute") => {
                args.arity(12, 0)?;
                let fmtid = args.guid_parts(0)?;
                let AttrValue::U32(pid) = args.fixed(11, AttrArgType::UInt32)? else {
                    return Err(data_violation!("PropertyKey lacks its property id"));
                };
                Ok(Attribute::PropertyKey(PropertyKey { fmtid, pid: *pid }))
            }
            (Origin::Metadata, "RAIIFreeAttribute") => {
                args.arity(1, 0)?;
                Ok(Attribute::RaiiFree(args.string(0)?))
            }
            (Origin::Metadata, "FreeWithAttribute") => {
                args.arity(1, 0)?;
                Ok(Attribute::FreeWith(args.string(0)?))
            }
            (Origin::InteropServices, "UnmanagedFunctionPointerAttribute") => {
                args.arity(1, 0)?;
                let value = args.enum_value(0, AttrArgType::CallConv)?;
                let convention = CallingConvention::from_repr(value)
                    .ok_or_else(|| data_violation!("unknown CallingConvention {}", value))?;
                Ok(Attribute::UnmanagedFunctionPointer(convention))
            }
            (Origin::Metadata, "SupportedArchitectureAttribute") => {
                args.arity(1, 0)?;
                let value = args.enum_value(0, AttrArgType::Architecture)?;
                let architectures = Architectures::from_bits(value)
                    .ok_or_else(|| data_violation!("unknown Architecture 0x{:X}", value))?;
                Ok(Attribute::SupportedArchitecture(architectures))
            }
            (Origin::Versioning, "SupportedOSPlatformAttribute") => {
                args.arity(1, 0)?;
                Ok(Attribute::SupportedOsPlatform(args.string(0)?))
            }
            (Origin::Metadata, "AlsoUsableForAttribute") => {
                args.arity(1, 0)?;
                Ok(Attribute::AlsoUsableFor(args.string(0)?))
            }
            (Origin::Metadata, "InvalidHandleValueAttribute") => {
                args.arity(1, 0)?;
                let AttrValue::I64(value) = args.fixed(0, AttrArgType::Int64)? else {
                    return Err(data_violation!("InvalidHandleValue lacks its value"));
                };
                Ok(Attribute::InvalidHandleValue(*value))
            }
            _ => Err(data_violation!(
                "unhandled custom attribute \"{}\", \"{}\"",
                raw.namespace,
                raw.name
            )),
        }
    }
}

/// Decode and interpret the custom attribute `token`
///
/// # Errors
/// Returns the oracle's error for damaged blobs, or [`crate::Error::DataViolation`] for
/// attributes the generator does not understand
pub fn decode_attribute(oracle: &dyn MetadataOracle, token: Token) -> Result<Attribute> {
    let raw = oracle.attribute(token, &ArgTypes)?;
    Attribute::from_raw(&raw)
}

/// Decode every attribute in `tokens`, in order
///
/// # Errors
/// Returns the first error of [`decode_attribute`]
pub fn decode_attributes(oracle: &dyn MetadataOracle, tokens: &[Token]) -> Result<Vec<Attribute>> {
    tokens
        .iter()
        .map(|token| decode_attribute(oracle, *token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::customattributes::{AttrArg, NamedArg};

    fn raw(namespace: &str, name: &str, fixed: Vec<AttrArg>, named: Vec<NamedArg>) -> RawAttribute {
        RawAttribute {
            namespace: namespace.to_string(),
            name: name.to_string(),
            fixed,
            named,
        }
    }

    fn arg(ty: AttrArgType, value: AttrValue) -> AttrArg {
        AttrArg { ty, value }
    }

    fn named(name: &str, ty: AttrArgType, value: AttrValue) -> NamedArg {
        NamedArg {
            name: name.to_string(),
            is_field: true,
            arg: arg(ty, value),
        }
    }

    fn guid_args(pid: Option<u32>) -> Vec<AttrArg> {
        let mut args = vec![
            arg(AttrArgType::UInt32, AttrValue::U32(0x1234_5678)),
            arg(AttrArgType::UInt16, AttrValue::U16(0x1234)),
            arg(AttrArgType::UInt16, AttrValue::U16(0x1234)),
        ];
        for byte in [0x12, 0x34, 0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc] {
            args.push(arg(AttrArgType::Byte, AttrValue::U8(byte)));
        }
        if let Some(pid) = pid {
            args.push(arg(AttrArgType::UInt32, AttrValue::U32(pid)));
        }
        args
    }

    #[test]
    fn markers() {
        for (namespace, name, expected) in [
            (METADATA_NAMESPACE, "ConstAttribute", Attribute::Const),
            (LEGACY_INTEROP_NAMESPACE, "ConstAttribute", Attribute::Const),
            (METADATA_NAMESPACE, "ComOutPtrAttribute", Attribute::ComOutPtr),
            ("System", "FlagsAttribute", Attribute::Flags),
            (
                "System.Runtime.InteropServices",
                "OptionalAttribute",
                Attribute::Optional,
            ),
            (
                "System.Diagnostics.CodeAnalysis",
                "DoesNotReturnAttribute",
                Attribute::DoesNotReturn,
            ),
        ] {
            assert_eq!(
                Attribute::from_raw(&raw(namespace, name, vec![], vec![])).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn arity_is_exact() {
        let extra = raw(
            METADATA_NAMESPACE,
            "ConstAttribute",
            vec![arg(AttrArgType::Int32, AttrValue::I32(1))],
            vec![],
        );
        assert!(Attribute::from_raw(&extra).unwrap_err().is_data_violation());

        let missing = raw("System", "ObsoleteAttribute", vec![], vec![]);
        assert!(Attribute::from_raw(&missing).is_err());

        let wrong_type = raw(
            "System",
            "ObsoleteAttribute",
            vec![arg(AttrArgType::Int32, AttrValue::I32(1))],
            vec![],
        );
        assert!(Attribute::from_raw(&wrong_type).is_err());
    }

    #[test]
    fn unknown_attributes() {
        let unknown = raw(METADATA_NAMESPACE, "MadeUpAttribute", vec![], vec![]);
        let error = Attribute::from_raw(&unknown).unwrap_err();
        assert!(error.is_data_violation());
        assert!(error.to_string().contains("MadeUpAttribute"));

        let foreign = raw("Some.Other", "ConstAttribute", vec![], vec![]);
        assert!(Attribute::from_raw(&foreign).is_err());
    }

    #[test]
    fn guids() {
        let text = raw(
            "System.Runtime.InteropServices",
            "GuidAttribute",
            vec![arg(
                AttrArgType::Str,
                AttrValue::Str(Some("12345678-1234-1234-1234-123456789ABC".to_string())),
            )],
            vec![],
        );
        let parts = raw(METADATA_NAMESPACE, "GuidAttribute", guid_args(None), vec![]);

        let expected = Attribute::Guid(uguid::guid!("12345678-1234-1234-1234-123456789abc"));
        assert_eq!(Attribute::from_raw(&text).unwrap(), expected);
        assert_eq!(Attribute::from_raw(&parts).unwrap(), expected);

        let key = raw(METADATA_NAMESPACE, "PropertyKeyAttribute", guid_args(Some(4)), vec![]);
        assert_eq!(
            Attribute::from_raw(&key).unwrap(),
            Attribute::PropertyKey(PropertyKey {
                fmtid: uguid::guid!("12345678-1234-1234-1234-123456789abc"),
                pid: 4,
            })
        );
    }

    #[test]
    fn named_arguments() {
        let info = raw(
            METADATA_NAMESPACE,
            "NativeArrayInfoAttribute",
            vec![],
            vec![
                named("CountParamIndex", AttrArgType::Int16, AttrValue::I16(2)),
                named("CountConst", AttrArgType::Int32, AttrValue::I32(16)),
            ],
        );
        assert_eq!(
            Attribute::from_raw(&info).unwrap(),
            Attribute::NativeArrayInfo {
                count_const: Some(16),
                count_param_index: Some(2),
                count_field_name: None,
            }
        );

        let repeated = raw(
            METADATA_NAMESPACE,
            "NativeArrayInfoAttribute",
            vec![],
            vec![
                named("CountConst", AttrArgType::Int32, AttrValue::I32(1)),
                named("CountConst", AttrArgType::Int32, AttrValue::I32(2)),
            ],
        );
        assert!(Attribute::from_raw(&repeated).is_err());

        let size = raw(
            METADATA_NAMESPACE,
            "MemorySizeAttribute",
            vec![],
            vec![named("BytesParamIndex", AttrArgType::Int16, AttrValue::I16(3))],
        );
        assert_eq!(
            Attribute::from_raw(&size).unwrap(),
            Attribute::MemorySize {
                bytes_param_index: 3
            }
        );

        let misnamed = raw(
            METADATA_NAMESPACE,
            "MemorySizeAttribute",
            vec![],
            vec![named("BytesParam", AttrArgType::Int16, AttrValue::I16(3))],
        );
        assert!(Attribute::from_raw(&misnamed).is_err());
    }

    #[test]
    fn enums() {
        let native = raw(
            METADATA_NAMESPACE,
            "NativeTypeInfoAttribute",
            vec![arg(AttrArgType::UnmanagedType, AttrValue::I32(21))],
            vec![named("IsNullTerminated", AttrArgType::Bool, AttrValue::Bool(true))],
        );
        assert_eq!(
            Attribute::from_raw(&native).unwrap(),
            Attribute::NativeTypeInfo {
                unmanaged_type: UnmanagedType::LPWStr,
                is_null_terminated: true,
            }
        );

        let arch = raw(
            METADATA_NAMESPACE,
            "SupportedArchitectureAttribute",
            vec![arg(AttrArgType::Architecture, AttrValue::I32(3))],
            vec![],
        );
        assert_eq!(
            Attribute::from_raw(&arch).unwrap(),
            Attribute::SupportedArchitecture(Architectures::X86 | Architectures::X64)
        );

        let pointer = raw(
            "System.Runtime.InteropServices",
            "UnmanagedFunctionPointerAttribute",
            vec![arg(AttrArgType::CallConv, AttrValue::I32(1))],
            vec![],
        );
        assert_eq!(
            Attribute::from_raw(&pointer).unwrap(),
            Attribute::UnmanagedFunctionPointer(CallingConvention::Winapi)
        );

        let bad = raw(
            "System.Runtime.InteropServices",
            "UnmanagedFunctionPointerAttribute",
            vec![arg(AttrArgType::CallConv, AttrValue::I32(42))],
            vec![],
        );
        assert!(Attribute::from_raw(&bad).is_err());
    }

    #[test]
    fn architectures_serialize_as_names() {
        let json = serde_json::to_string(&(Architectures::X64 | Architectures::ARM64)).unwrap();
        assert_eq!(json, r#"["X64","Arm64"]"#);
        assert_eq!(serde_json::to_string(&Architectures::empty()).unwrap(), "[]");
    }

    #[test]
    fn argument_types() {
        assert_eq!(ArgTypes.primitive(ELEMENT_TYPE::I2).unwrap(), AttrArgType::Int16);
        assert!(ArgTypes.primitive(ELEMENT_TYPE::R8).is_err());
        assert_eq!(
            ArgTypes
                .from_reference("System.Runtime.InteropServices", "CallingConvention")
                .unwrap(),
            AttrArgType::CallConv
        );
        assert_eq!(
            ArgTypes
                .from_serialized_name(
                    "System.Runtime.InteropServices.UnmanagedType, System.Runtime, Version=4.0.0.0"
                )
                .unwrap(),
            AttrArgType::UnmanagedType
        );
        assert!(ArgTypes.from_reference("System", "Object").is_err());
    }
}
