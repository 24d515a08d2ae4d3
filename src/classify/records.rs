//! The classified records, in the shape they are written.

use serde::{Serialize, Serializer};

use crate::{
    attributes::{Architectures, CallingConvention, PropertyKey, UnmanagedType},
    typesystem::{NativeType, TypeRef},
};

fn guid_string<S: Serializer>(guid: &uguid::Guid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(guid)
}

fn optional_guid_string<S: Serializer>(
    guid: &Option<uguid::Guid>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match guid {
        Some(guid) => serializer.collect_str(guid),
        None => serializer.serialize_none(),
    }
}

/// A marker attribute, written as its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum Marker {
    In,
    Out,
    Optional,
    Const,
    ComOutPtr,
    NotNullTerminated,
    NullNullTerminated,
    RetVal,
    Reserved,
    DoNotRelease,
    DoesNotReturn,
}

/// An attribute with arguments, written as an object with a `Kind`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "Kind")]
pub enum Detail {
    /// Element count of a pointer
    NativeArrayInfo {
        /// Fixed element count
        #[serde(rename = "CountConst", skip_serializing_if = "Option::is_none")]
        count_const: Option<i32>,
        /// Index of the parameter holding the count
        #[serde(rename = "CountParamIndex", skip_serializing_if = "Option::is_none")]
        count_param_index: Option<i16>,
        /// Field holding the count
        #[serde(rename = "CountFieldName", skip_serializing_if = "Option::is_none")]
        count_field_name: Option<String>,
    },
    /// Parameter holding the buffer size in bytes
    MemorySize {
        /// Parameter index
        #[serde(rename = "BytesParamIndex")]
        bytes_param_index: i16,
    },
    /// Release function of the value
    FreeWith {
        /// Function name
        #[serde(rename = "Func")]
        func: String,
    },
    /// Marshalling hint
    NativeTypeInfo {
        /// Unmanaged representation
        #[serde(rename = "UnmanagedType")]
        unmanaged_type: UnmanagedType,
        /// Null terminated
        #[serde(rename = "IsNullTerminated")]
        is_null_terminated: bool,
    },
    /// Deprecated
    Obsolete {
        /// Message
        #[serde(rename = "Message")]
        message: String,
    },
}

/// One entry of an `Attrs` list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Attr {
    /// Written as a string
    Marker(Marker),
    /// Written as an object
    Detail(Detail),
}

impl Attr {
    /// `true` if this is `marker`
    #[must_use]
    pub fn is(&self, marker: Marker) -> bool {
        *self == Attr::Marker(marker)
    }
}

impl From<Marker> for Attr {
    fn from(marker: Marker) -> Self {
        Attr::Marker(marker)
    }
}

impl From<Detail> for Attr {
    fn from(detail: Detail) -> Self {
        Attr::Detail(detail)
    }
}

/// A free constant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstantRecord {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Declared type
    #[serde(rename = "Type")]
    pub ty: TypeRef,
    /// Type of `value`, a native type name or `PropertyKey`
    #[serde(rename = "ValueType")]
    pub value_type: &'static str,
    /// The value
    #[serde(rename = "Value")]
    pub value: serde_json::Value,
    /// Attributes
    #[serde(rename = "Attrs")]
    pub attrs: Vec<Attr>,
}

impl ConstantRecord {
    /// The value of a property key constant
    #[must_use]
    pub fn property_key_value(key: &PropertyKey) -> serde_json::Value {
        serde_json::json!({
            "Fmtid": key.fmtid.to_string(),
            "Pid": key.pid,
        })
    }
}

/// A parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamRecord {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Type
    #[serde(rename = "Type")]
    pub ty: TypeRef,
    /// Direction, optionality and annotations
    #[serde(rename = "Attrs")]
    pub attrs: Vec<Attr>,
}

/// A free function or COM method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionRecord {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Sets the thread's last error
    #[serde(rename = "SetLastError")]
    pub set_last_error: bool,
    /// Module the function is imported from, absent for COM methods
    #[serde(rename = "DllImport", skip_serializing_if = "Option::is_none")]
    pub dll_import: Option<String>,
    /// Return type
    #[serde(rename = "ReturnType")]
    pub return_type: TypeRef,
    /// Annotations of the return value
    #[serde(rename = "ReturnAttrs")]
    pub return_attrs: Vec<Attr>,
    /// Platforms the function exists on, empty for all
    #[serde(rename = "Architectures")]
    pub architectures: Architectures,
    /// Minimum OS platform
    #[serde(rename = "Platform")]
    pub platform: Option<String>,
    /// Function annotations
    #[serde(rename = "Attrs")]
    pub attrs: Vec<Attr>,
    /// Parameters
    #[serde(rename = "Params")]
    pub params: Vec<ParamRecord>,
}

/// A struct or union field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRecord {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Type
    #[serde(rename = "Type")]
    pub ty: TypeRef,
    /// Annotations
    #[serde(rename = "Attrs")]
    pub attrs: Vec<Attr>,
}

/// A member of an enum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Value
    #[serde(rename = "Value")]
    pub value: serde_json::Value,
}

/// The shape-specific part of a [`TypeRecord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "Kind")]
pub enum TypeKind {
    /// A distinct name for another type
    NativeTypedef {
        /// Handle type this one may also be passed as
        #[serde(rename = "AlsoUsableFor")]
        also_usable_for: Option<String>,
        /// The underlying type
        #[serde(rename = "Def")]
        def: TypeRef,
        /// Function that releases values of this type
        #[serde(rename = "FreeFunc")]
        free_func: Option<String>,
        /// Values that mark an invalid handle
        #[serde(rename = "InvalidHandleValues")]
        invalid_handle_values: Vec<i64>,
    },
    /// An enumeration
    Enum {
        /// Values combine as bit flags
        #[serde(rename = "Flags")]
        flags: bool,
        /// Values are accessed through the enum name
        #[serde(rename = "Scoped")]
        scoped: bool,
        /// Members in declaration order
        #[serde(rename = "Values")]
        values: Vec<EnumValue>,
        /// The integer type of the values
        #[serde(rename = "IntegerBase")]
        integer_base: NativeType,
    },
    /// A structure with sequential layout
    Struct {
        /// Declared size, 0 if not given
        #[serde(rename = "Size")]
        size: u32,
        /// Field alignment, 0 for the default
        #[serde(rename = "PackingSize")]
        packing_size: u16,
        /// Fields in declaration order
        #[serde(rename = "Fields")]
        fields: Vec<FieldRecord>,
    },
    /// A structure whose fields all start at offset 0
    Union {
        /// Declared size, 0 if not given
        #[serde(rename = "Size")]
        size: u32,
        /// Field alignment, 0 for the default
        #[serde(rename = "PackingSize")]
        packing_size: u16,
        /// Fields in declaration order
        #[serde(rename = "Fields")]
        fields: Vec<FieldRecord>,
    },
    /// The class id of a COM class
    #[serde(rename = "ComClassID")]
    ComClassId {
        /// Class id
        #[serde(rename = "Guid", serialize_with = "guid_string")]
        guid: uguid::Guid,
    },
    /// A COM interface
    Com {
        /// Interface id
        #[serde(rename = "Guid", serialize_with = "optional_guid_string")]
        guid: Option<uguid::Guid>,
        /// The interface is agile
        #[serde(rename = "Agile")]
        agile: bool,
        /// Base interface
        #[serde(rename = "Interface")]
        interface: Option<TypeRef>,
        /// Methods in vtable order
        #[serde(rename = "Methods")]
        methods: Vec<FunctionRecord>,
    },
    /// A callback type
    FunctionPointer {
        /// Calling convention
        #[serde(rename = "CallingConvention")]
        calling_convention: CallingConvention,
        /// Return type
        #[serde(rename = "ReturnType")]
        return_type: TypeRef,
        /// Annotations of the return value
        #[serde(rename = "ReturnAttrs")]
        return_attrs: Vec<Attr>,
        /// Parameters
        #[serde(rename = "Params")]
        params: Vec<ParamRecord>,
    },
}

impl TypeKind {
    /// The `Kind` string
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::NativeTypedef { .. } => "NativeTypedef",
            TypeKind::Enum { .. } => "Enum",
            TypeKind::Struct { .. } => "Struct",
            TypeKind::Union { .. } => "Union",
            TypeKind::ComClassId { .. } => "ComClassID",
            TypeKind::Com { .. } => "Com",
            TypeKind::FunctionPointer { .. } => "FunctionPointer",
        }
    }
}

/// A classified type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRecord {
    /// Name
    #[serde(rename = "Name")]
    pub name: String,
    /// Platforms the type exists on, empty for all
    #[serde(rename = "Architectures")]
    pub architectures: Architectures,
    /// Minimum OS platform
    #[serde(rename = "Platform")]
    pub platform: Option<String>,
    /// Shape
    #[serde(flatten)]
    pub kind: TypeKind,
    /// Nested types in declaration order
    #[serde(rename = "NestedTypes")]
    pub nested_types: Vec<TypeRecord>,
}

/// Everything classified for one API group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRecords {
    /// Free constants
    pub constants: Vec<ConstantRecord>,
    /// Top-level types
    pub types: Vec<TypeRecord>,
    /// Free functions
    pub functions: Vec<FunctionRecord>,
}
