use crate::Result;

/// The closed set of argument types attribute blobs of a winmd may use.
///
/// Enum types carry an underlying integer type that decides how their values are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrArgType {
    /// `bool`
    Bool,
    /// `uint8`
    Byte,
    /// `int16`
    Int16,
    /// `uint16`
    UInt16,
    /// `int32`
    Int32,
    /// `uint32`
    UInt32,
    /// `int64`
    Int64,
    /// `string`
    Str,
    /// `System.Type`, serialized as the type name
    SystemType,
    /// `System.Runtime.InteropServices.CallingConvention`
    CallConv,
    /// `System.Runtime.InteropServices.UnmanagedType`
    UnmanagedType,
    /// `Windows.Win32.Foundation.Metadata.Architecture`
    Architecture,
}

impl AttrArgType {
    /// The type values of this type are stored as
    #[must_use]
    pub fn underlying(self) -> AttrArgType {
        match self {
            AttrArgType::CallConv | AttrArgType::UnmanagedType | AttrArgType::Architecture => {
                AttrArgType::Int32
            }
            other => other,
        }
    }
}

/// A decoded argument value, typed by the storage type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// `bool`
    Bool(bool),
    /// `uint8`
    U8(u8),
    /// `int16`
    I16(i16),
    /// `uint16`
    U16(u16),
    /// `int32`, also the storage of every enum type
    I32(i32),
    /// `uint32`
    U32(u32),
    /// `int64`
    I64(i64),
    /// A string, `None` for the serialized null string
    Str(Option<String>),
    /// A type name, `None` for the serialized null string
    Type(Option<String>),
}

/// One argument of an attribute instance
#[derive(Debug, Clone, PartialEq)]
pub struct AttrArg {
    /// Declared type
    pub ty: AttrArgType,
    /// Value
    pub value: AttrValue,
}

/// A named field or property argument
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    /// Field or property name
    pub name: String,
    /// `true` for a field, `false` for a property
    pub is_field: bool,
    /// Type and value
    pub arg: AttrArg,
}

/// A custom attribute with its arguments decoded but not yet interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttribute {
    /// Namespace of the attribute type
    pub namespace: String,
    /// Name of the attribute type
    pub name: String,
    /// Constructor arguments in declaration order
    pub fixed: Vec<AttrArg>,
    /// Named arguments in blob order
    pub named: Vec<NamedArg>,
}

/// Type of a constructor parameter, taken from the constructor signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CtorParamType {
    /// A primitive element type (`ELEMENT_TYPE_*`)
    Primitive(u8),
    /// A class or value type, named by its namespace and name
    Reference {
        /// Namespace of the referenced type
        namespace: String,
        /// Name of the referenced type
        name: String,
    },
}

/// Type tag of a named argument as stored in the blob (`FieldOrPropType`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOrPropType {
    /// A primitive element type
    Primitive(u8),
    /// `System.Type`
    SystemType,
    /// An enum, named by its serialized type name
    Enum(String),
}

/// Maps the type descriptions found in attribute metadata to [`AttrArgType`].
///
/// The metadata layer only knows how argument types are spelled, the caller decides which
/// spellings are acceptable.
pub trait AttrArgTypeProvider {
    /// A primitive element type
    ///
    /// # Errors
    /// Returns an error if the element type is not supported
    fn primitive(&self, element_type: u8) -> Result<AttrArgType>;

    /// `System.Type`
    ///
    /// # Errors
    /// Returns an error if type arguments are not supported
    fn system_type(&self) -> Result<AttrArgType>;

    /// A class or value type of a constructor parameter
    ///
    /// # Errors
    /// Returns an error if the type is not supported
    fn from_reference(&self, namespace: &str, name: &str) -> Result<AttrArgType>;

    /// An enum type of a named argument, given as assembly qualified name
    ///
    /// # Errors
    /// Returns an error if the type is not supported
    fn from_serialized_name(&self, name: &str) -> Result<AttrArgType>;
}

impl CtorParamType {
    /// Resolve this parameter type through `provider`
    ///
    /// # Errors
    /// Returns the error of `provider` for unsupported types
    pub fn resolve(&self, provider: &dyn AttrArgTypeProvider) -> Result<AttrArgType> {
        match self {
            CtorParamType::Primitive(element_type) => provider.primitive(*element_type),
            CtorParamType::Reference { namespace, name } => {
                provider.from_reference(namespace, name)
            }
        }
    }
}

impl FieldOrPropType {
    /// Resolve this named argument type through `provider`
    ///
    /// # Errors
    /// Returns the error of `provider` for unsupported types
    pub fn resolve(&self, provider: &dyn AttrArgTypeProvider) -> Result<AttrArgType> {
        match self {
            FieldOrPropType::Primitive(element_type) => provider.primitive(*element_type),
            FieldOrPropType::SystemType => provider.system_type(),
            FieldOrPropType::Enum(name) => provider.from_serialized_name(name),
        }
    }
}
