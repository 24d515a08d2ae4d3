use crate::metadata::token::Token;

/// A decoded type of a signature
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TypeSignature {
    /// Placeholder for a missing type
    #[default]
    Unknown,
    /// `void`
    Void,
    /// `bool`
    Boolean,
    /// `char`, a UTF-16 code unit
    Char,
    /// `int8`
    I1,
    /// `uint8`
    U1,
    /// `int16`
    I2,
    /// `uint16`
    U2,
    /// `int32`
    I4,
    /// `uint32`
    U4,
    /// `int64`
    I8,
    /// `uint64`
    U8,
    /// `float32`
    R4,
    /// `float64`
    R8,
    /// `string`
    String,
    /// Unmanaged pointer
    Ptr(SignaturePointer),
    /// Managed reference
    ByRef(Box<TypeSignature>),
    /// A value type, `TypeDefOrRefOrSpecEncoded`
    ValueType(Token),
    /// A reference type, `TypeDefOrRefOrSpecEncoded`
    Class(Token),
    /// Generic parameter of a type
    GenericParamType(u32),
    /// Multi-dimensional array
    Array(SignatureArray),
    /// Generic instantiation
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// `typedref`
    TypedByRef,
    /// Native signed integer
    I,
    /// Native unsigned integer
    U,
    /// Function pointer
    FnPtr(Box<SignatureMethod>),
    /// `object`
    Object,
    /// Single-dimensional zero-based array
    SzArray(SignatureSzArray),
    /// Generic parameter of a method
    GenericParamMethod(u32),
    /// Required custom modifiers
    ModifiedRequired(Vec<Token>),
    /// Optional custom modifiers
    ModifiedOptional(Vec<Token>),
    /// Runtime internal type
    Internal,
    /// Pinned local
    Pinned(Box<TypeSignature>),
}

/// Size and lower bound of one array dimension
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayDimensions {
    /// Number of elements, if given
    pub size: Option<u32>,
    /// Lower bound, if given
    pub lower_bound: Option<u32>,
}

/// A multi-dimensional array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureArray {
    /// Element type
    pub base: Box<TypeSignature>,
    /// Number of dimensions
    pub rank: u32,
    /// Sizes and lower bounds, may list fewer entries than `rank`
    pub dimensions: Vec<ArrayDimensions>,
}

/// A single-dimensional zero-based array
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureSzArray {
    /// Custom modifiers on the element type
    pub modifiers: Vec<Token>,
    /// Element type
    pub base: Box<TypeSignature>,
}

/// An unmanaged pointer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePointer {
    /// Custom modifiers on the pointee
    pub modifiers: Vec<Token>,
    /// Pointee type
    pub base: Box<TypeSignature>,
}

/// A parameter or return type of a method signature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureParameter {
    /// Custom modifiers
    pub modifiers: Vec<Token>,
    /// Passed by reference
    pub by_ref: bool,
    /// Type
    pub base: TypeSignature,
}

/// A method signature
#[derive(Debug, Clone, PartialEq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SignatureMethod {
    /// Instance method
    pub has_this: bool,
    /// `this` is passed explicitly
    pub explicit_this: bool,
    /// Managed default calling convention
    pub default: bool,
    /// Variable argument list
    pub vararg: bool,
    /// `cdecl`
    pub cdecl: bool,
    /// `stdcall`
    pub stdcall: bool,
    /// `thiscall`
    pub thiscall: bool,
    /// `fastcall`
    pub fastcall: bool,
    /// Number of generic parameters
    pub param_count_generic: u32,
    /// Number of parameters, including varargs
    pub param_count: u32,
    /// Return type
    pub return_type: SignatureParameter,
    /// Fixed parameters
    pub params: Vec<SignatureParameter>,
    /// Parameters following the sentinel
    pub varargs: Vec<SignatureParameter>,
}

/// A field signature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureField {
    /// Custom modifiers
    pub modifiers: Vec<Token>,
    /// Type
    pub base: TypeSignature,
}

/// A `TypeSpec` signature
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignatureTypeSpec {
    /// The specified type
    pub base: TypeSignature,
}
