use crate::{
    metadata::{
        constants::ConstantValue,
        customattributes::{AttrArgTypeProvider, RawAttribute},
        flags::{
            FieldAttributes, MethodAttributes, MethodImplAttributes, PInvokeAttributes,
            ParamAttributes, TypeAttributes,
        },
        signatures::{SignatureField, SignatureMethod},
        token::Token,
    },
    Result,
};

/// Explicit packing and size of a type, from the `ClassLayout` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeLayout {
    /// Field alignment, 0 for the default
    pub packing_size: u16,
    /// Total size, 0 if not given
    pub class_size: u32,
}

/// A type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefInfo {
    /// `TypeDef` token
    pub token: Token,
    /// Simple name
    pub name: String,
    /// Namespace, empty for nested types
    pub namespace: String,
    /// Flags
    pub flags: TypeAttributes,
    /// The declaring type of a nested type
    pub enclosing: Option<Token>,
    /// Base type, a `TypeDef`, `TypeRef` or `TypeSpec` token
    pub extends: Option<Token>,
    /// Fields in declaration order
    pub fields: Vec<Token>,
    /// Methods in declaration order
    pub methods: Vec<Token>,
    /// Custom attributes
    pub attributes: Vec<Token>,
    /// Implemented interfaces
    pub interfaces: Vec<Token>,
    /// Explicit packing and size
    pub layout: Option<TypeLayout>,
    /// Types declared inside this one
    pub nested: Vec<Token>,
    /// Number of events
    pub event_count: usize,
    /// Number of properties
    pub property_count: usize,
    /// Number of generic parameters
    pub generic_param_count: usize,
    /// Number of method implementations
    pub method_impl_count: usize,
    /// Number of declarative security entries
    pub decl_security_count: usize,
}

/// Where a type reference is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionScope {
    /// The current module
    Module,
    /// Another module of this assembly
    ModuleRef(String),
    /// Another assembly
    AssemblyRef(String),
    /// A type reference, the referenced type is nested in it
    TypeRef(Token),
    /// No scope, the type is looked up in `ExportedType`
    Nil,
}

/// A type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefInfo {
    /// `TypeRef` token
    pub token: Token,
    /// Namespace, empty for nested references
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Resolution scope
    pub scope: ResolutionScope,
}

/// A field definition
#[derive(Debug, Clone)]
pub struct FieldInfo {
    /// `Field` token
    pub token: Token,
    /// Name
    pub name: String,
    /// Flags
    pub flags: FieldAttributes,
    /// Decoded signature
    pub signature: SignatureField,
    /// Default value from the `Constant` table
    pub constant: Option<ConstantValue>,
    /// Explicit offset from the `FieldLayout` table
    pub offset: Option<u32>,
    /// `true` if the field has an RVA entry
    pub has_rva: bool,
    /// Custom attributes
    pub attributes: Vec<Token>,
}

/// A parameter row, sequence 0 describes the return value
#[derive(Debug, Clone)]
pub struct ParamInfo {
    /// `Param` token
    pub token: Token,
    /// Name
    pub name: String,
    /// Position, 0 for the return value
    pub sequence: u16,
    /// Flags
    pub flags: ParamAttributes,
    /// `true` if the parameter has a default value
    pub has_default: bool,
    /// Custom attributes
    pub attributes: Vec<Token>,
}

/// A P/Invoke import of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Mapping flags
    pub flags: PInvokeAttributes,
    /// Entry point name
    pub name: String,
    /// Name of the imported module
    pub module: String,
}

/// A method definition
#[derive(Debug, Clone)]
pub struct MethodInfo {
    /// `MethodDef` token
    pub token: Token,
    /// Name
    pub name: String,
    /// Flags
    pub flags: MethodAttributes,
    /// Implementation flags
    pub impl_flags: MethodImplAttributes,
    /// Decoded signature
    pub signature: SignatureMethod,
    /// Parameter rows ordered as stored
    pub params: Vec<ParamInfo>,
    /// P/Invoke import
    pub import: Option<ImportInfo>,
    /// Custom attributes
    pub attributes: Vec<Token>,
    /// Number of declarative security entries
    pub decl_security_count: usize,
}

/// Read access to the definitions of one metadata module.
///
/// Every accessor takes a token handed out by the oracle itself, a token of the wrong table is
/// an error rather than a panic.
pub trait MetadataOracle {
    /// All type definitions in table order
    fn type_defs(&self) -> Vec<Token>;

    /// A type definition
    ///
    /// # Errors
    /// Returns an error for an unknown token or damaged metadata
    fn type_def(&self, token: Token) -> Result<TypeDefInfo>;

    /// A type reference
    ///
    /// # Errors
    /// Returns an error for an unknown token or damaged metadata
    fn type_ref(&self, token: Token) -> Result<TypeRefInfo>;

    /// A field definition
    ///
    /// # Errors
    /// Returns an error for an unknown token or damaged metadata
    fn field(&self, token: Token) -> Result<FieldInfo>;

    /// A method definition
    ///
    /// # Errors
    /// Returns an error for an unknown token or damaged metadata
    fn method(&self, token: Token) -> Result<MethodInfo>;

    /// A custom attribute with its arguments decoded, argument types are mapped by `provider`
    ///
    /// # Errors
    /// Returns an error for an unknown token, damaged metadata, or an argument type `provider`
    /// rejects
    fn attribute(&self, token: Token, provider: &dyn AttrArgTypeProvider) -> Result<RawAttribute>;
}
