//! In-memory metadata.
//!
//! [`MetadataBuilder`] implements [`MetadataOracle`] over definitions assembled in code. Tokens
//! are handed out in creation order per table, exactly like rows of a real `#~` stream.
//! Attribute arguments are encoded into a real custom attribute blob and decoded through the
//! same parser [`WinMd`](crate::metadata::winmd::WinMd) uses.
//!
//! ```rust
//! use win32json::metadata::{
//!     builder::MetadataBuilder,
//!     flags::{FieldAttributes, TypeAttributes},
//!     signatures::TypeSignature,
//!     MetadataOracle, ResolutionScope,
//! };
//!
//! let mut builder = MetadataBuilder::new();
//! let value_type = builder.add_type_ref(
//!     "System",
//!     "ValueType",
//!     ResolutionScope::AssemblyRef("netstandard".into()),
//! );
//! let point = builder.add_type_def(
//!     "Windows.Win32.Foundation",
//!     "POINT",
//!     TypeAttributes::PUBLIC | TypeAttributes::SEQUENTIAL_LAYOUT,
//!     Some(value_type),
//! );
//! builder.add_field(point, "x", FieldAttributes::PUBLIC, TypeSignature::I4);
//!
//! assert_eq!(builder.type_def(point)?.fields.len(), 1);
//! # Ok::<(), win32json::Error>(())
//! ```

use std::collections::HashMap;

use crate::{
    metadata::{
        constants::ConstantValue,
        customattributes::{
            encode_custom_attribute, parse_custom_attribute_blob, AttrArgTypeProvider, AttrValue,
            CtorParamType, NamedArgSpec, RawAttribute,
        },
        flags::{
            FieldAttributes, MethodAttributes, MethodImplAttributes, ParamAttributes,
            TypeAttributes,
        },
        signatures::{SignatureField, SignatureMethod, TypeSignature},
        tables::TableId,
        token::Token,
        FieldInfo, ImportInfo, MetadataOracle, MethodInfo, ParamInfo, ResolutionScope,
        TypeDefInfo, TypeLayout, TypeRefInfo,
    },
    Error, Result,
};

struct StoredAttribute {
    namespace: String,
    name: String,
    params: Vec<CtorParamType>,
    blob: Vec<u8>,
}

/// Assembles metadata definitions in memory.
#[derive(Default)]
pub struct MetadataBuilder {
    type_defs: Vec<TypeDefInfo>,
    type_refs: Vec<TypeRefInfo>,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodInfo>,
    /// `Param` token -> (method index, parameter index)
    params: HashMap<Token, (usize, usize)>,
    attributes: Vec<StoredAttribute>,
}

fn index_of(token: Token, table: TableId, len: usize) -> Result<usize> {
    let index = token.row() as usize;
    if !token.is_table(table) || index == 0 || index > len {
        return Err(Error::TokenNotFound(token));
    }

    Ok(index - 1)
}

fn next_token(table: TableId, len: usize) -> Token {
    #[allow(clippy::cast_possible_truncation)]
    Token::from_parts(table, len as u32 + 1)
}

impl MetadataBuilder {
    /// An empty module
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type reference
    pub fn add_type_ref(&mut self, namespace: &str, name: &str, scope: ResolutionScope) -> Token {
        let token = next_token(TableId::TypeRef, self.type_refs.len());
        self.type_refs.push(TypeRefInfo {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            scope,
        });
        token
    }

    /// Add a type definition without members
    pub fn add_type_def(
        &mut self,
        namespace: &str,
        name: &str,
        flags: TypeAttributes,
        extends: Option<Token>,
    ) -> Token {
        let token = next_token(TableId::TypeDef, self.type_defs.len());
        self.type_defs.push(TypeDefInfo {
            token,
            name: name.to_string(),
            namespace: namespace.to_string(),
            flags,
            enclosing: None,
            extends,
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
            interfaces: Vec::new(),
            layout: None,
            nested: Vec::new(),
            event_count: 0,
            property_count: 0,
            generic_param_count: 0,
            method_impl_count: 0,
            decl_security_count: 0,
        });
        token
    }

    /// Mutable access to a type definition, for shapes the other helpers do not cover
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `token` is not a type definition of this builder
    pub fn type_def_mut(&mut self, token: Token) -> Result<&mut TypeDefInfo> {
        let index = index_of(token, TableId::TypeDef, self.type_defs.len())?;
        Ok(&mut self.type_defs[index])
    }

    /// Declare `nested` inside `enclosing`
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if either token is unknown
    pub fn nest(&mut self, nested: Token, enclosing: Token) -> Result<()> {
        self.type_def_mut(nested)?.enclosing = Some(enclosing);
        self.type_def_mut(enclosing)?.nested.push(nested);
        Ok(())
    }

    /// Set the explicit layout of a type
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `owner` is unknown
    pub fn set_layout(&mut self, owner: Token, packing_size: u16, class_size: u32) -> Result<()> {
        self.type_def_mut(owner)?.layout = Some(TypeLayout {
            packing_size,
            class_size,
        });
        Ok(())
    }

    /// Add an interface implementation to `owner`
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `owner` is unknown
    pub fn add_interface(&mut self, owner: Token, interface: Token) -> Result<()> {
        self.type_def_mut(owner)?.interfaces.push(interface);
        Ok(())
    }

    /// Add a field to `owner`
    ///
    /// # Panics
    /// Panics if `owner` is not a type definition of this builder
    pub fn add_field(
        &mut self,
        owner: Token,
        name: &str,
        flags: FieldAttributes,
        signature: TypeSignature,
    ) -> Token {
        let token = next_token(TableId::Field, self.fields.len());
        self.fields.push(FieldInfo {
            token,
            name: name.to_string(),
            flags,
            signature: SignatureField {
                modifiers: Vec::new(),
                base: signature,
            },
            constant: None,
            offset: None,
            has_rva: false,
            attributes: Vec::new(),
        });

        let owner = &mut self.type_defs[owner.row() as usize - 1];
        owner.fields.push(token);
        token
    }

    /// Mutable access to a field, to set its constant, offset or RVA flag
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `token` is not a field of this builder
    pub fn field_mut(&mut self, token: Token) -> Result<&mut FieldInfo> {
        let index = index_of(token, TableId::Field, self.fields.len())?;
        Ok(&mut self.fields[index])
    }

    /// Give a field its constant value
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `field` is unknown
    pub fn set_constant(&mut self, field: Token, value: ConstantValue) -> Result<()> {
        self.field_mut(field)?.constant = Some(value);
        Ok(())
    }

    /// Add a method to `owner`
    ///
    /// # Panics
    /// Panics if `owner` is not a type definition of this builder
    pub fn add_method(
        &mut self,
        owner: Token,
        name: &str,
        flags: MethodAttributes,
        impl_flags: MethodImplAttributes,
        signature: SignatureMethod,
    ) -> Token {
        let token = next_token(TableId::MethodDef, self.methods.len());
        self.methods.push(MethodInfo {
            token,
            name: name.to_string(),
            flags,
            impl_flags,
            signature,
            params: Vec::new(),
            import: None,
            attributes: Vec::new(),
            decl_security_count: 0,
        });

        let owner = &mut self.type_defs[owner.row() as usize - 1];
        owner.methods.push(token);
        token
    }

    /// Mutable access to a method
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `token` is not a method of this builder
    pub fn method_mut(&mut self, token: Token) -> Result<&mut MethodInfo> {
        let index = index_of(token, TableId::MethodDef, self.methods.len())?;
        Ok(&mut self.methods[index])
    }

    /// Add a parameter row to `method`, sequence 0 describes the return value
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `method` is unknown
    pub fn add_param(
        &mut self,
        method: Token,
        sequence: u16,
        name: &str,
        flags: ParamAttributes,
    ) -> Result<Token> {
        let method_index = index_of(method, TableId::MethodDef, self.methods.len())?;
        let token = next_token(TableId::Param, self.params.len());

        let params = &mut self.methods[method_index].params;
        self.params.insert(token, (method_index, params.len()));
        params.push(ParamInfo {
            token,
            name: name.to_string(),
            sequence,
            flags,
            has_default: false,
            attributes: Vec::new(),
        });
        Ok(token)
    }

    /// Mark `method` as imported from `module`
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `method` is unknown
    pub fn set_import(&mut self, method: Token, import: ImportInfo) -> Result<()> {
        self.method_mut(method)?.import = Some(import);
        Ok(())
    }

    /// Attach a custom attribute to `parent`
    ///
    /// `params` is the constructor signature, `fixed` and `named` the arguments. They are
    /// encoded into a blob the way a compiler would emit them.
    ///
    /// # Errors
    /// Returns [`Error::TokenNotFound`] if `parent` is unknown or cannot carry attributes
    pub fn add_attribute(
        &mut self,
        parent: Token,
        namespace: &str,
        name: &str,
        params: Vec<CtorParamType>,
        fixed: &[AttrValue],
        named: &[NamedArgSpec],
    ) -> Result<Token> {
        let token = next_token(TableId::CustomAttribute, self.attributes.len());

        let list = if parent.is_table(TableId::TypeDef) {
            &mut self.type_def_mut(parent)?.attributes
        } else if parent.is_table(TableId::Field) {
            &mut self.field_mut(parent)?.attributes
        } else if parent.is_table(TableId::MethodDef) {
            &mut self.method_mut(parent)?.attributes
        } else if parent.is_table(TableId::Param) {
            let Some((method, param)) = self.params.get(&parent).copied() else {
                return Err(Error::TokenNotFound(parent));
            };
            &mut self.methods[method].params[param].attributes
        } else {
            return Err(Error::TokenNotFound(parent));
        };
        list.push(token);

        self.attributes.push(StoredAttribute {
            namespace: namespace.to_string(),
            name: name.to_string(),
            params,
            blob: encode_custom_attribute(fixed, named),
        });
        Ok(token)
    }
}

impl MetadataOracle for MetadataBuilder {
    fn type_defs(&self) -> Vec<Token> {
        self.type_defs.iter().map(|type_def| type_def.token).collect()
    }

    fn type_def(&self, token: Token) -> Result<TypeDefInfo> {
        let index = index_of(token, TableId::TypeDef, self.type_defs.len())?;
        Ok(self.type_defs[index].clone())
    }

    fn type_ref(&self, token: Token) -> Result<TypeRefInfo> {
        let index = index_of(token, TableId::TypeRef, self.type_refs.len())?;
        Ok(self.type_refs[index].clone())
    }

    fn field(&self, token: Token) -> Result<FieldInfo> {
        let index = index_of(token, TableId::Field, self.fields.len())?;
        Ok(self.fields[index].clone())
    }

    fn method(&self, token: Token) -> Result<MethodInfo> {
        let index = index_of(token, TableId::MethodDef, self.methods.len())?;
        Ok(self.methods[index].clone())
    }

    fn attribute(&self, token: Token, provider: &dyn AttrArgTypeProvider) -> Result<RawAttribute> {
        let index = index_of(token, TableId::CustomAttribute, self.attributes.len())?;
        let stored = &self.attributes[index];
        let (fixed, named) = parse_custom_attribute_blob(&stored.blob, &stored.params, provider)?;

        Ok(RawAttribute {
            namespace: stored.namespace.clone(),
            name: stored.name.clone(),
            fixed,
            named,
        })
    }
}
