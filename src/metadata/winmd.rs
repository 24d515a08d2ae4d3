//! Reader for `.winmd` files.
//!
//! [`WinMd`] keeps the file mapped and borrows the metadata heaps and tables straight out of it.
//! The few reverse lookups the oracle needs (nesting, attributes per parent, layouts, imports)
//! are indexed once while loading, everything else is decoded on demand per token.
//!
//! # Examples
//!
//! ```rust,no_run
//! use win32json::metadata::{winmd::WinMd, MetadataOracle};
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! println!("{} ({})", winmd.module_name()?, winmd.version());
//! println!("{} type definitions", winmd.type_defs().len());
//! # Ok::<(), win32json::Error>(())
//! ```

use std::{
    collections::{HashMap, HashSet},
    ops::Range,
    path::Path,
    sync::Arc,
};

use log::debug;
use ouroboros::self_referencing;

use crate::{
    file::File,
    metadata::{
        constants::ConstantValue,
        cor20header::Cor20Header,
        customattributes::{
            parse_custom_attribute_blob, AttrArgTypeProvider, CtorParamType, RawAttribute,
        },
        flags::{
            FieldAttributes, MethodAttributes, MethodImplAttributes, PInvokeAttributes,
            ParamAttributes, TypeAttributes,
        },
        root::Root,
        signatures::{parse_field_signature, parse_method_signature, TypeSignature, ELEMENT_TYPE},
        streams::{Blob, Guid, Strings, TablesHeader},
        tables::{
            AssemblyRefRaw, ClassLayoutRaw, ConstantRaw, CustomAttributeRaw, DeclSecurityRaw,
            EventMapRaw, FieldLayoutRaw, FieldRVARaw, FieldRaw, GenericParamRaw, ImplMapRaw,
            InterfaceImplRaw, MemberRefRaw, MethodDefRaw, MethodImplRaw, ModuleRaw,
            ModuleRefRaw, NestedClassRaw, ParamRaw, PropertyMapRaw, TableId, TypeDefRaw,
            TypeRefRaw,
        },
        token::Token,
        FieldInfo, ImportInfo, MetadataOracle, MethodInfo, ParamInfo, ResolutionScope,
        TypeDefInfo, TypeLayout, TypeRefInfo,
    },
    Error, Result,
};

/// Reverse lookups built once per file
#[derive(Default)]
struct Index {
    /// nested `TypeDef` row -> enclosing `TypeDef` row
    enclosing: HashMap<u32, u32>,
    /// enclosing `TypeDef` row -> nested rows in table order
    nested: HashMap<u32, Vec<u32>>,
    attributes: HashMap<Token, Vec<Token>>,
    interfaces: HashMap<u32, Vec<Token>>,
    layouts: HashMap<u32, TypeLayout>,
    field_offsets: HashMap<u32, u32>,
    field_rvas: HashSet<u32>,
    /// parent token -> (element type, blob index)
    constants: HashMap<Token, (u8, u32)>,
    imports: HashMap<u32, ImplMapRaw>,
    events: HashMap<u32, usize>,
    properties: HashMap<u32, usize>,
    generic_params: HashMap<Token, usize>,
    method_impls: HashMap<u32, usize>,
    decl_security: HashMap<Token, usize>,
    /// `method_list` of every `TypeDef` row, used to find the owner of a method
    method_starts: Vec<u32>,
}

impl Index {
    fn build(tables: &TablesHeader) -> Result<Index> {
        let mut index = Index::default();

        for row in tables.table::<NestedClassRaw>()?.rows()? {
            if index
                .enclosing
                .insert(row.nested_class, row.enclosing_class)
                .is_some()
            {
                return Err(malformed_error!(
                    "TypeDef row {} has more than one enclosing type",
                    row.nested_class
                ));
            }
            index
                .nested
                .entry(row.enclosing_class)
                .or_default()
                .push(row.nested_class);
        }

        for row in tables.table::<CustomAttributeRaw>()?.rows()? {
            index
                .attributes
                .entry(row.parent.token)
                .or_default()
                .push(row.token);
        }

        for row in tables.table::<InterfaceImplRaw>()?.rows()? {
            index
                .interfaces
                .entry(row.class)
                .or_default()
                .push(row.interface.token);
        }

        for row in tables.table::<ClassLayoutRaw>()?.rows()? {
            index.layouts.insert(
                row.parent,
                TypeLayout {
                    packing_size: row.packing_size,
                    class_size: row.class_size,
                },
            );
        }

        for row in tables.table::<FieldLayoutRaw>()?.rows()? {
            index.field_offsets.insert(row.field, row.field_offset);
        }

        for row in tables.table::<FieldRVARaw>()?.rows()? {
            index.field_rvas.insert(row.field);
        }

        for row in tables.table::<ConstantRaw>()?.rows()? {
            index
                .constants
                .insert(row.parent.token, (row.base, row.value));
        }

        for row in tables.table::<ImplMapRaw>()?.rows()? {
            if row.member_forwarded.tag == TableId::MethodDef {
                index.imports.insert(row.member_forwarded.row, row);
            }
        }

        let event_maps = tables.table::<EventMapRaw>()?.rows()?;
        for (position, row) in event_maps.iter().enumerate() {
            let next = event_maps.get(position + 1).map(|next| next.event_list);
            let range = list_range(row.event_list, next, tables.row_count(TableId::Event))?;
            index.events.insert(row.parent, range_len(&range));
        }

        let property_maps = tables.table::<PropertyMapRaw>()?.rows()?;
        for (position, row) in property_maps.iter().enumerate() {
            let next = property_maps
                .get(position + 1)
                .map(|next| next.property_list);
            let range = list_range(row.property_list, next, tables.row_count(TableId::Property))?;
            index.properties.insert(row.parent, range_len(&range));
        }

        for row in tables.table::<GenericParamRaw>()?.rows()? {
            *index.generic_params.entry(row.owner.token).or_default() += 1;
        }

        for row in tables.table::<MethodImplRaw>()?.rows()? {
            *index.method_impls.entry(row.class).or_default() += 1;
        }

        for row in tables.table::<DeclSecurityRaw>()?.rows()? {
            *index.decl_security.entry(row.parent.token).or_default() += 1;
        }

        index.method_starts = tables
            .table::<TypeDefRaw>()?
            .rows()?
            .iter()
            .map(|row| row.method_list)
            .collect();

        Ok(index)
    }
}

/// The rows `start..next` of a member list, `next` defaults to the end of the member table
fn list_range(start: u32, next: Option<u32>, member_rows: u32) -> Result<Range<u32>> {
    let end = next.unwrap_or(member_rows + 1);
    if start == 0 || start > end || end > member_rows + 1 {
        return Err(malformed_error!(
            "Invalid member list {}..{} for a table of {} rows",
            start,
            end,
            member_rows
        ));
    }

    Ok(start..end)
}

fn range_len(range: &Range<u32>) -> usize {
    (range.end - range.start) as usize
}

struct WinMdData<'a> {
    cor20header: Cor20Header,
    root: Root,
    tables: TablesHeader<'a>,
    strings: Strings<'a>,
    blobs: Blob<'a>,
    guids: Option<Guid<'a>>,
    index: Index,
}

impl<'a> WinMdData<'a> {
    fn from_file(file: &File, data: &'a [u8]) -> Result<WinMdData<'a>> {
        let (clr_rva, clr_size) = file.clr();
        let clr_offset = file.rva_to_offset(clr_rva)?;
        let Some(clr_data) = clr_offset
            .checked_add(clr_size)
            .and_then(|end| data.get(clr_offset..end))
        else {
            return Err(out_of_bounds_error!());
        };
        let cor20header = Cor20Header::read(clr_data)?;

        let metadata_offset = file.rva_to_offset(cor20header.meta_data_rva as usize)?;
        let Some(metadata) = metadata_offset
            .checked_add(cor20header.meta_data_size as usize)
            .and_then(|end| data.get(metadata_offset..end))
        else {
            return Err(out_of_bounds_error!());
        };
        let root = Root::read(metadata)?;

        let mut tables = None;
        let mut strings = None;
        let mut blobs = None;
        let mut guids = None;

        for stream in &root.stream_headers {
            let start = stream.offset as usize;
            let Some(stream_data) = start
                .checked_add(stream.size as usize)
                .and_then(|end| metadata.get(start..end))
            else {
                return Err(out_of_bounds_error!());
            };

            match stream.name.as_str() {
                "#~" => tables = Some(TablesHeader::from(stream_data)?),
                "#Strings" => strings = Some(Strings::from(stream_data)?),
                "#Blob" => blobs = Some(Blob::from(stream_data)?),
                "#GUID" => guids = Some(Guid::from(stream_data)?),
                _ => {}
            }
        }

        let Some(tables) = tables else {
            return Err(malformed_error!("Metadata has no #~ stream"));
        };
        let Some(strings) = strings else {
            return Err(malformed_error!("Metadata has no #Strings stream"));
        };
        let Some(blobs) = blobs else {
            return Err(malformed_error!("Metadata has no #Blob stream"));
        };

        let index = Index::build(&tables)?;
        debug!(
            "loaded metadata {} with {} tables, {} type definitions",
            root.version,
            tables.table_count(),
            tables.row_count(TableId::TypeDef)
        );

        Ok(WinMdData {
            cor20header,
            root,
            tables,
            strings,
            blobs,
            guids,
            index,
        })
    }

    fn string(&self, index: u32) -> Result<String> {
        Ok(self.strings.get(index as usize)?.to_string())
    }

    fn blob(&self, index: u32) -> Result<&'a [u8]> {
        self.blobs.get(index as usize)
    }

    /// The row of `token`, which has to point into `table`
    fn rid(&self, token: Token, table: TableId) -> Result<u32> {
        if !token.is_table(table) || token.is_nil() || token.row() > self.tables.row_count(table)
        {
            return Err(Error::TokenNotFound(token));
        }

        Ok(token.row())
    }

    fn module_name(&self) -> Result<String> {
        let module = self.tables.table::<ModuleRaw>()?.get(1)?;
        self.string(module.name)
    }

    fn mvid(&self) -> Result<Option<uguid::Guid>> {
        let module = self.tables.table::<ModuleRaw>()?.get(1)?;
        match &self.guids {
            Some(guids) if module.mvid != 0 => Ok(Some(guids.get(module.mvid as usize)?)),
            _ => Ok(None),
        }
    }

    fn module_ref_name(&self, rid: u32) -> Result<String> {
        let module_ref = self.tables.table::<ModuleRefRaw>()?.get(rid)?;
        self.string(module_ref.name)
    }

    /// Namespace and name of a `TypeDef` or `TypeRef`
    fn type_name(&self, token: Token) -> Result<(String, String)> {
        if token.is_table(TableId::TypeRef) {
            let row = self.tables.table::<TypeRefRaw>()?.get(token.row())?;
            Ok((self.string(row.type_namespace)?, self.string(row.type_name)?))
        } else if token.is_table(TableId::TypeDef) {
            let row = self.tables.table::<TypeDefRaw>()?.get(token.row())?;
            Ok((self.string(row.type_namespace)?, self.string(row.type_name)?))
        } else {
            Err(malformed_error!(
                "Expected a TypeDef or TypeRef token - {:?}",
                token
            ))
        }
    }

    /// The `TypeDef` row whose method list contains method row `rid`
    fn method_owner(&self, rid: u32) -> Result<u32> {
        let position = self
            .index
            .method_starts
            .partition_point(|start| *start <= rid);
        if position == 0 {
            return Err(malformed_error!("MethodDef row {} has no owner", rid));
        }

        u32::try_from(position).map_err(|_| out_of_bounds_error!())
    }

    fn ctor_param(&self, signature: &TypeSignature) -> Result<CtorParamType> {
        let element_type = match signature {
            TypeSignature::Boolean => ELEMENT_TYPE::BOOLEAN,
            TypeSignature::Char => ELEMENT_TYPE::CHAR,
            TypeSignature::I1 => ELEMENT_TYPE::I1,
            TypeSignature::U1 => ELEMENT_TYPE::U1,
            TypeSignature::I2 => ELEMENT_TYPE::I2,
            TypeSignature::U2 => ELEMENT_TYPE::U2,
            TypeSignature::I4 => ELEMENT_TYPE::I4,
            TypeSignature::U4 => ELEMENT_TYPE::U4,
            TypeSignature::I8 => ELEMENT_TYPE::I8,
            TypeSignature::U8 => ELEMENT_TYPE::U8,
            TypeSignature::R4 => ELEMENT_TYPE::R4,
            TypeSignature::R8 => ELEMENT_TYPE::R8,
            TypeSignature::String => ELEMENT_TYPE::STRING,
            TypeSignature::Class(token) | TypeSignature::ValueType(token) => {
                let (namespace, name) = self.type_name(*token)?;
                return Ok(CtorParamType::Reference { namespace, name });
            }
            other => {
                return Err(malformed_error!(
                    "Unsupported attribute constructor parameter - {:?}",
                    other
                ))
            }
        };

        Ok(CtorParamType::Primitive(element_type))
    }

    fn attributes_of(&self, token: Token) -> Vec<Token> {
        self.index
            .attributes
            .get(&token)
            .cloned()
            .unwrap_or_default()
    }

    fn type_def(&self, token: Token) -> Result<TypeDefInfo> {
        let rid = self.rid(token, TableId::TypeDef)?;
        let table = self.tables.table::<TypeDefRaw>()?;
        let row = table.get(rid)?;
        let next = if rid < table.row_count() {
            Some(table.get(rid + 1)?)
        } else {
            None
        };

        let fields = list_range(
            row.field_list,
            next.as_ref().map(|next| next.field_list),
            self.tables.row_count(TableId::Field),
        )?
        .map(|field| Token::from_parts(TableId::Field, field))
        .collect();

        let methods = list_range(
            row.method_list,
            next.as_ref().map(|next| next.method_list),
            self.tables.row_count(TableId::MethodDef),
        )?
        .map(|method| Token::from_parts(TableId::MethodDef, method))
        .collect();

        let nested = self
            .index
            .nested
            .get(&rid)
            .map(|rows| {
                rows.iter()
                    .map(|nested| Token::from_parts(TableId::TypeDef, *nested))
                    .collect()
            })
            .unwrap_or_default();

        Ok(TypeDefInfo {
            token,
            name: self.string(row.type_name)?,
            namespace: self.string(row.type_namespace)?,
            flags: TypeAttributes::from_bits_retain(row.flags),
            enclosing: self
                .index
                .enclosing
                .get(&rid)
                .map(|enclosing| Token::from_parts(TableId::TypeDef, *enclosing)),
            extends: if row.extends.is_null() {
                None
            } else {
                Some(row.extends.token)
            },
            fields,
            methods,
            attributes: self.attributes_of(token),
            interfaces: self.index.interfaces.get(&rid).cloned().unwrap_or_default(),
            layout: self.index.layouts.get(&rid).copied(),
            nested,
            event_count: self.index.events.get(&rid).copied().unwrap_or(0),
            property_count: self.index.properties.get(&rid).copied().unwrap_or(0),
            generic_param_count: self.index.generic_params.get(&token).copied().unwrap_or(0),
            method_impl_count: self.index.method_impls.get(&rid).copied().unwrap_or(0),
            decl_security_count: self.index.decl_security.get(&token).copied().unwrap_or(0),
        })
    }

    fn type_ref(&self, token: Token) -> Result<TypeRefInfo> {
        let rid = self.rid(token, TableId::TypeRef)?;
        let row = self.tables.table::<TypeRefRaw>()?.get(rid)?;

        let scope = if row.resolution_scope.is_null() {
            ResolutionScope::Nil
        } else {
            match row.resolution_scope.tag {
                TableId::Module => ResolutionScope::Module,
                TableId::ModuleRef => {
                    ResolutionScope::ModuleRef(self.module_ref_name(row.resolution_scope.row)?)
                }
                TableId::AssemblyRef => {
                    let assembly_ref = self
                        .tables
                        .table::<AssemblyRefRaw>()?
                        .get(row.resolution_scope.row)?;
                    ResolutionScope::AssemblyRef(self.string(assembly_ref.name)?)
                }
                TableId::TypeRef => ResolutionScope::TypeRef(row.resolution_scope.token),
                other => {
                    return Err(malformed_error!(
                        "Invalid resolution scope table - {:?}",
                        other
                    ))
                }
            }
        };

        Ok(TypeRefInfo {
            token,
            namespace: self.string(row.type_namespace)?,
            name: self.string(row.type_name)?,
            scope,
        })
    }

    fn field(&self, token: Token) -> Result<FieldInfo> {
        let rid = self.rid(token, TableId::Field)?;
        let row = self.tables.table::<FieldRaw>()?.get(rid)?;

        let constant = match self.index.constants.get(&token) {
            Some((base, value)) => Some(ConstantValue::decode(*base, self.blob(*value)?)?),
            None => None,
        };

        Ok(FieldInfo {
            token,
            name: self.string(row.name)?,
            flags: FieldAttributes::from_bits_retain(row.flags),
            signature: parse_field_signature(self.blob(row.signature)?)?,
            constant,
            offset: self.index.field_offsets.get(&rid).copied(),
            has_rva: self.index.field_rvas.contains(&rid),
            attributes: self.attributes_of(token),
        })
    }

    fn method(&self, token: Token) -> Result<MethodInfo> {
        let rid = self.rid(token, TableId::MethodDef)?;
        let table = self.tables.table::<MethodDefRaw>()?;
        let row = table.get(rid)?;
        let next = if rid < table.row_count() {
            Some(table.get(rid + 1)?.param_list)
        } else {
            None
        };

        let param_table = self.tables.table::<ParamRaw>()?;
        let mut params = Vec::new();
        for param_rid in list_range(row.param_list, next, param_table.row_count())? {
            let param = param_table.get(param_rid)?;
            let flags = ParamAttributes::from_bits_retain(param.flags);
            let sequence = u16::try_from(param.sequence).map_err(|_| {
                malformed_error!("Param row {} has sequence {}", param_rid, param.sequence)
            })?;

            params.push(ParamInfo {
                token: param.token,
                name: self.string(param.name)?,
                sequence,
                flags,
                has_default: flags.contains(ParamAttributes::HAS_DEFAULT)
                    || self.index.constants.contains_key(&param.token),
                attributes: self.attributes_of(param.token),
            });
        }

        let import = match self.index.imports.get(&rid) {
            Some(import) => Some(ImportInfo {
                flags: PInvokeAttributes::from_bits_retain(import.mapping_flags),
                name: self.string(import.import_name)?,
                module: self.module_ref_name(import.import_scope)?,
            }),
            None => None,
        };

        Ok(MethodInfo {
            token,
            name: self.string(row.name)?,
            flags: MethodAttributes::from_bits_retain(row.flags),
            impl_flags: MethodImplAttributes::from_bits_retain(row.impl_flags),
            signature: parse_method_signature(self.blob(row.signature)?)?,
            params,
            import,
            attributes: self.attributes_of(token),
            decl_security_count: self.index.decl_security.get(&token).copied().unwrap_or(0),
        })
    }

    fn attribute(&self, token: Token, provider: &dyn AttrArgTypeProvider) -> Result<RawAttribute> {
        let rid = self.rid(token, TableId::CustomAttribute)?;
        let row = self.tables.table::<CustomAttributeRaw>()?.get(rid)?;

        let (namespace, name, signature) = match row.constructor.tag {
            TableId::MemberRef => {
                let member = self
                    .tables
                    .table::<MemberRefRaw>()?
                    .get(row.constructor.row)?;
                let (namespace, name) = self.type_name(member.class.token)?;
                (namespace, name, member.signature)
            }
            TableId::MethodDef => {
                let method = self
                    .tables
                    .table::<MethodDefRaw>()?
                    .get(row.constructor.row)?;
                let owner = self.method_owner(row.constructor.row)?;
                let (namespace, name) =
                    self.type_name(Token::from_parts(TableId::TypeDef, owner))?;
                (namespace, name, method.signature)
            }
            other => {
                return Err(malformed_error!(
                    "Invalid attribute constructor table - {:?}",
                    other
                ))
            }
        };

        let signature = parse_method_signature(self.blob(signature)?)?;
        let params = signature
            .params
            .iter()
            .map(|param| self.ctor_param(&param.base))
            .collect::<Result<Vec<CtorParamType>>>()?;

        let (fixed, named) = parse_custom_attribute_blob(self.blob(row.value)?, &params, provider)?;

        Ok(RawAttribute {
            namespace,
            name,
            fixed,
            named,
        })
    }
}

#[self_referencing]
/// A loaded `.winmd` file.
///
/// The metadata stays borrowed from the mapped file, definitions are decoded when the
/// [`MetadataOracle`] methods ask for them.
pub struct WinMd {
    file: Arc<File>,

    #[borrows(file)]
    #[not_covariant]
    data: WinMdData<'this>,
}

impl WinMd {
    /// Memory-map and load the winmd at `file`
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE file with CLR metadata, or the
    /// metadata is damaged
    pub fn from_file(file: &Path) -> Result<Self> {
        let input = Arc::new(File::from_file(file)?);
        Self::load(input)
    }

    /// Load a winmd image held in memory
    ///
    /// # Errors
    /// Returns an error if the data is not a PE file with CLR metadata, or the metadata is
    /// damaged
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        let input = Arc::new(File::from_mem(data)?);
        Self::load(input)
    }

    fn load(file: Arc<File>) -> Result<Self> {
        WinMd::try_new(file, |file| WinMdData::from_file(file, file.data()))
    }

    /// The CLR runtime header
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        self.with_data(|data| &data.cor20header)
    }

    /// The metadata root
    #[must_use]
    pub fn metadata_root(&self) -> &Root {
        self.with_data(|data| &data.root)
    }

    /// The metadata version string, e.g. `WindowsRuntime 1.4`
    #[must_use]
    pub fn version(&self) -> String {
        self.with_data(|data| data.root.version.clone())
    }

    /// Number of rows in `table`
    #[must_use]
    pub fn row_count(&self, table: TableId) -> u32 {
        self.with_data(|data| data.tables.row_count(table))
    }

    /// Name of the module, from the `Module` table
    ///
    /// # Errors
    /// Returns an error if the module row is missing or damaged
    pub fn module_name(&self) -> Result<String> {
        self.with_data(|data| data.module_name())
    }

    /// The module version id, `None` if the module has none
    ///
    /// # Errors
    /// Returns an error if the module row is missing or damaged
    pub fn mvid(&self) -> Result<Option<uguid::Guid>> {
        self.with_data(|data| data.mvid())
    }
}

impl MetadataOracle for WinMd {
    fn type_defs(&self) -> Vec<Token> {
        let count = self.row_count(TableId::TypeDef);
        (1..=count)
            .map(|rid| Token::from_parts(TableId::TypeDef, rid))
            .collect()
    }

    fn type_def(&self, token: Token) -> Result<TypeDefInfo> {
        self.with_data(|data| data.type_def(token))
    }

    fn type_ref(&self, token: Token) -> Result<TypeRefInfo> {
        self.with_data(|data| data.type_ref(token))
    }

    fn field(&self, token: Token) -> Result<FieldInfo> {
        self.with_data(|data| data.field(token))
    }

    fn method(&self, token: Token) -> Result<MethodInfo> {
        self.with_data(|data| data.method(token))
    }

    fn attribute(&self, token: Token, provider: &dyn AttrArgTypeProvider) -> Result<RawAttribute> {
        self.with_data(|data| data.attribute(token, provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            customattributes::{AttrArgType, AttrValue},
            tables::CodedIndexType,
        },
        test::{coded, MetadataWriter},
    };

    struct ArchitectureOnly;

    impl AttrArgTypeProvider for ArchitectureOnly {
        fn primitive(&self, element_type: u8) -> Result<AttrArgType> {
            Err(malformed_error!("primitive 0x{:02X}", element_type))
        }

        fn system_type(&self) -> Result<AttrArgType> {
            Err(malformed_error!("System.Type"))
        }

        fn from_reference(&self, namespace: &str, name: &str) -> Result<AttrArgType> {
            match (namespace, name) {
                ("Windows.Win32.Foundation.Metadata", "Architecture") => {
                    Ok(AttrArgType::Architecture)
                }
                _ => Err(malformed_error!("{}.{}", namespace, name)),
            }
        }

        fn from_serialized_name(&self, name: &str) -> Result<AttrArgType> {
            Err(malformed_error!("{}", name))
        }
    }

    fn sample() -> Vec<u8> {
        let mut writer = MetadataWriter::new();
        let metadata_ns = "Windows.Win32.Foundation.Metadata";

        let module_name = writer.string("Windows.Win32.winmd");
        let mvid = writer.guid([
            0x78, 0x56, 0x34, 0x12, 0x34, 0x12, 0x34, 0x12, 0x12, 0x34, 0x12, 0x34, 0x56, 0x78,
            0x9A, 0xBC,
        ]);
        writer.row(TableId::Module, &[0, module_name, mvid, 0, 0]);

        let netstandard = writer.string("netstandard");
        writer.row(TableId::AssemblyRef, &[2, 1, 0, 0, 0, 0, netstandard, 0, 0]);

        let system = writer.string("System");
        let assembly_scope = coded(CodedIndexType::ResolutionScope, TableId::AssemblyRef, 1);
        let module_scope = coded(CodedIndexType::ResolutionScope, TableId::Module, 1);
        let names = [
            (assembly_scope, "Enum", "System"),
            (assembly_scope, "ValueType", "System"),
            (module_scope, "SupportedArchitectureAttribute", metadata_ns),
            (module_scope, "Architecture", metadata_ns),
            (
                coded(CodedIndexType::ResolutionScope, TableId::TypeRef, 6),
                "_Anonymous_e__Union",
                "",
            ),
            (module_scope, "OUTER", "Windows.Win32.Foo"),
            (assembly_scope, "Object", "System"),
        ];
        for (scope, name, namespace) in names {
            let name = writer.string(name);
            let namespace = if namespace == "System" {
                system
            } else {
                writer.string(namespace)
            };
            writer.row(TableId::TypeRef, &[scope, name, namespace]);
        }

        let foo_ns = writer.string("Windows.Win32.Foo");
        let object = coded(CodedIndexType::TypeDefOrRef, TableId::TypeRef, 7);
        let value_type = coded(CodedIndexType::TypeDefOrRef, TableId::TypeRef, 2);
        let module_type = writer.string("<Module>");
        let apis = writer.string("Apis");
        let outer = writer.string("OUTER");
        let union = writer.string("_Anonymous_e__Union");
        writer.row(TableId::TypeDef, &[0, module_type, 0, 0, 1, 1]);
        writer.row(TableId::TypeDef, &[0x0010_0181, apis, foo_ns, object, 1, 1]);
        writer.row(TableId::TypeDef, &[0x0000_0109, outer, foo_ns, value_type, 2, 2]);
        writer.row(TableId::TypeDef, &[0x0000_0112, union, 0, value_type, 3, 2]);

        let foo_value = writer.string("FOO_VALUE");
        let i4_signature = writer.blob(&[0x06, 0x08]);
        writer.row(TableId::Field, &[0x8056, foo_value, i4_signature]);
        let a = writer.string("a");
        let union_signature = writer.blob(&[0x06, 0x11, 0x10]);
        writer.row(TableId::Field, &[0x0006, a, union_signature]);
        let x = writer.string("x");
        let u4_signature = writer.blob(&[0x06, 0x09]);
        writer.row(TableId::Field, &[0x0006, x, u4_signature]);

        let beep = writer.string("Beep");
        let beep_signature = writer.blob(&[0x00, 0x02, 0x02, 0x09, 0x09]);
        writer.row(TableId::MethodDef, &[0, 0x0080, 0x2096, beep, beep_signature, 1]);
        let frequency = writer.string("dwFreq");
        let duration = writer.string("dwDuration");
        writer.row(TableId::Param, &[0x0001, 1, frequency]);
        writer.row(TableId::Param, &[0x0001, 2, duration]);

        let forty_two = writer.blob(&42i32.to_le_bytes());
        writer.row(
            TableId::Constant,
            &[0x08, 0, coded(CodedIndexType::HasConstant, TableId::Field, 1), forty_two],
        );

        let ctor = writer.string(".ctor");
        let ctor_signature = writer.blob(&[0x20, 0x01, 0x01, 0x11, 0x11]);
        writer.row(
            TableId::MemberRef,
            &[
                coded(CodedIndexType::MemberRefParent, TableId::TypeRef, 3),
                ctor,
                ctor_signature,
            ],
        );
        let arguments = writer.blob(&[0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00]);
        writer.row(
            TableId::CustomAttribute,
            &[
                coded(CodedIndexType::HasCustomAttribute, TableId::MethodDef, 1),
                coded(CodedIndexType::CustomAttributeType, TableId::MemberRef, 1),
                arguments,
            ],
        );

        writer.row(TableId::ClassLayout, &[4, 8, 4]);
        writer.row(TableId::FieldLayout, &[0, 3]);

        let kernel32 = writer.string("KERNEL32.dll");
        writer.row(TableId::ModuleRef, &[kernel32]);
        writer.row(
            TableId::ImplMap,
            &[
                0x0141,
                coded(CodedIndexType::MemberForwarded, TableId::MethodDef, 1),
                beep,
                1,
            ],
        );

        writer.row(TableId::NestedClass, &[4, 3]);

        writer.image()
    }

    #[test]
    fn loads_module() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        assert_eq!(winmd.version(), "WindowsRuntime 1.4");
        assert_eq!(winmd.module_name().unwrap(), "Windows.Win32.winmd");
        assert_eq!(
            winmd.mvid().unwrap(),
            Some(uguid::guid!("12345678-1234-1234-1234-123456789abc"))
        );
        assert_eq!(winmd.cor20header().meta_data_rva, 0x2048);
        assert_eq!(winmd.row_count(TableId::TypeDef), 4);
        assert_eq!(winmd.type_defs().len(), 4);
    }

    #[test]
    fn type_definitions() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        let apis = winmd.type_def(Token::new(0x0200_0002)).unwrap();
        assert_eq!(apis.name, "Apis");
        assert_eq!(apis.namespace, "Windows.Win32.Foo");
        assert_eq!(apis.fields, vec![Token::new(0x0400_0001)]);
        assert_eq!(apis.methods, vec![Token::new(0x0600_0001)]);
        assert_eq!(apis.extends, Some(Token::new(0x0100_0007)));
        assert!(apis.flags.contains(TypeAttributes::ABSTRACT | TypeAttributes::SEALED));

        let outer = winmd.type_def(Token::new(0x0200_0003)).unwrap();
        assert!(outer.flags.is_sequential());
        assert_eq!(outer.fields, vec![Token::new(0x0400_0002)]);
        assert!(outer.methods.is_empty());
        assert_eq!(outer.nested, vec![Token::new(0x0200_0004)]);
        assert_eq!(outer.enclosing, None);
        assert_eq!(outer.layout, None);

        let union = winmd.type_def(Token::new(0x0200_0004)).unwrap();
        assert!(union.flags.is_explicit());
        assert_eq!(union.namespace, "");
        assert_eq!(union.enclosing, Some(Token::new(0x0200_0003)));
        assert_eq!(
            union.layout,
            Some(TypeLayout {
                packing_size: 4,
                class_size: 8
            })
        );
        assert_eq!(union.event_count, 0);
        assert_eq!(union.generic_param_count, 0);
    }

    #[test]
    fn fields() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        let constant = winmd.field(Token::new(0x0400_0001)).unwrap();
        assert_eq!(constant.name, "FOO_VALUE");
        assert_eq!(constant.signature.base, TypeSignature::I4);
        assert_eq!(constant.constant, Some(ConstantValue::I4(42)));
        assert!(constant.flags.contains(FieldAttributes::LITERAL));

        let nested = winmd.field(Token::new(0x0400_0002)).unwrap();
        assert_eq!(
            nested.signature.base,
            TypeSignature::ValueType(Token::new(0x0200_0004))
        );
        assert_eq!(nested.offset, None);

        let member = winmd.field(Token::new(0x0400_0003)).unwrap();
        assert_eq!(member.offset, Some(0));
        assert!(!member.has_rva);
    }

    #[test]
    fn methods_and_imports() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        let beep = winmd.method(Token::new(0x0600_0001)).unwrap();
        assert_eq!(beep.name, "Beep");
        assert!(beep.flags.contains(MethodAttributes::PINVOKE_IMPL));
        assert!(beep.impl_flags.contains(MethodImplAttributes::PRESERVE_SIG));
        assert_eq!(beep.signature.return_type.base, TypeSignature::Boolean);
        assert_eq!(beep.signature.params.len(), 2);

        let names = beep
            .params
            .iter()
            .map(|param| (param.sequence, param.name.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(names, vec![(1, "dwFreq"), (2, "dwDuration")]);
        assert!(beep.params[0].flags.contains(ParamAttributes::IN));
        assert!(!beep.params[0].has_default);

        let import = beep.import.unwrap();
        assert_eq!(import.module, "KERNEL32.dll");
        assert_eq!(import.name, "Beep");
        assert!(import.flags.contains(PInvokeAttributes::SUPPORTS_LAST_ERROR));
        assert_eq!(import.flags.call_conv(), PInvokeAttributes::CALL_CONV_WINAPI.bits());

        assert_eq!(beep.attributes, vec![Token::new(0x0C00_0001)]);
    }

    #[test]
    fn attributes() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        let attribute = winmd
            .attribute(Token::new(0x0C00_0001), &ArchitectureOnly)
            .unwrap();
        assert_eq!(attribute.namespace, "Windows.Win32.Foundation.Metadata");
        assert_eq!(attribute.name, "SupportedArchitectureAttribute");
        assert_eq!(attribute.fixed.len(), 1);
        assert_eq!(attribute.fixed[0].ty, AttrArgType::Architecture);
        assert_eq!(attribute.fixed[0].value, AttrValue::I32(3));
        assert!(attribute.named.is_empty());
    }

    #[test]
    fn type_references() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        let enum_ref = winmd.type_ref(Token::new(0x0100_0001)).unwrap();
        assert_eq!(enum_ref.namespace, "System");
        assert_eq!(enum_ref.name, "Enum");
        assert_eq!(
            enum_ref.scope,
            ResolutionScope::AssemblyRef("netstandard".to_string())
        );

        let nested = winmd.type_ref(Token::new(0x0100_0005)).unwrap();
        assert_eq!(nested.scope, ResolutionScope::TypeRef(Token::new(0x0100_0006)));

        let outer = winmd.type_ref(Token::new(0x0100_0006)).unwrap();
        assert_eq!(outer.scope, ResolutionScope::Module);
    }

    #[test]
    fn unknown_tokens() {
        let winmd = WinMd::from_mem(sample()).unwrap();

        assert!(matches!(
            winmd.type_def(Token::new(0x0200_0005)),
            Err(Error::TokenNotFound(_))
        ));
        assert!(matches!(
            winmd.type_def(Token::new(0x0100_0001)),
            Err(Error::TokenNotFound(_))
        ));
        assert!(matches!(
            winmd.field(Token::new(0x0400_0000)),
            Err(Error::TokenNotFound(_))
        ));
    }

    #[test]
    fn invalid_images() {
        assert!(matches!(WinMd::from_mem(Vec::new()), Err(Error::Empty)));
        assert!(WinMd::from_mem(vec![0xCC; 1024]).is_err());

        let mut image = sample();
        // corrupt the metadata signature
        let metadata = (crate::test::TEXT_FILE_OFFSET + crate::test::CLR_HEADER_SIZE) as usize;
        image[metadata] = 0x00;
        assert!(WinMd::from_mem(image).is_err());
    }
}
