use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `TypeDef` table
#[derive(Clone, Debug)]
pub struct TypeDefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x02` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `TypeAttributes` bitmask
    pub flags: u32,
    /// Index into `#Strings` for the type name
    pub type_name: u32,
    /// Index into `#Strings` for the namespace
    pub type_namespace: u32,
    /// `TypeDefOrRef` coded index of the base type, null for interfaces
    pub extends: CodedIndex,
    /// First row of the `Field` table owned by this type
    pub field_list: u32,
    /// First row of the `MethodDef` table owned by this type
    pub method_list: u32,
}
