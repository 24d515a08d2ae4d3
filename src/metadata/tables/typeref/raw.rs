use crate::metadata::{tables::CodedIndex, token::Token};

/// A row of the `TypeRef` table
#[derive(Clone, Debug)]
pub struct TypeRefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x01` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// `ResolutionScope` coded index, the scope the type is found in
    pub resolution_scope: CodedIndex,
    /// Index into `#Strings` for the type name
    pub type_name: u32,
    /// Index into `#Strings` for the namespace, 0 for nested types
    pub type_namespace: u32,
}
