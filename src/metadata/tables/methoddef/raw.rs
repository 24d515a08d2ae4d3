use crate::metadata::token::Token;

/// A row of the `MethodDef` table
#[derive(Clone, Debug)]
pub struct MethodDefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x06` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// RVA of the method body, 0 for every method of a winmd
    pub rva: u32,
    /// `MethodImplAttributes` bitmask
    pub impl_flags: u32,
    /// `MethodAttributes` bitmask
    pub flags: u32,
    /// Index into `#Strings`
    pub name: u32,
    /// Index into `#Blob` for the method signature
    pub signature: u32,
    /// First row of the `Param` table owned by this method
    pub param_list: u32,
}
