use crate::metadata::token::Token;

/// A row of the `ModuleRef` table
#[derive(Clone, Debug)]
pub struct ModuleRefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x1A` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Index into `#Strings` for the DLL name
    pub name: u32,
}
