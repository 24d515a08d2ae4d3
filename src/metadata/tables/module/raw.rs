use crate::metadata::token::Token;

/// A row of the `Module` table
#[derive(Clone, Debug)]
pub struct ModuleRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x00` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Reserved, always 0
    pub generation: u32,
    /// Index into `#Strings` for the module name
    pub name: u32,
    /// Index into `#GUID` for the module version id
    pub mvid: u32,
    /// Index into `#GUID`, reserved
    pub encid: u32,
    /// Index into `#GUID`, reserved
    pub encbaseid: u32,
}
