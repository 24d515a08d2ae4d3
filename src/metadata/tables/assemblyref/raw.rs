use crate::metadata::token::Token;

/// A row of the `AssemblyRef` table
#[derive(Clone, Debug)]
pub struct AssemblyRefRaw {
    /// Row id, 1-based
    pub rid: u32,
    /// Token of this row (`0x23` table)
    pub token: Token,
    /// Byte offset of the row within the table
    pub offset: usize,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags` bitmask
    pub flags: u32,
    /// Index into `#Blob` for the key or token
    pub public_key_or_token: u32,
    /// Index into `#Strings`
    pub name: u32,
    /// Index into `#Strings`, 0 for neutral
    pub culture: u32,
    /// Index into `#Blob`
    pub hash_value: u32,
}
