use strum::IntoEnumIterator;

use crate::{
    file::io::{read_le, read_le_at},
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef},
    Error::NotSupported,
    Result,
};

/// Tables that only appear in unoptimized (`#-`) or edit-and-continue metadata
const UNSUPPORTED_TABLES: [TableId; 7] = [
    TableId::FieldPtr,
    TableId::MethodPtr,
    TableId::ParamPtr,
    TableId::EventPtr,
    TableId::PropertyPtr,
    TableId::EncLog,
    TableId::EncMap,
];

/// The header of the `#~` stream, and typed access to the tables that follow it
/// (ECMA-335 II.24.2.6).
///
/// Every table is stored back to back in [`TableId`] order, so the offset of a table depends on
/// the row counts and index widths of all tables before it. Those offsets are computed once when
/// the header is read.
///
/// ```rust,no_run
/// use win32json::metadata::{streams::TablesHeader, tables::TypeDefRaw};
///
/// # fn stream() -> &'static [u8] { &[] }
/// let header = TablesHeader::from(stream())?;
/// for type_def in header.table::<TypeDefRaw>()?.iter() {
///     println!("{} flags=0x{:08x}", type_def.token.value(), type_def.flags);
/// }
/// # Ok::<(), win32json::Error>(())
/// ```
pub struct TablesHeader<'a> {
    /// Major version of the table schema, 2 for every winmd
    pub major_version: u8,
    /// Minor version of the table schema
    pub minor_version: u8,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    data: &'a [u8],
    table_offsets: Vec<usize>,
}

impl<'a> TablesHeader<'a> {
    /// Parse the `#~` stream in `data`
    ///
    /// # Errors
    /// Returns an error if the header is truncated, a table does not fit into the stream, or an
    /// unsupported indirection table is present
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < 24 {
            return Err(out_of_bounds_error!());
        }

        let valid = read_le_at::<u64>(data, &mut 8)?;
        let sorted = read_le_at::<u64>(data, &mut 16)?;
        if valid == 0 {
            return Err(malformed_error!("No tables are present in the #~ stream"));
        }

        if UNSUPPORTED_TABLES
            .iter()
            .any(|table| valid & (1 << *table as u64) != 0)
        {
            return Err(NotSupported);
        }

        let info = TableInfo::new(data, valid)?;

        let mut table_offsets = vec![0_usize; 64];
        let mut offset = 24 + valid.count_ones() as usize * 4;
        for table_id in TableId::iter() {
            table_offsets[table_id as usize] = offset;

            let rows = info.get(table_id).rows;
            if rows == 0 {
                continue;
            }

            let size = rows as usize * info.row_size(table_id) as usize;
            offset = match offset.checked_add(size) {
                Some(end) if end <= data.len() => end,
                _ => return Err(out_of_bounds_error!()),
            };
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            valid,
            sorted,
            info: TableInfoRef::new(info),
            data,
            table_offsets,
        })
    }

    /// `true` if `table_id` has at least one row
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.row_count(table_id) > 0
    }

    /// Number of rows in `table_id`
    #[must_use]
    pub fn row_count(&self, table_id: TableId) -> u32 {
        self.info.get(table_id).rows
    }

    /// Number of tables present
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Typed access to the rows of table `T`, an absent table yields an empty view
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the table does not fit into the stream
    pub fn table<T: RowReadable>(&self) -> Result<MetadataTable<'a, T>> {
        let start = self.table_offsets[T::TABLE as usize];
        let Some(data) = self.data.get(start..) else {
            return Err(out_of_bounds_error!());
        };

        MetadataTable::new(data, self.row_count(T::TABLE), self.info.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{ModuleRefRaw, TypeRefRaw};

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // version 2.0
            0x00,                   // heap sizes
            0x01,                   // reserved
            0x02, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, // valid: TypeRef, ModuleRef
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x02, 0x00, 0x00, 0x00, // TypeRef rows
            0x01, 0x00, 0x00, 0x00, // ModuleRef rows
            // TypeRef 1: scope AssemblyRef 1, name 0x10, namespace 0x20
            0x06, 0x00, 0x10, 0x00, 0x20, 0x00,
            // TypeRef 2: scope TypeRef 1, name 0x30, namespace 0
            0x07, 0x00, 0x30, 0x00, 0x00, 0x00,
            // ModuleRef 1: name 0x40
            0x40, 0x00,
        ];

        let header = TablesHeader::from(&data).unwrap();
        assert_eq!(header.major_version, 2);
        assert_eq!(header.table_count(), 2);
        assert!(header.has_table(TableId::TypeRef));
        assert!(!header.has_table(TableId::TypeDef));

        let type_refs = header.table::<TypeRefRaw>().unwrap();
        assert_eq!(type_refs.row_count(), 2);
        let second = type_refs.get(2).unwrap();
        assert_eq!(second.type_name, 0x30);
        assert_eq!(second.resolution_scope.tag, TableId::TypeRef);
        assert_eq!(second.resolution_scope.row, 1);

        let module_refs = header.table::<ModuleRefRaw>().unwrap();
        assert_eq!(module_refs.get(1).unwrap().name, 0x40);
    }

    #[test]
    fn truncated() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x01,
            0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x06, 0x00, 0x10, 0x00, 0x20, 0x00,
        ];

        assert!(TablesHeader::from(&data).is_err());
    }

    #[test]
    fn pointer_tables() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x01,
            0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // FieldPtr
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ];

        assert!(matches!(
            TablesHeader::from(&data),
            Err(crate::Error::NotSupported)
        ));
    }
}
