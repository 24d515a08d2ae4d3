use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef, ImplMapRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for ImplMapRaw {
    const TABLE: TableId = TableId::ImplMap;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* mapping_flags */    2 +
            /* member_forwarded */ sizes.coded_index_bytes(CodedIndexType::MemberForwarded) +
            /* import_name */      sizes.str_bytes() +
            /* import_scope */     sizes.table_index_bytes(TableId::ModuleRef)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(ImplMapRaw {
            rid,
            token: Token::new(0x1C00_0000 + rid),
            offset: *offset,
            mapping_flags: u32::from(read_le_at::<u16>(data, offset)?),
            member_forwarded: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::MemberForwarded,
            )?,
            import_name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            import_scope: read_le_at_dyn(data, offset, sizes.is_large(TableId::ModuleRef))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::metadata::tables::{MetadataTable, TableInfo};

    use super::*;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x41, 0x01, // mapping_flags
            0x09, 0x00, // member_forwarded
            0x42, 0x00, // import_name
            0x01, 0x00, // import_scope
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::MethodDef, 4), (TableId::ModuleRef, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<ImplMapRaw>::new(&data, 1, sizes).unwrap();

        let eval = |row: ImplMapRaw| {
            assert_eq!(row.rid, 1);
            assert_eq!(row.token.value(), 0x1C00_0001);
            assert_eq!(row.mapping_flags, 0x141);
            assert_eq!(row.member_forwarded.tag, TableId::MethodDef);
            assert_eq!(row.member_forwarded.row, 4);
            assert_eq!(row.import_name, 0x42);
            assert_eq!(row.import_scope, 0x1);
        };

        for row in table.iter() {
            eval(row);
        }

        eval(table.get(1).unwrap());
        assert!(table.get(2).is_err());
    }
}
