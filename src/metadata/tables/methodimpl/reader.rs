use crate::{
    file::io::read_le_at_dyn,
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef, MethodImplRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for MethodImplRaw {
    const TABLE: TableId = TableId::MethodImpl;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* class */              sizes.table_index_bytes(TableId::TypeDef) +
            /* method_body */        sizes.coded_index_bytes(CodedIndexType::MethodDefOrRef) +
            /* method_declaration */ sizes.coded_index_bytes(CodedIndexType::MethodDefOrRef)
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodImplRaw {
            rid,
            token: Token::new(0x1900_0000 + rid),
            offset: *offset,
            class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            method_body: CodedIndex::read(data, offset, sizes, CodedIndexType::MethodDefOrRef)?,
            method_declaration: CodedIndex::read(
                data,
                offset,
                sizes,
                CodedIndexType::MethodDefOrRef,
            )?,
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
            0x02, 0x00, // class
            0x06, 0x00, // method_body
            0x03, 0x00, // method_declaration
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeDef, 2), (TableId::MethodDef, 3), (TableId::MemberRef, 1)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<MethodImplRaw>::new(&data, 1, sizes).unwrap();

        let eval = |row: MethodImplRaw| {
            assert_eq!(row.rid, 1);
            assert_eq!(row.token.value(), 0x1900_0001);
            assert_eq!(row.class, 0x2);
            assert_eq!(row.method_body.tag, TableId::MethodDef);
            assert_eq!(row.method_body.row, 3);
            assert_eq!(row.method_declaration.tag, TableId::MemberRef);
            assert_eq!(row.method_declaration.row, 1);
        };

        for row in table.iter() {
            eval(row);
        }

        eval(table.get(1).unwrap());
        assert!(table.get(2).is_err());
    }
}
