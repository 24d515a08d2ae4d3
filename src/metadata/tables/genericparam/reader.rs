use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, RowReadable, TableId, TableInfoRef, GenericParamRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for GenericParamRaw {
    const TABLE: TableId = TableId::GenericParam;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* number */ 2 +
            /* flags */  2 +
            /* owner */  sizes.coded_index_bytes(CodedIndexType::TypeOrMethodDef) +
            /* name */   sizes.str_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(GenericParamRaw {
            rid,
            token: Token::new(0x2A00_0000 + rid),
            offset: *offset,
            number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u16>(data, offset)?,
            owner: CodedIndex::read(data, offset, sizes, CodedIndexType::TypeOrMethodDef)?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
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
            0x00, 0x00, // number
            0x00, 0x00, // flags
            0x04, 0x00, // owner
            0x42, 0x00, // name
        ];

        let sizes = Arc::new(TableInfo::new_test(
            &[(TableId::TypeDef, 2)],
            false,
            false,
            false,
        ));
        let table = MetadataTable::<GenericParamRaw>::new(&data, 1, sizes).unwrap();

        let eval = |row: GenericParamRaw| {
            assert_eq!(row.rid, 1);
            assert_eq!(row.token.value(), 0x2A00_0001);
            assert_eq!(row.number, 0x0);
            assert_eq!(row.flags, 0x0);
            assert_eq!(row.owner.tag, TableId::TypeDef);
            assert_eq!(row.owner.row, 2);
            assert_eq!(row.name, 0x42);
        };

        for row in table.iter() {
            eval(row);
        }

        eval(table.get(1).unwrap());
        assert!(table.get(2).is_err());
    }
}
