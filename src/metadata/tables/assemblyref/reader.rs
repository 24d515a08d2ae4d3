use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef, AssemblyRefRaw},
        token::Token,
    },
    Result,
};

impl RowReadable for AssemblyRefRaw {
    const TABLE: TableId = TableId::AssemblyRef;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* major_version */       2 +
            /* minor_version */       2 +
            /* build_number */        2 +
            /* revision_number */     2 +
            /* flags */               4 +
            /* public_key_or_token */ sizes.blob_bytes() +
            /* name */                sizes.str_bytes() +
            /* culture */             sizes.str_bytes() +
            /* hash_value */          sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(AssemblyRefRaw {
            rid,
            token: Token::new(0x2300_0000 + rid),
            offset: *offset,
            major_version: read_le_at::<u16>(data, offset)?,
            minor_version: read_le_at::<u16>(data, offset)?,
            build_number: read_le_at::<u16>(data, offset)?,
            revision_number: read_le_at::<u16>(data, offset)?,
            flags: read_le_at::<u32>(data, offset)?,
            public_key_or_token: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            hash_value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
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
            0x02, 0x00, // major_version
            0x01, 0x00, // minor_version
            0x00, 0x00, // build_number
            0x00, 0x00, // revision_number
            0x00, 0x00, 0x00, 0x00, // flags
            0x10, 0x00, // public_key_or_token
            0x42, 0x00, // name
            0x00, 0x00, // culture
            0x00, 0x00, // hash_value
        ];

        let sizes = Arc::new(TableInfo::new_test(&[], false, false, false));
        let table = MetadataTable::<AssemblyRefRaw>::new(&data, 1, sizes).unwrap();

        let eval = |row: AssemblyRefRaw| {
            assert_eq!(row.rid, 1);
            assert_eq!(row.token.value(), 0x2300_0001);
            assert_eq!(row.major_version, 0x2);
            assert_eq!(row.minor_version, 0x1);
            assert_eq!(row.build_number, 0x0);
            assert_eq!(row.revision_number, 0x0);
            assert_eq!(row.flags, 0x0);
            assert_eq!(row.public_key_or_token, 0x10);
            assert_eq!(row.name, 0x42);
            assert_eq!(row.culture, 0x0);
            assert_eq!(row.hash_value, 0x0);
        };

        for row in table.iter() {
            eval(row);
        }

        eval(table.get(1).unwrap());
        assert!(table.get(2).is_err());
    }
}
