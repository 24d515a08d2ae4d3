use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndex, CodedIndexType, ConstantRaw, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

impl RowReadable for ConstantRaw {
    const TABLE: TableId = TableId::Constant;

    #[rustfmt::skip]
    fn row_size(sizes: &TableInfoRef) -> u32 {
        u32::from(
            /* base */       1 +
            /* padding */    1 +
            /* parent */     sizes.coded_index_bytes(CodedIndexType::HasConstant) +
            /* value */      sizes.blob_bytes()
        )
    }

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let row_offset = *offset;

        let base = read_le_at::<u8>(data, offset)?;
        // single byte of padding, always 0
        read_le_at::<u8>(data, offset)?;

        Ok(ConstantRaw {
            rid,
            token: Token::new(0x0B00_0000 + rid),
            offset: row_offset,
            base,
            parent: CodedIndex::read(data, offset, sizes, CodedIndexType::HasConstant)?,
            value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}
