//! Test support: writes small but complete winmd images.
//!
//! [`MetadataWriter`] collects heap entries and table rows, lays out a `#~` stream with the same
//! index width rules the reader applies, and wraps the metadata into a minimal PE32 image with a
//! CLR header, so tests exercise the reader end to end without sample files.


use std::collections::{BTreeMap, HashMap};

use strum::IntoEnumIterator;

use crate::metadata::tables::{CodedIndexType, TableId, TableInfo};

/// RVA of the `.text` section
pub const TEXT_RVA: u32 = 0x2000;
/// File offset of the `.text` section
pub const TEXT_FILE_OFFSET: u32 = 0x200;
/// Size of the CLR header at the start of `.text`
pub const CLR_HEADER_SIZE: u32 = 72;

fn align4(data: &mut Vec<u8>) {
    while data.len() % 4 != 0 {
        data.push(0);
    }
}

fn put_u16(data: &mut Vec<u8>, value: u16) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(data: &mut Vec<u8>, value: u32) {
    data.extend_from_slice(&value.to_le_bytes());
}

fn put_at(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// Encode `row` of `table` as a coded index of kind `kind`
pub fn coded(kind: CodedIndexType, table: TableId, row: u32) -> u32 {
    let tag = match (kind, table) {
        (CodedIndexType::CustomAttributeType, TableId::MethodDef) => 2,
        (CodedIndexType::CustomAttributeType, TableId::MemberRef) => 3,
        _ => kind
            .tables()
            .iter()
            .position(|candidate| *candidate == table)
            .expect("table is not part of the coded index") as u32,
    };

    (row << kind.tag_bits()) | tag
}

/// Wrap `metadata` into a PE32 image whose CLR header points at it
pub fn pe_image(metadata: &[u8]) -> Vec<u8> {
    let text_size = CLR_HEADER_SIZE as usize + metadata.len();
    let raw_size = (text_size + 0x1FF) & !0x1FF;
    let mut image = vec![0u8; TEXT_FILE_OFFSET as usize + raw_size];

    // DOS header
    put_at(&mut image, 0x00, b"MZ");
    put_at(&mut image, 0x3C, &0x80u32.to_le_bytes());

    // PE signature and COFF header
    put_at(&mut image, 0x80, b"PE\0\0");
    put_at(&mut image, 0x84, &0x014Cu16.to_le_bytes()); // i386
    put_at(&mut image, 0x86, &1u16.to_le_bytes()); // sections
    put_at(&mut image, 0x94, &0xE0u16.to_le_bytes()); // optional header size
    put_at(&mut image, 0x96, &0x2102u16.to_le_bytes()); // dll, 32 bit, executable

    // Optional header, standard fields
    let optional = 0x98;
    put_at(&mut image, optional, &0x010Bu16.to_le_bytes());
    put_at(&mut image, optional + 4, &(raw_size as u32).to_le_bytes()); // size of code
    put_at(&mut image, optional + 20, &TEXT_RVA.to_le_bytes()); // base of code

    // Windows fields
    put_at(&mut image, optional + 28, &0x1000_0000u32.to_le_bytes()); // image base
    put_at(&mut image, optional + 32, &0x2000u32.to_le_bytes()); // section alignment
    put_at(&mut image, optional + 36, &0x200u32.to_le_bytes()); // file alignment
    put_at(&mut image, optional + 40, &4u16.to_le_bytes()); // os version
    put_at(&mut image, optional + 48, &4u16.to_le_bytes()); // subsystem version
    let image_size = TEXT_RVA + ((text_size as u32 + 0x1FFF) & !0x1FFF);
    put_at(&mut image, optional + 56, &image_size.to_le_bytes());
    put_at(&mut image, optional + 60, &TEXT_FILE_OFFSET.to_le_bytes()); // size of headers
    put_at(&mut image, optional + 68, &3u16.to_le_bytes()); // console subsystem
    put_at(&mut image, optional + 70, &0x8540u16.to_le_bytes());
    put_at(&mut image, optional + 72, &0x0010_0000u32.to_le_bytes());
    put_at(&mut image, optional + 76, &0x1000u32.to_le_bytes());
    put_at(&mut image, optional + 80, &0x0010_0000u32.to_le_bytes());
    put_at(&mut image, optional + 84, &0x1000u32.to_le_bytes());
    put_at(&mut image, optional + 92, &16u32.to_le_bytes()); // data directories

    // CLR runtime header directory (index 14)
    let clr_directory = optional + 96 + 14 * 8;
    put_at(&mut image, clr_directory, &TEXT_RVA.to_le_bytes());
    put_at(&mut image, clr_directory + 4, &CLR_HEADER_SIZE.to_le_bytes());

    // Section table
    let section = optional + 0xE0;
    put_at(&mut image, section, b".text\0\0\0");
    put_at(&mut image, section + 8, &(text_size as u32).to_le_bytes());
    put_at(&mut image, section + 12, &TEXT_RVA.to_le_bytes());
    put_at(&mut image, section + 16, &(raw_size as u32).to_le_bytes());
    put_at(&mut image, section + 20, &TEXT_FILE_OFFSET.to_le_bytes());
    put_at(&mut image, section + 36, &0x6000_0020u32.to_le_bytes());

    // CLR header
    let clr = TEXT_FILE_OFFSET as usize;
    put_at(&mut image, clr, &CLR_HEADER_SIZE.to_le_bytes());
    put_at(&mut image, clr + 4, &2u16.to_le_bytes());
    put_at(&mut image, clr + 6, &5u16.to_le_bytes());
    put_at(&mut image, clr + 8, &(TEXT_RVA + CLR_HEADER_SIZE).to_le_bytes());
    put_at(&mut image, clr + 12, &(metadata.len() as u32).to_le_bytes());
    put_at(&mut image, clr + 16, &1u32.to_le_bytes()); // IL only

    put_at(&mut image, clr + CLR_HEADER_SIZE as usize, metadata);
    image
}

/// Collects heap entries and table rows and serializes them as a metadata root.
pub struct MetadataWriter {
    strings: Vec<u8>,
    string_offsets: HashMap<String, u32>,
    blobs: Vec<u8>,
    guids: Vec<u8>,
    rows: BTreeMap<u8, Vec<Vec<u32>>>,
}

impl Default for MetadataWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataWriter {
    /// An empty module, heaps hold only their mandatory leading entry
    pub fn new() -> Self {
        MetadataWriter {
            strings: vec![0],
            string_offsets: HashMap::new(),
            blobs: vec![0],
            guids: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Add a string, returning its `#Strings` index (the empty string is index 0)
    pub fn string(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.string_offsets.get(value) {
            return *offset;
        }

        let offset = self.strings.len() as u32;
        self.strings.extend_from_slice(value.as_bytes());
        self.strings.push(0);
        self.string_offsets.insert(value.to_string(), offset);
        offset
    }

    /// Add a blob, returning its `#Blob` index
    pub fn blob(&mut self, value: &[u8]) -> u32 {
        let offset = self.blobs.len() as u32;
        let length = value.len();
        if length < 0x80 {
            self.blobs.push(length as u8);
        } else if length < 0x4000 {
            self.blobs.push(0x80 | (length >> 8) as u8);
            self.blobs.push(length as u8);
        } else {
            put_u32(&mut self.blobs, (0xC000_0000 | length as u32).swap_bytes());
        }
        self.blobs.extend_from_slice(value);
        offset
    }

    /// Add a GUID, returning its 1-based `#GUID` index
    pub fn guid(&mut self, value: [u8; 16]) -> u32 {
        self.guids.extend_from_slice(&value);
        (self.guids.len() / 16) as u32
    }

    /// Append a row to `table`, one value per column, returning its rid
    pub fn row(&mut self, table: TableId, values: &[u32]) -> u32 {
        assert_eq!(
            values.len(),
            table.columns().len(),
            "wrong column count for {table:?}"
        );

        let rows = self.rows.entry(table as u8).or_default();
        rows.push(values.to_vec());
        rows.len() as u32
    }

    /// Number of rows added to `table` so far
    pub fn row_count(&self, table: TableId) -> u32 {
        self.rows.get(&(table as u8)).map_or(0, |rows| rows.len() as u32)
    }

    fn tables_stream(&self) -> Vec<u8> {
        let large_str = self.strings.len() > 0xFFFF;
        let large_blob = self.blobs.len() > 0xFFFF;
        let large_guid = self.guids.len() / 16 > 0xFFFF;

        let counts = TableId::iter()
            .filter_map(|table| {
                let count = self.row_count(table);
                (count > 0).then_some((table, count))
            })
            .collect::<Vec<_>>();
        let info = TableInfo::new_test(&counts, large_str, large_blob, large_guid);

        let mut valid = 0u64;
        for (table, _) in &counts {
            valid |= 1 << (*table as u8);
        }

        let mut data = Vec::new();
        put_u32(&mut data, 0);
        data.push(2);
        data.push(0);
        data.push(u8::from(large_str) | (u8::from(large_guid) << 1) | (u8::from(large_blob) << 2));
        data.push(1);
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0u64.to_le_bytes());
        for (_, count) in &counts {
            put_u32(&mut data, *count);
        }

        for (table, _) in &counts {
            for row in &self.rows[&(*table as u8)] {
                for (column, value) in table.columns().iter().zip(row) {
                    match info.column_bytes(*column) {
                        1 => data.push(*value as u8),
                        2 => put_u16(&mut data, *value as u16),
                        _ => put_u32(&mut data, *value),
                    }
                }
            }
        }

        data
    }

    /// Serialize the metadata root with `#~`, `#Strings`, `#Blob` and `#GUID`
    pub fn metadata(&self) -> Vec<u8> {
        let mut strings = self.strings.clone();
        align4(&mut strings);
        let mut blobs = self.blobs.clone();
        align4(&mut blobs);
        let mut tables = self.tables_stream();
        align4(&mut tables);

        let mut streams: Vec<(&str, Vec<u8>)> =
            vec![("#~", tables), ("#Strings", strings), ("#Blob", blobs)];
        if !self.guids.is_empty() {
            streams.push(("#GUID", self.guids.clone()));
        }

        let version = b"WindowsRuntime 1.4\0\0";
        let mut header_size = 16 + version.len() + 4;
        for (name, _) in &streams {
            header_size += 8 + (name.len() + 4) / 4 * 4;
        }

        let mut data = Vec::new();
        put_u32(&mut data, 0x424A_5342);
        put_u16(&mut data, 1);
        put_u16(&mut data, 1);
        put_u32(&mut data, 0);
        put_u32(&mut data, version.len() as u32);
        data.extend_from_slice(version);
        put_u16(&mut data, 0);
        put_u16(&mut data, streams.len() as u16);

        let mut offset = header_size;
        for (name, stream) in &streams {
            put_u32(&mut data, offset as u32);
            put_u32(&mut data, stream.len() as u32);
            data.extend_from_slice(name.as_bytes());
            data.push(0);
            align4(&mut data);
            offset += stream.len();
        }

        for (_, stream) in &streams {
            data.extend_from_slice(stream);
        }

        data
    }

    /// The complete PE image
    pub fn image(&self) -> Vec<u8> {
        pe_image(&self.metadata())
    }
}
