//! Writing API documents.
//!
//! One document per API group, an object with the four arrays `Constants`, `Types`, `Functions`
//! and `UnicodeAliases`, pretty printed with tabs.
//!
//! # Examples
//!
//! ```rust
//! use win32json::classify::ApiRecords;
//! use win32json::emit::ApiDocument;
//!
//! let records = ApiRecords::default();
//! let text = ApiDocument::new(&records).to_string()?;
//! assert!(text.starts_with("{\n\t\"Constants\": []"));
//! # Ok::<(), win32json::Error>(())
//! ```

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;

use crate::{
    classify::{ApiRecords, ConstantRecord, FunctionRecord, TypeRecord},
    Result,
};

/// The names ANSI and wide variants share, e.g. `CreateWindowEx` for `CreateWindowExA` and
/// `CreateWindowExW`
#[derive(Debug, Default)]
struct UnicodeAliases<'a> {
    /// Alias -> (has `A`, has `W`), in first-seen order
    candidates: Vec<(&'a str, bool, bool)>,
    index: HashMap<&'a str, usize>,
    symbols: HashSet<&'a str>,
}

impl<'a> UnicodeAliases<'a> {
    fn register(&mut self, symbol: &'a str) {
        if !self.symbols.insert(symbol) {
            return;
        }

        let (alias, is_ansi) = if let Some(alias) = symbol.strip_suffix('A') {
            (alias, true)
        } else if let Some(alias) = symbol.strip_suffix('W') {
            (alias, false)
        } else {
            return;
        };

        let index = match self.index.get(alias) {
            Some(index) => *index,
            None => {
                self.candidates.push((alias, false, false));
                self.index.insert(alias, self.candidates.len() - 1);
                self.candidates.len() - 1
            }
        };
        let candidate = &mut self.candidates[index];
        if is_ansi {
            candidate.1 = true;
        } else {
            candidate.2 = true;
        }
    }

    fn finish(self) -> Vec<String> {
        self.candidates
            .into_iter()
            .filter(|(alias, ansi, wide)| *ansi && *wide && !self.symbols.contains(alias))
            .map(|(alias, _, _)| alias.to_string())
            .collect()
    }
}

/// Unicode aliases of the top-level symbols of `records`
#[must_use]
pub fn unicode_aliases(records: &ApiRecords) -> Vec<String> {
    let mut aliases = UnicodeAliases::default();
    for constant in &records.constants {
        aliases.register(&constant.name);
    }
    for ty in &records.types {
        aliases.register(&ty.name);
    }
    for function in &records.functions {
        aliases.register(&function.name);
    }
    aliases.finish()
}

/// The document of one API group.
#[derive(Debug, Serialize)]
pub struct ApiDocument<'a> {
    /// Free constants
    #[serde(rename = "Constants")]
    pub constants: &'a [ConstantRecord],
    /// Top-level types
    #[serde(rename = "Types")]
    pub types: &'a [TypeRecord],
    /// Free functions
    #[serde(rename = "Functions")]
    pub functions: &'a [FunctionRecord],
    /// Names shared by `A` and `W` variants
    #[serde(rename = "UnicodeAliases")]
    pub unicode_aliases: Vec<String>,
}

impl<'a> ApiDocument<'a> {
    /// The document of `records`
    #[must_use]
    pub fn new(records: &'a ApiRecords) -> Self {
        ApiDocument {
            constants: &records.constants,
            types: &records.types,
            functions: &records.functions,
            unicode_aliases: unicode_aliases(records),
        }
    }

    /// Write the document, tab indented
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] or [`crate::Error::FileError`] if writing fails
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// The document as a string
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if a record cannot be serialized
    pub fn to_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|error| invariant_violation!("document is not UTF-8: {}", error))
    }

    /// Write the document to `<dir>/<api>.json`, replacing an existing file
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be written
    pub fn write_to_dir(&self, dir: &Path, api: &str) -> Result<PathBuf> {
        let path = dir.join(format!("{api}.json"));
        let mut writer = BufWriter::new(File::create(&path)?);
        self.write(&mut writer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(path)
    }
}
