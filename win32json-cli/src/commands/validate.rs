use std::path::Path;

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::Value;

use crate::{
    app::GlobalOptions,
    commands::common::{collect_documents, file_display_name},
    output::print_output,
};

const SECTIONS: [&str; 4] = ["Constants", "Types", "Functions", "UnicodeAliases"];

#[derive(Debug, Serialize)]
pub struct DocumentEntry {
    name: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationResult {
    pub dir: String,
    pub valid: bool,
    pub documents: Vec<DocumentEntry>,
}

/// Checks that `text` is an object holding exactly the four section arrays.
pub fn check_document(text: &str) -> Result<(), String> {
    let value: Value = serde_json::from_str(text).map_err(|e| format!("not JSON: {e}"))?;
    let Some(object) = value.as_object() else {
        return Err("not a JSON object".to_string());
    };

    for section in SECTIONS {
        match object.get(section) {
            Some(Value::Array(_)) => {}
            Some(_) => return Err(format!("'{section}' is not an array")),
            None => return Err(format!("'{section}' is missing")),
        }
    }
    if let Some(extra) = object.keys().find(|key| !SECTIONS.contains(&key.as_str())) {
        return Err(format!("unexpected key '{extra}'"));
    }
    Ok(())
}

pub fn run(dir: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let files = collect_documents(dir)?;
    if files.is_empty() {
        bail!("no documents found in: {}", dir.display());
    }

    let mut documents = Vec::new();
    for file in &files {
        let text = std::fs::read_to_string(file)
            .with_context(|| format!("failed to read: {}", file.display()))?;
        let checked = check_document(&text);
        documents.push(DocumentEntry {
            name: file_display_name(file),
            valid: checked.is_ok(),
            error_message: checked.err(),
        });
    }

    let result = ValidationResult {
        dir: dir.display().to_string(),
        valid: documents.iter().all(|d| d.valid),
        documents,
    };

    print_output(&result, opts, |r| {
        for d in &r.documents {
            let status = if d.valid { "PASS" } else { "FAIL" };
            println!("{status}  {}", d.name);
            if let Some(err) = &d.error_message {
                println!("  Error: {err}");
            }
        }
    })?;

    if !result.valid {
        let failed = result.documents.iter().filter(|d| !d.valid).count();
        bail!("{failed} invalid document(s) in: {}", dir.display());
    }
    Ok(())
}
