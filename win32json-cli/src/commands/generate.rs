use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use win32json::generator::{Generator, GeneratorOptions};

use crate::{
    app::GlobalOptions,
    commands::common::{file_display_name, load_patches, load_winmd},
    output::print_output,
};

/// Options for the generate command.
pub struct GenerateOptions<'a> {
    pub out: &'a Path,
    pub patches: Option<&'a Path>,
    pub no_default_patches: bool,
    pub keep_existing: bool,
    pub skip_namespaces: &'a [String],
    pub global: &'a GlobalOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOutput {
    out: String,
    documents: Vec<String>,
    removed: usize,
    constants: usize,
    types: usize,
    functions: usize,
}

pub fn run(path: &Path, opts: &GenerateOptions<'_>) -> anyhow::Result<()> {
    let winmd = load_winmd(path)?;
    let options = GeneratorOptions {
        patches: load_patches(opts.patches, opts.no_default_patches)?,
        skipped_namespaces: opts.skip_namespaces.to_vec(),
        keep_existing: opts.keep_existing,
    };

    let summary = Generator::new(&winmd, options)
        .write(opts.out)
        .with_context(|| format!("failed to generate documents for: {}", path.display()))?;

    let output = GenerateOutput {
        out: opts.out.display().to_string(),
        documents: summary.files.iter().map(|file| file_display_name(file)).collect(),
        removed: summary.removed,
        constants: summary.constants,
        types: summary.types,
        functions: summary.functions,
    };

    print_output(&output, opts.global, |out| {
        println!("Wrote {} document(s) to {}", out.documents.len(), out.out);
        println!(
            "  {} constant(s), {} type(s), {} function(s)",
            out.constants, out.types, out.functions
        );
        if out.removed > 0 {
            println!("  removed {} stale document(s)", out.removed);
        }
    })
}
