//! One generator run, from a metadata source to a directory of API documents.
//!
//! The run is all or nothing: every group is classified and the patch table validated before the
//! first file is written, so a data or patch violation leaves the output directory untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use win32json::generator::{Generator, GeneratorOptions};
//! use win32json::metadata::winmd::WinMd;
//!
//! let winmd = WinMd::from_file("Windows.Win32.winmd".as_ref())?;
//! let summary = Generator::new(&winmd, GeneratorOptions::default()).write("out".as_ref())?;
//! println!("wrote {} documents", summary.files.len());
//! # Ok::<(), win32json::Error>(())
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    classify::{ApiRecords, Classifier},
    emit::ApiDocument,
    metadata::MetadataOracle,
    patch::{PatchConfig, PatchOverlay},
    typesystem::GraphBuilder,
    Result,
};

/// Settings of a generator run.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Corrections applied while classifying
    pub patches: PatchConfig,
    /// Namespaces left out of the graph, in addition to the metadata-support namespace
    pub skipped_namespaces: Vec<String>,
    /// Leave `*.json` files of earlier runs in the output directory
    pub keep_existing: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            patches: PatchConfig::win32(),
            skipped_namespaces: Vec::new(),
            keep_existing: false,
        }
    }
}

/// The classified records of every API group, ordered by API name.
#[derive(Debug, Default)]
pub struct Generated {
    /// `(api name, records)` pairs
    pub apis: Vec<(String, ApiRecords)>,
    /// Total number of patch lookups that hit a correction
    pub patch_hits: u64,
}

/// What [`Generator::write`] produced.
#[derive(Debug, Default)]
pub struct GenerateSummary {
    /// The documents written, in API order
    pub files: Vec<PathBuf>,
    /// Stale documents removed before writing
    pub removed: usize,
    /// Constants across all documents
    pub constants: usize,
    /// Top-level types across all documents
    pub types: usize,
    /// Functions across all documents
    pub functions: usize,
}

/// Runs graph building, classification and patch validation over one metadata source.
pub struct Generator<'a> {
    oracle: &'a dyn MetadataOracle,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// A generator over `oracle`
    #[must_use]
    pub fn new(oracle: &'a dyn MetadataOracle, options: GeneratorOptions) -> Self {
        Generator { oracle, options }
    }

    /// Classify every API group and validate the patch table
    ///
    /// # Errors
    /// Returns [`crate::Error::DataViolation`] or [`crate::Error::PatchViolation`] from the
    /// first failing step; no partial result is returned
    pub fn generate(&self) -> Result<Generated> {
        let mut builder = GraphBuilder::new(self.oracle);
        for namespace in &self.options.skipped_namespaces {
            builder = builder.skip_namespace(namespace.as_str());
        }
        let graph = builder.build()?;

        let overlay = PatchOverlay::new(&self.options.patches)?;
        let mut counters = overlay.counters();
        let classifier = Classifier::new(self.oracle, &graph);

        let mut generated = Generated::default();
        for group in graph.groups() {
            let records = classifier.classify_group(group, &overlay, &mut counters)?;
            debug!(
                "{}: {} constants, {} types, {} functions",
                group.name(),
                records.constants.len(),
                records.types.len(),
                records.functions.len()
            );
            generated.apis.push((group.name().to_string(), records));
        }

        overlay.validate(&counters)?;
        generated.patch_hits = counters.total();
        info!(
            "classified {} API groups, {} patches applied {} times",
            generated.apis.len(),
            overlay.len(),
            generated.patch_hits
        );
        Ok(generated)
    }

    /// Generate and write one `<api>.json` per API group into `out_dir`, creating it if needed
    ///
    /// # Errors
    /// Returns the errors of [`Generator::generate`], or [`crate::Error::FileError`] if the
    /// directory cannot be prepared or a document cannot be written
    pub fn write(&self, out_dir: &Path) -> Result<GenerateSummary> {
        let generated = self.generate()?;

        fs::create_dir_all(out_dir)?;
        let mut summary = GenerateSummary::default();
        if !self.options.keep_existing {
            summary.removed = remove_documents(out_dir)?;
        }

        for (api, records) in &generated.apis {
            let path = ApiDocument::new(records).write_to_dir(out_dir, api)?;
            summary.constants += records.constants.len();
            summary.types += records.types.len();
            summary.functions += records.functions.len();
            summary.files.push(path);
        }

        info!(
            "wrote {} documents to {}",
            summary.files.len(),
            out_dir.display()
        );
        Ok(summary)
    }
}

/// Delete the `*.json` files directly inside `dir`, returning how many were removed
///
/// # Errors
/// Returns [`crate::Error::FileError`] if `dir` cannot be listed or a file cannot be removed
pub fn remove_documents(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|extension| extension == "json") {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!("removed {} documents from {}", removed, dir.display());
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{constants::ConstantValue, flags::ParamAttributes, signatures::TypeSignature},
        patch::{FuncPatchConfig, InApi, ParamPatchConfig},
        test::fixture::Fixture,
    };

    fn fixture() -> Fixture {
        let mut fixture = Fixture::new();
        let apis = fixture.apis("Foundation");
        fixture.literal(apis, "MAX_PATH", TypeSignature::U4, ConstantValue::U4(260));
        fixture.typedef("Foundation", "HWND", TypeSignature::I);

        let apis = fixture.apis("UI.WindowsAndMessaging");
        fixture.function(
            apis,
            "ShowWindow",
            "USER32.dll",
            TypeSignature::Boolean,
            &[
                ("hWnd", TypeSignature::I, ParamAttributes::IN),
                ("nCmdShow", TypeSignature::I4, ParamAttributes::IN),
            ],
        );
        fixture
    }

    fn options(patches: PatchConfig) -> GeneratorOptions {
        GeneratorOptions {
            patches,
            ..GeneratorOptions::default()
        }
    }

    fn show_window_patch(param: &str) -> PatchConfig {
        PatchConfig {
            funcs: vec![InApi::new(
                "UI.WindowsAndMessaging",
                FuncPatchConfig {
                    name: "ShowWindow".to_string(),
                    params: vec![ParamPatchConfig {
                        name: param.to_string(),
                        optional: true,
                        is_const: false,
                    }],
                    skip_params: false,
                    return_type: None,
                },
            )],
            ..PatchConfig::empty()
        }
    }

    #[test]
    fn groups_in_order() {
        let fixture = fixture();
        let generated = Generator::new(&fixture.builder, options(PatchConfig::empty()))
            .generate()
            .unwrap();

        let names: Vec<_> = generated.apis.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["Foundation", "UI.WindowsAndMessaging"]);
        assert_eq!(generated.apis[0].1.constants.len(), 1);
        assert_eq!(generated.apis[0].1.types.len(), 1);
        assert_eq!(generated.apis[1].1.functions.len(), 1);
        assert_eq!(generated.patch_hits, 0);
    }

    #[test]
    fn patches_are_counted() {
        let fixture = fixture();
        let generated = Generator::new(&fixture.builder, options(show_window_patch("hWnd")))
            .generate()
            .unwrap();
        assert!(generated.patch_hits > 0);
    }

    #[test]
    fn stale_patch_writes_nothing() {
        let fixture = fixture();
        let dir = tempfile::tempdir().unwrap();
        let error = Generator::new(&fixture.builder, options(show_window_patch("hMenu")))
            .write(dir.path())
            .unwrap_err();
        assert!(error.is_patch_violation());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn skipped_namespaces() {
        let fixture = fixture();
        let generated = Generator::new(
            &fixture.builder,
            GeneratorOptions {
                patches: PatchConfig::empty(),
                skipped_namespaces: vec!["Windows.Win32.UI.WindowsAndMessaging".to_string()],
                keep_existing: false,
            },
        )
        .generate()
        .unwrap();
        assert_eq!(generated.apis.len(), 1);
    }

    #[test]
    fn replaces_old_documents() {
        let fixture = fixture();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gone.json"), "{}").unwrap();
        fs::write(dir.path().join("README.txt"), "kept").unwrap();

        let summary = Generator::new(&fixture.builder, options(PatchConfig::empty()))
            .write(dir.path())
            .unwrap();
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.files.len(), 2);
        assert_eq!((summary.constants, summary.types, summary.functions), (1, 1, 1));
        assert!(!dir.path().join("Gone.json").exists());
        assert!(dir.path().join("README.txt").exists());
        assert!(dir.path().join("UI.WindowsAndMessaging.json").exists());
    }

    #[test]
    fn keeps_old_documents() {
        let fixture = fixture();
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Gone.json"), "{}").unwrap();

        let summary = Generator::new(
            &fixture.builder,
            GeneratorOptions {
                keep_existing: true,
                ..options(PatchConfig::empty())
            },
        )
        .write(dir.path())
        .unwrap();
        assert_eq!(summary.removed, 0);
        assert!(dir.path().join("Gone.json").exists());
    }

    #[test]
    fn creates_the_directory() {
        let fixture = fixture();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        Generator::new(&fixture.builder, options(PatchConfig::empty()))
            .write(&out)
            .unwrap();
        assert!(out.join("Foundation.json").is_file());
    }
}
