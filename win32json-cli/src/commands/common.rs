use std::path::{Path, PathBuf};

use anyhow::Context;
use win32json::{metadata::winmd::WinMd, patch::PatchConfig};

/// Load a winmd file.
pub fn load_winmd(path: &Path) -> anyhow::Result<WinMd> {
    WinMd::from_file(path).with_context(|| format!("failed to load winmd: {}", path.display()))
}

/// The built-in patch table unless `no_default`, plus the entries of `extra`.
pub fn load_patches(extra: Option<&Path>, no_default: bool) -> anyhow::Result<PatchConfig> {
    let mut patches = if no_default {
        PatchConfig::empty()
    } else {
        PatchConfig::win32()
    };

    if let Some(path) = extra {
        let loaded = PatchConfig::from_file(path)
            .with_context(|| format!("failed to load patch table: {}", path.display()))?;
        patches.merge(loaded);
    }
    Ok(patches)
}

/// All `.json` files directly inside `dir`, sorted.
pub fn collect_documents(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_document(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Returns true if the path has a `.json` extension.
pub fn is_document(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("json"))
}

/// Extract a display-friendly filename from a path.
pub fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    )
}
