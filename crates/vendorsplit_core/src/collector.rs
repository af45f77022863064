use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::JS_TS_EXTENSIONS;

/// Collect entry files under a root directory.
///
/// Gitignore-aware walk; test files (`*.test.*`, `*.spec.*`) are skipped.
/// When `entry_glob` is set, only files whose root-relative path contains the
/// pattern are kept; otherwise anything under a `src/` directory qualifies.
pub fn collect_entries(root: &Path, entry_glob: Option<&str>) -> Result<Vec<PathBuf>> {
    debug!("Collecting entry files under {}", root.display());
    let mut files: Vec<PathBuf> = Vec::new();
    let walker = WalkBuilder::new(root).hidden(false).ignore(true).git_ignore(true).build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }

        let path_str = p.to_string_lossy();
        if path_str.contains(".test.") || path_str.contains(".spec.") {
            trace!("Skipping test file: {}", path_str);
            continue;
        }

        let Some(ext) = p.extension().and_then(|e| e.to_str()) else { continue };
        if !JS_TS_EXTENSIONS.contains(&ext) {
            continue;
        }

        match entry_glob {
            Some(glob) => {
                if let Ok(rel) = p.strip_prefix(root)
                    && rel.to_string_lossy().contains(glob)
                {
                    trace!("Matched entry file with glob '{}': {}", glob, rel.display());
                    files.push(p.to_path_buf());
                }
            }
            None => {
                if path_str.contains("/src/") {
                    trace!("Found entry file in /src/: {}", p.display());
                    files.push(p.to_path_buf());
                }
            }
        }
    }

    files.sort();
    debug!("Collected {} entry files", files.len());
    Ok(files)
}
