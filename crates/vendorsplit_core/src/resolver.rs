use dashmap::DashMap;
use log::trace;
use path_clean::clean;
use std::path::{Path, PathBuf};

use crate::constants::{INDEX_FILES, RESOLVE_EXTENSIONS};

/// Resolve a relative/absolute specifier to a file on disk.
///
/// Returns `None` in two distinct, equally non-fatal situations: the request
/// is a bare package specifier (not local, handled by classification), or it
/// is local but nothing on disk matches. In the latter case the file is
/// simply skipped from scanning, which under-approximates the closure (a
/// known limitation).
pub fn resolve_local(
    from_file: &Path,
    request: &str,
    cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Option<PathBuf> {
    if !request.starts_with('.') && !request.starts_with('/') {
        return None;
    }

    let key = (from_file.to_path_buf(), request.to_string());
    if let Some(v) = cache.get(&key) {
        trace!("Cache hit for resolve: '{}' from {}", request, from_file.display());
        return v.clone();
    }

    let base = from_file.parent().unwrap_or(Path::new("."));
    let joined = clean(base.join(request));
    trace!("Resolving '{}' from {} as {}", request, from_file.display(), joined.display());

    let resolved = probe(&joined);
    if resolved.is_none() {
        trace!("Unresolved local specifier '{}' (skipped)", request);
    }
    cache.insert(key, resolved.clone());
    resolved
}

fn probe(p: &Path) -> Option<PathBuf> {
    // Exact hit when the specifier already carries its extension
    if p.is_file() {
        return Some(canonical(p));
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(canonical(&candidate));
        }
    }

    if p.is_dir() {
        for index_file in INDEX_FILES {
            let candidate = p.join(index_file);
            if candidate.is_file() {
                return Some(canonical(&candidate));
            }
        }
    }

    None
}

fn canonical(p: &Path) -> PathBuf {
    p.canonicalize().unwrap_or_else(|_| p.to_path_buf())
}
