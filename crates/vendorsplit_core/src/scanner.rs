use anyhow::Result;
use dashmap::DashMap;
use log::{debug, trace, warn};
use std::{
    collections::{HashSet, VecDeque},
    fs,
    path::PathBuf,
};

use crate::extract::extract_specifiers;
use crate::resolver::resolve_local;
use crate::strip::strip_comments;
use crate::validate::is_valid_specifier;

/// Default externality classification: anything under a `node_modules`
/// directory, or any bare (non-`.`/`/`) specifier.
pub fn default_is_external(request: &str) -> bool {
    request.contains("node_modules") || !(request.starts_with('.') || request.starts_with('/'))
}

/// Compute the external dependency closure of a set of entry files.
///
/// Breadth-first traversal over the lazily discovered import graph: local
/// specifiers are resolved and enqueued, external specifiers accumulate into
/// the result. The returned list is deduplicated and keeps first-seen order,
/// which downstream alias assignment relies on.
///
/// Unreadable or unresolvable files are skipped with a warning; a single bad
/// file never aborts the closure. Cycles terminate via the visited set.
pub fn collect_externals(
    entries: &[PathBuf],
    is_external: &dyn Fn(&str) -> bool,
    resolve_cache: &DashMap<(PathBuf, String), Option<PathBuf>>,
) -> Result<Vec<String>> {
    let mut queue: VecDeque<PathBuf> = entries
        .iter()
        .map(|e| e.canonicalize().unwrap_or_else(|_| e.clone()))
        .collect();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut externals: Vec<String> = Vec::new();
    let mut seen_externals: HashSet<String> = HashSet::new();

    while let Some(file) = queue.pop_front() {
        if !visited.insert(file.clone()) {
            continue;
        }
        if !file.is_file() {
            trace!("Skipping missing file: {}", file.display());
            continue;
        }
        trace!("Scanning module: {}", file.display());

        let source = match fs::read_to_string(&file) {
            Ok(s) => s,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", file.display(), e);
                continue;
            }
        };

        let stripped = strip_comments(&source);
        for spec in extract_specifiers(&stripped) {
            if !is_valid_specifier(&spec.request) {
                trace!("Discarding implausible specifier: '{}'", spec.request);
                continue;
            }
            if is_external(&spec.request) {
                if seen_externals.insert(spec.request.clone()) {
                    trace!("Found external dependency: '{}'", spec.request);
                    externals.push(spec.request);
                }
            } else if let Some(next) = resolve_local(&file, &spec.request, resolve_cache) {
                if !visited.contains(&next) {
                    queue.push_back(next);
                }
            }
        }
    }

    debug!("Scanned {} files, found {} external specifiers", visited.len(), externals.len());
    Ok(externals)
}
