use anyhow::{Context, Result, bail};
use dashmap::DashMap;
use log::{debug, info, warn};
use std::{env, fs, path::PathBuf};

use vendorsplit_core::{collect_entries, collect_externals, default_is_external};

use crate::alias::AliasMap;
use crate::config::Config;
use crate::rewrite::{is_script, rewrite_artifacts};
use crate::tool::{BuildTool, BundleRequest};
use crate::transform::Transformer;
use crate::types::{BuildOutput, SplitResult};
use crate::vendor::assemble_vendor_bundle;

/// Run the full split build: closure scan, first-party compile with externals
/// excluded, per-artifact transformation, vendor bundle, import rewrite.
///
/// Strictly sequential; every piece of state (visited set, external set,
/// alias map) is constructed fresh here, so the function is reentrant across
/// invocations that do not share an output directory.
///
/// `is_external` overrides the default externality classification
/// ([`default_is_external`]).
pub fn split_build(
    cfg: &Config,
    tool: &dyn BuildTool,
    engine: &dyn Transformer,
    is_external: Option<&dyn Fn(&str) -> bool>,
) -> Result<SplitResult> {
    let entries = resolve_entries(cfg)?;
    if entries.is_empty() {
        bail!("no entry files to build");
    }
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("Failed to create output directory {}", cfg.out_dir.display()))?;

    // Closure scan before the host build: these specifiers must be excluded
    // from first-party compilation.
    let predicate = is_external.unwrap_or(&default_is_external);
    let resolve_cache = DashMap::new();
    let externals = collect_externals(&entries, predicate, &resolve_cache)?;
    info!("Found {} external specifiers across {} entries", externals.len(), entries.len());

    let mut excluded = externals.clone();
    excluded.extend(cfg.always_external.iter().cloned());
    let first_party = tool.bundle(&BundleRequest {
        entries: entries.clone(),
        out_dir: cfg.out_dir.clone(),
        out_name: None,
        external: excluded,
        minify: cfg.minify,
    })?;

    let mut logs = first_party.logs;
    if !first_party.success {
        return Ok(SplitResult { success: false, logs, artifacts: Vec::new(), vendor: None });
    }
    let mut artifacts = first_party.artifacts;

    // Transformation engine runs between the two builds; an engine error on a
    // first-party artifact is fatal.
    for artifact in artifacts.iter_mut() {
        if !is_script(&artifact.path) {
            continue;
        }
        debug!("Transforming {}", artifact.path.display());
        artifact.text = engine
            .transform(&artifact.text, &cfg.transform_options)
            .with_context(|| format!("Transformation failed for {}", artifact.path.display()))?;
        fs::write(&artifact.path, &artifact.text).with_context(|| {
            format!("Failed to persist transformed artifact {}", artifact.path.display())
        })?;
    }

    let alias_map = AliasMap::new(&externals);
    let mut vendor: Option<BuildOutput> = None;

    let vendor_file: Option<PathBuf> = if let Some(expected) = &cfg.vendor_path {
        // Shared vendor artifact from an earlier invocation; its absence is a
        // broken precondition, not something to regenerate silently.
        if !expected.is_file() {
            bail!("expected vendor artifact missing: {}", expected.display());
        }
        Some(expected.clone())
    } else if cfg.vendor_enabled() && !alias_map.is_empty() {
        let output = match assemble_vendor_bundle(&entries[0], &alias_map, cfg, tool) {
            Ok(output) => output,
            Err(e) => BuildOutput {
                success: false,
                logs: vec![format!("vendor bundle error: {:#}", e)],
                artifacts: Vec::new(),
            },
        };
        logs.extend(output.logs.iter().cloned());

        if output.success {
            let path = output.artifacts.first().map(|a| a.path.clone());
            vendor = Some(output);
            path
        } else {
            vendor = Some(output);
            if cfg.fail_on_vendor_error {
                return Ok(SplitResult { success: false, logs, artifacts, vendor });
            }
            // First-party compilation already excluded the externals, so the
            // artifacts now reference package names nothing will resolve at
            // run time. Surfaced loudly; opt into a hard failure with
            // --fail-on-vendor-error.
            warn!("Vendor bundle failed; first-party imports left unrewritten");
            None
        }
    } else {
        None
    };

    if let Some(vendor_file) = vendor_file {
        rewrite_artifacts(&mut artifacts, &alias_map, &vendor_file)?;
    }

    Ok(SplitResult { success: true, logs, artifacts, vendor })
}

/// Explicit entry list, or a collected one when the config names none.
pub fn resolve_entries(cfg: &Config) -> Result<Vec<PathBuf>> {
    if !cfg.entries.is_empty() {
        return Ok(cfg.entries.clone());
    }
    let root = match &cfg.root {
        Some(root) => root.clone(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    collect_entries(&root, cfg.entry_glob.as_deref())
}
