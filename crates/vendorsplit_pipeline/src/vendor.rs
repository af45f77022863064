use anyhow::{Context, Result};
use log::{debug, trace};
use std::{
    fmt::Write as _,
    io::Write as _,
    path::Path,
};

use crate::alias::AliasMap;
use crate::config::Config;
use crate::tool::{BuildTool, BundleRequest};
use crate::types::BuildOutput;

/// One re-export per external specifier, in alias order.
fn vendor_entry_source(aliases: &AliasMap) -> String {
    let mut src = String::new();
    for (request, alias) in aliases.iter() {
        // write! to a String cannot fail
        let _ = writeln!(src, "export * as {} from \"{}\";", alias, request);
    }
    src
}

/// Bundle every external specifier into one consolidated vendor artifact.
///
/// A synthetic entry module re-exporting each external under its alias is
/// written next to the real entrypoint, so bare package specifiers resolve
/// exactly as they would in the first-party build. The entry is a named temp
/// file with a unique suffix and is removed on drop, whatever path this
/// function exits through. Caller-declared always-external natives stay
/// external even here.
pub(crate) fn assemble_vendor_bundle(
    entry: &Path,
    aliases: &AliasMap,
    cfg: &Config,
    tool: &dyn BuildTool,
) -> Result<BuildOutput> {
    let dir = entry.parent().unwrap_or(Path::new("."));
    let mut synthetic = tempfile::Builder::new()
        .prefix("vendor-entry-")
        .suffix(".js")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create vendor entry in {}", dir.display()))?;

    let source = vendor_entry_source(aliases);
    trace!("Vendor entry module:\n{}", source);
    synthetic.write_all(source.as_bytes()).context("Failed to write vendor entry")?;
    synthetic.flush().context("Failed to flush vendor entry")?;

    debug!(
        "Bundling {} external specifiers into {}",
        aliases.len(),
        cfg.vendor_name
    );
    let request = BundleRequest {
        entries: vec![synthetic.path().to_path_buf()],
        out_dir: cfg.out_dir.clone(),
        out_name: Some(cfg.vendor_name.clone()),
        external: cfg.always_external.clone(),
        minify: cfg.minify,
    };
    tool.bundle(&request)
    // synthetic dropped here: entry file removed on success and failure alike
}
