use anyhow::{Context, Result};
use log::{debug, trace};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::types::{Artifact, BuildOutput};

/// One bundling request against the host build tool.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub entries: Vec<PathBuf>,
    pub out_dir: PathBuf,
    /// Single named output file; when `None` the tool derives one output per
    /// entry inside `out_dir`.
    pub out_name: Option<String>,
    /// Specifiers the tool must leave unbundled.
    pub external: Vec<String>,
    pub minify: bool,
}

/// Narrow seam to the host build tool. Invoked twice per split build: once
/// for the first-party entries (externals excluded) and once for the
/// synthetic vendor entry.
pub trait BuildTool {
    fn bundle(&self, req: &BundleRequest) -> Result<BuildOutput>;
}

/// `esbuild` invoked as a subprocess.
#[derive(Debug, Clone)]
pub struct Esbuild {
    pub command: String,
}

impl Default for Esbuild {
    fn default() -> Self {
        Self { command: "esbuild".to_string() }
    }
}

impl Esbuild {
    fn args_for(req: &BundleRequest) -> (Vec<String>, Vec<PathBuf>) {
        let mut args: Vec<String> = Vec::new();
        for entry in &req.entries {
            args.push(entry.display().to_string());
        }
        args.push("--bundle".to_string());
        args.push("--format=esm".to_string());
        if req.minify {
            args.push("--minify".to_string());
        }
        for external in &req.external {
            args.push(format!("--external:{}", external));
        }

        let out_paths: Vec<PathBuf> = match &req.out_name {
            Some(name) => {
                let out = req.out_dir.join(name);
                args.push(format!("--outfile={}", out.display()));
                vec![out]
            }
            None => {
                // esbuild lays out --outdir relative to the lowest common
                // ancestor of the entry points; pin that base explicitly so
                // the predicted artifact paths match what it writes.
                let outbase = common_ancestor(&req.entries);
                args.push(format!("--outdir={}", req.out_dir.display()));
                if !outbase.as_os_str().is_empty() {
                    args.push(format!("--outbase={}", outbase.display()));
                }
                req.entries
                    .iter()
                    .map(|e| {
                        let stem = e.file_stem().and_then(|s| s.to_str()).unwrap_or("out");
                        let rel_dir = e
                            .parent()
                            .unwrap_or(Path::new(""))
                            .strip_prefix(&outbase)
                            .unwrap_or(Path::new(""));
                        req.out_dir.join(rel_dir).join(format!("{}.js", stem))
                    })
                    .collect()
            }
        };
        (args, out_paths)
    }
}

/// Lowest common ancestor of the entry points' directories.
fn common_ancestor(entries: &[PathBuf]) -> PathBuf {
    let mut ancestor: Option<PathBuf> = None;
    for entry in entries {
        let dir = entry.parent().unwrap_or(Path::new("")).to_path_buf();
        ancestor = Some(match ancestor {
            None => dir,
            Some(prev) => prev
                .components()
                .zip(dir.components())
                .take_while(|(a, b)| a == b)
                .map(|(a, _)| a.as_os_str())
                .collect(),
        });
    }
    ancestor.unwrap_or_default()
}

impl BuildTool for Esbuild {
    fn bundle(&self, req: &BundleRequest) -> Result<BuildOutput> {
        let (args, out_paths) = Self::args_for(req);
        debug!("Invoking {} with {} args", self.command, args.len());
        trace!("{} {}", self.command, args.join(" "));

        let output = match Command::new(&self.command).args(&args).output() {
            Ok(o) => o,
            Err(e) => {
                // Missing binary is a build failure, not a crash
                return Ok(BuildOutput {
                    success: false,
                    logs: vec![format!("failed to run {}: {}", self.command, e)],
                    artifacts: Vec::new(),
                });
            }
        };

        let mut logs: Vec<String> = String::from_utf8_lossy(&output.stderr)
            .lines()
            .map(str::to_string)
            .collect();

        if !output.status.success() {
            logs.push(format!("{} exited with {}", self.command, output.status));
            return Ok(BuildOutput { success: false, logs, artifacts: Vec::new() });
        }

        let mut artifacts = Vec::new();
        for path in out_paths {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read build artifact {}", path.display()))?;
            artifacts.push(Artifact { path, text });
        }

        Ok(BuildOutput { success: true, logs, artifacts })
    }
}
