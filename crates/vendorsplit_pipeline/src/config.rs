use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::transform::TransformOptions;

#[derive(Debug, Clone, Parser)]
#[command(name = "split")]
#[command(about = "Split a compiled bundle into first-party and vendor artifacts")]
pub struct Config {
    /// Entry files to compile. When omitted, entries are collected from the
    /// project root.
    pub entries: Vec<PathBuf>,

    /// Root directory to collect entries from (defaults to the current
    /// directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Substring filter applied to collected entry paths
    #[arg(long)]
    pub entry_glob: Option<String>,

    /// Output directory for compiled artifacts
    #[arg(long, default_value = "dist")]
    pub out_dir: PathBuf,

    /// Skip the vendor bundle and the import rewrite entirely
    #[arg(long)]
    pub no_vendor: bool,

    /// File name of the consolidated vendor artifact
    #[arg(long, default_value = "vendor.js")]
    pub vendor_name: String,

    /// Reuse an existing vendor artifact instead of generating one. The file
    /// must already exist.
    #[arg(long)]
    pub vendor_path: Option<PathBuf>,

    /// Module names that must never be bundled, not even into the vendor
    /// artifact (native addons and the like). Repeatable.
    #[arg(long = "external")]
    pub always_external: Vec<String>,

    /// Minify build outputs
    #[arg(long)]
    pub minify: bool,

    /// Treat a failed vendor bundle as a build failure instead of a warning
    #[arg(long)]
    pub fail_on_vendor_error: bool,

    /// Path to a JSON file with transformation-engine options
    #[arg(long)]
    pub transform_config: Option<PathBuf>,

    #[clap(skip)]
    pub transform_options: TransformOptions,
}

impl Config {
    pub fn vendor_enabled(&self) -> bool {
        !self.no_vendor
    }

    /// Load `transform_options` from `transform_config` when one was given.
    pub fn load_transform_options(&mut self) -> Result<()> {
        if let Some(path) = &self.transform_config {
            self.transform_options = read_transform_options(path)?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            root: None,
            entry_glob: None,
            out_dir: PathBuf::from("dist"),
            no_vendor: false,
            vendor_name: "vendor.js".to_string(),
            vendor_path: None,
            always_external: Vec::new(),
            minify: false,
            fail_on_vendor_error: false,
            transform_config: None,
            transform_options: TransformOptions::Null,
        }
    }
}

pub fn read_transform_options(path: &Path) -> Result<TransformOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transform config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in transform config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_vendor_enabled_by_default() {
        assert!(Config::default().vendor_enabled());
    }

    #[test]
    fn test_load_transform_options() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("obfuscate.json");
        fs::write(&path, r#"{"compact": true, "seed": 42}"#).unwrap();

        let mut cfg = Config { transform_config: Some(path), ..Config::default() };
        cfg.load_transform_options().unwrap();
        assert_eq!(cfg.transform_options["seed"], 42);
    }

    #[test]
    fn test_invalid_transform_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "{ nope").unwrap();

        let mut cfg = Config { transform_config: Some(path), ..Config::default() };
        assert!(cfg.load_transform_options().is_err());
    }

    #[test]
    fn test_missing_transform_config_is_an_error() {
        let mut cfg = Config {
            transform_config: Some(PathBuf::from("/no/such/file.json")),
            ..Config::default()
        };
        assert!(cfg.load_transform_options().is_err());
    }
}
