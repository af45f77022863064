use anyhow::Result;
use regex::Regex;

/// Options handed verbatim to the transformation engine. Arbitrary JSON, the
/// engine owns its own schema.
pub type TransformOptions = serde_json::Value;

/// Narrow seam to the code-transformation engine (the obfuscator). Invoked
/// once per first-party script artifact between the two build steps.
pub trait Transformer {
    fn transform(&self, source: &str, options: &TransformOptions) -> Result<String>;
}

/// Engine that returns the source unchanged. Stands in when no obfuscator is
/// wired up, keeping the rest of the pipeline exercised.
#[derive(Debug, Clone, Default)]
pub struct IdentityTransformer;

impl Transformer for IdentityTransformer {
    fn transform(&self, source: &str, _options: &TransformOptions) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Single-phase, source-level unit: transforms files whose name passes the
/// include/exclude filter during compilation. No closure scanning, no vendor
/// split.
#[derive(Debug)]
pub struct TransformPlugin {
    include: Option<Regex>,
    exclude: Option<Regex>,
    options: TransformOptions,
}

impl TransformPlugin {
    pub fn new(
        options: TransformOptions,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> Result<Self> {
        let include = include.map(Regex::new).transpose()?;
        let exclude = exclude.map(Regex::new).transpose()?;
        Ok(Self { include, exclude, options })
    }

    pub fn applies_to(&self, file_name: &str) -> bool {
        if let Some(include) = &self.include
            && !include.is_match(file_name)
        {
            return false;
        }
        if let Some(exclude) = &self.exclude
            && exclude.is_match(file_name)
        {
            return false;
        }
        true
    }

    /// Transform one file. `Ok(None)` means the filter excluded it and the
    /// source must be used untouched.
    pub fn run(
        &self,
        file_name: &str,
        source: &str,
        engine: &dyn Transformer,
    ) -> Result<Option<String>> {
        if !self.applies_to(file_name) {
            return Ok(None);
        }
        engine.transform(source, &self.options).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Upcase;
    impl Transformer for Upcase {
        fn transform(&self, source: &str, _options: &TransformOptions) -> Result<String> {
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_no_filter_matches_everything() {
        let plugin = TransformPlugin::new(json!({}), None, None).unwrap();
        assert!(plugin.applies_to("a.js"));
        assert!(plugin.applies_to("nested/b.ts"));
    }

    #[test]
    fn test_include_filter() {
        let plugin = TransformPlugin::new(json!({}), Some(r"\.js$"), None).unwrap();
        assert!(plugin.applies_to("a.js"));
        assert!(!plugin.applies_to("a.css"));
    }

    #[test]
    fn test_exclude_filter() {
        let plugin = TransformPlugin::new(json!({}), None, Some("vendor")).unwrap();
        assert!(plugin.applies_to("app.js"));
        assert!(!plugin.applies_to("vendor.js"));
    }

    #[test]
    fn test_run_transforms_matching_file() {
        let plugin = TransformPlugin::new(json!({}), Some(r"\.js$"), None).unwrap();
        let out = plugin.run("app.js", "let x;", &Upcase).unwrap();
        assert_eq!(out.as_deref(), Some("LET X;"));
    }

    #[test]
    fn test_run_skips_filtered_file() {
        let plugin = TransformPlugin::new(json!({}), Some(r"\.js$"), None).unwrap();
        let out = plugin.run("styles.css", "body {}", &Upcase).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_invalid_filter_is_an_error() {
        assert!(TransformPlugin::new(json!({}), Some("("), None).is_err());
    }
}
