use anyhow::{Context, Result};
use log::{debug, trace};
use path_clean::clean;
use regex::{NoExpand, Regex};
use std::{
    env, fs,
    path::{Component, Path, PathBuf},
};

use crate::alias::AliasMap;
use crate::types::Artifact;

/// Rewrite every recognized import/require of an external specifier into a
/// reference to its vendor alias, then prepend one consolidated import of all
/// aliases from the vendor artifact.
///
/// Four surface forms are covered, in order, per specifier:
/// - `import x from "spec"`        → `const x = ALIAS.default || ALIAS;`
/// - `import * as ns from "spec"`  → `const ns = ALIAS;`
/// - `import { a, b as c } …`      → `const { a, b: c } = ALIAS;`
/// - `require("spec")`             → `ALIAS`
///
/// Pure text transform: the result is not re-parsed. Re-exports of an
/// external specifier and imports split across lines are outside the
/// contract of this substitution strategy.
pub fn rewrite_source(source: &str, aliases: &AliasMap, vendor_import: &str) -> String {
    let mut text = source.to_string();

    for (request, alias) in aliases.iter() {
        let spec = regex::escape(request);

        // Keywords are word-anchored so identifiers like `__require` or
        // `reimport` never match, same as the extractor's patterns.
        let default_re = Regex::new(&format!(
            r#"\bimport\s+([A-Za-z_$][\w$]*)\s+from\s*['"]{spec}['"];?"#
        ))
        .expect("valid default import regex");
        text = default_re
            .replace_all(&text, |caps: &regex::Captures| {
                format!("const {} = {alias}.default || {alias};", &caps[1])
            })
            .into_owned();

        let namespace_re = Regex::new(&format!(
            r#"\bimport\s*\*\s*as\s+([A-Za-z_$][\w$]*)\s+from\s*['"]{spec}['"];?"#
        ))
        .expect("valid namespace import regex");
        text = namespace_re
            .replace_all(&text, |caps: &regex::Captures| format!("const {} = {alias};", &caps[1]))
            .into_owned();

        let named_re = Regex::new(&format!(
            r#"\bimport\s*\{{([^}}]*)\}}\s*from\s*['"]{spec}['"];?"#
        ))
        .expect("valid named import regex");
        text = named_re
            .replace_all(&text, |caps: &regex::Captures| {
                format!("const {{ {} }} = {alias};", rewrite_bindings(&caps[1]))
            })
            .into_owned();

        let require_re = Regex::new(&format!(r#"\brequire\s*\(\s*['"]{spec}['"]\s*\)"#))
            .expect("valid require regex");
        text = require_re.replace_all(&text, NoExpand(alias)).into_owned();
    }

    let alias_list: Vec<&str> = aliases.aliases().collect();
    format!("import {{ {} }} from \"{}\";\n{}", alias_list.join(", "), vendor_import, text)
}

/// Turns `a, b as c` into `a, b: c`, so ESM named-import renames become
/// destructuring renames.
fn rewrite_bindings(list: &str) -> String {
    list.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|binding| match binding.split_once(" as ") {
            Some((from, to)) => format!("{}: {}", from.trim(), to.trim()),
            None => binding.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Relative path from an artifact's directory to the vendor artifact, in the
/// `./`-prefixed form module specifiers need.
///
/// Both paths are normalized to absolute form first, so a relative out dir
/// and an absolute `--vendor-path` diff correctly.
pub(crate) fn vendor_import_path(artifact: &Path, vendor_file: &Path) -> String {
    let artifact = absolute(artifact);
    let vendor_file = absolute(vendor_file);
    let from_dir: Vec<Component> =
        artifact.parent().unwrap_or(Path::new("")).components().collect();
    let to: Vec<Component> = vendor_file.components().collect();

    let common = from_dir.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();
    let ups = from_dir.len() - common;
    let rest = to[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    if ups == 0 {
        format!("./{}", rest)
    } else {
        format!("{}{}", "../".repeat(ups), rest)
    }
}

fn absolute(p: &Path) -> PathBuf {
    if p.is_absolute() {
        clean(p)
    } else {
        let base = env::current_dir().unwrap_or_default();
        clean(base.join(p))
    }
}

/// Rewrite every script artifact in place against the vendor artifact.
pub fn rewrite_artifacts(
    artifacts: &mut [Artifact],
    aliases: &AliasMap,
    vendor_file: &Path,
) -> Result<()> {
    if aliases.is_empty() {
        return Ok(());
    }

    for artifact in artifacts.iter_mut() {
        if !is_script(&artifact.path) {
            continue;
        }
        let vendor_import = vendor_import_path(&artifact.path, vendor_file);
        trace!(
            "Rewriting {} against vendor import '{}'",
            artifact.path.display(),
            vendor_import
        );
        artifact.text = rewrite_source(&artifact.text, aliases, &vendor_import);
        fs::write(&artifact.path, &artifact.text).with_context(|| {
            format!("Failed to persist rewritten artifact {}", artifact.path.display())
        })?;
    }

    debug!("Rewrote {} artifacts against {}", artifacts.len(), vendor_file.display());
    Ok(())
}

pub(crate) fn is_script(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("js") | Some("mjs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn aliases(externals: &[&str]) -> AliasMap {
        AliasMap::new(&externals.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_default_import() {
        let out = rewrite_source(r#"import x from "pkg";"#, &aliases(&["pkg"]), "./vendor.js");
        assert!(out.contains("const x = _dep0.default || _dep0;"));
        assert!(!out.contains(r#"from "pkg""#));
    }

    #[test]
    fn test_namespace_import() {
        let out = rewrite_source(r#"import * as y from "pkg2";"#, &aliases(&["pkg2"]), "./vendor.js");
        assert!(out.contains("const y = _dep0;"));
    }

    #[test]
    fn test_named_import_with_rename() {
        let out = rewrite_source(
            r#"import { a, b as c } from "pkg3";"#,
            &aliases(&["pkg3"]),
            "./vendor.js",
        );
        assert!(out.contains("const { a, b: c } = _dep0;"));
    }

    #[test]
    fn test_require_call() {
        let out = rewrite_source(r#"const z = require("pkg4");"#, &aliases(&["pkg4"]), "./vendor.js");
        assert!(out.contains("const z = _dep0;"));
        assert!(!out.contains("require"));
    }

    #[test]
    fn test_round_trip_all_four_forms() {
        let source = concat!(
            "import x from \"pkg\";\n",
            "import * as y from \"pkg2\";\n",
            "import { a, b as c } from \"pkg3\";\n",
            "const d = require(\"pkg4\");\n",
        );
        let map = aliases(&["pkg", "pkg2", "pkg3", "pkg4"]);
        let out = rewrite_source(source, &map, "./vendor.js");

        // Exactly one prepended vendor import naming all four aliases
        let first_line = out.lines().next().unwrap();
        assert_eq!(first_line, "import { _dep0, _dep1, _dep2, _dep3 } from \"./vendor.js\";");
        assert_eq!(out.matches("./vendor.js").count(), 1);

        // No import/require of the original literals survives
        for pkg in ["\"pkg\"", "\"pkg2\"", "\"pkg3\"", "\"pkg4\""] {
            assert!(!out.contains(pkg), "literal {} still referenced", pkg);
        }
    }

    #[test]
    fn test_single_quotes_handled() {
        let out = rewrite_source("import x from 'pkg';", &aliases(&["pkg"]), "./vendor.js");
        assert!(out.contains("const x = _dep0.default || _dep0;"));
    }

    #[test]
    fn test_interop_shim_identifier_untouched() {
        // esbuild's ESM output calls a `__require` shim for CJS modules;
        // only the bare `require` keyword may be rewritten.
        let source = r#"var m = __require("pkg");"#;
        let out = rewrite_source(source, &aliases(&["pkg"]), "./vendor.js");
        assert!(out.contains(r#"var m = __require("pkg");"#));
        assert!(!out.contains("___dep0"));
    }

    #[test]
    fn test_identifier_ending_in_import_untouched() {
        let source = r#"reimport x from "pkg";"#;
        let out = rewrite_source(source, &aliases(&["pkg"]), "./vendor.js");
        assert!(out.contains(r#"reimport x from "pkg";"#));
    }

    #[test]
    fn test_unrelated_specifiers_untouched() {
        let source = "import x from \"pkg\";\nimport q from \"other\";";
        let out = rewrite_source(source, &aliases(&["pkg"]), "./vendor.js");
        assert!(out.contains("import q from \"other\";"));
    }

    #[test]
    fn test_specifier_with_regex_metacharacters() {
        let out = rewrite_source(
            "import x from \"@scope/pkg.js\";",
            &aliases(&["@scope/pkg.js"]),
            "./vendor.js",
        );
        assert!(out.contains("const x = _dep0.default || _dep0;"));
    }

    #[test]
    fn test_vendor_import_path_same_dir() {
        let artifact = PathBuf::from("dist/app.js");
        let vendor = PathBuf::from("dist/vendor.js");
        assert_eq!(vendor_import_path(&artifact, &vendor), "./vendor.js");
    }

    #[test]
    fn test_vendor_import_path_from_nested_artifact() {
        let artifact = PathBuf::from("dist/pages/about.js");
        let vendor = PathBuf::from("dist/vendor.js");
        assert_eq!(vendor_import_path(&artifact, &vendor), "../vendor.js");
    }

    #[test]
    fn test_vendor_import_path_absolute_paths() {
        let artifact = PathBuf::from("/proj/dist/app.js");
        let vendor = PathBuf::from("/shared/vendor.js");
        assert_eq!(vendor_import_path(&artifact, &vendor), "../../shared/vendor.js");
    }

    #[test]
    fn test_vendor_import_path_mixed_forms_agree() {
        // A relative artifact path against an absolute vendor path must diff
        // the same as the fully absolute pair, never emit absolute segments.
        let cwd = std::env::current_dir().unwrap();
        let vendor = PathBuf::from("/shared/vendor.js");
        let mixed = vendor_import_path(Path::new("dist/app.js"), &vendor);
        let absolute = vendor_import_path(&cwd.join("dist/app.js"), &vendor);
        assert_eq!(mixed, absolute);
        assert!(!mixed.contains("//"));
        assert!(mixed.ends_with("shared/vendor.js"));
    }

    #[test]
    fn test_rewrite_artifacts_skips_non_scripts() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let css_path = temp_dir.path().join("style.css");
        let js_path = temp_dir.path().join("app.js");
        std::fs::write(&css_path, "body {}").unwrap();
        std::fs::write(&js_path, "import x from \"pkg\";").unwrap();

        let mut artifacts = vec![
            Artifact { path: css_path.clone(), text: "body {}".to_string() },
            Artifact { path: js_path.clone(), text: "import x from \"pkg\";".to_string() },
        ];
        let vendor = temp_dir.path().join("vendor.js");
        rewrite_artifacts(&mut artifacts, &aliases(&["pkg"]), &vendor).unwrap();

        assert_eq!(artifacts[0].text, "body {}");
        assert!(artifacts[1].text.contains("_dep0"));
        assert!(std::fs::read_to_string(&js_path).unwrap().contains("_dep0"));
    }
}
