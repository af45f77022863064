use log::trace;
use regex::Regex;
use std::sync::LazyLock;

use crate::types::{SpecKind, Specifier};

// `import x from '…'`, `import { a, b as c } from '…'`, `import * as ns from '…'`,
// `export { x } from '…'`, `export * from '…'`, and the bare `import '…'` form.
// The lazy binding-list group may span lines; only a quoted literal is captured.
static IMPORT_FROM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:import|export)\b\s*(?:[^'"]*?\s*\bfrom\b\s*)?['"]([^'"]+)['"]"#)
        .expect("valid import/export regex")
});

static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid require regex")
});

static DYNAMIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid dynamic import regex")
});

/// List every literal module specifier referenced in a comment-stripped source
/// text. Matches from the three surface forms are merged in pattern order;
/// duplicates are kept (the closure scanner deduplicates).
///
/// Only quoted string literals are recognized. Specifiers built from variables
/// or template interpolation are statically unanalyzable and ignored.
pub fn extract_specifiers(source: &str) -> Vec<Specifier> {
    let mut specs: Vec<Specifier> = Vec::new();

    for caps in IMPORT_FROM.captures_iter(source) {
        let request = caps[1].to_string();
        trace!("Found static import/export: '{}'", request);
        specs.push(Specifier { request, kind: SpecKind::Static });
    }
    for caps in REQUIRE_CALL.captures_iter(source) {
        let request = caps[1].to_string();
        trace!("Found require() call: '{}'", request);
        specs.push(Specifier { request, kind: SpecKind::Require });
    }
    for caps in DYNAMIC_IMPORT.captures_iter(source) {
        let request = caps[1].to_string();
        trace!("Found dynamic import(): '{}'", request);
        specs.push(Specifier { request, kind: SpecKind::Dynamic });
    }

    specs
}
