//! Dependency-closure scanning for JavaScript/TypeScript source trees.
//!
//! This crate statically discovers the full transitive set of third-party
//! module specifiers referenced from a set of entry files, without executing
//! any code or running a full module resolver:
//! - Stripping comments so inactive code cannot contribute specifiers
//! - Extracting literal specifiers from `import`/`export … from`,
//!   `require()` and dynamic `import()` forms
//! - Validating raw matches against scanner artifacts
//! - Resolving relative specifiers on disk (extension and index probing)
//! - Walking the implicit import graph breadth-first with a visited set
//!
//! Extraction is textual by design: cheap, order-preserving, and good enough
//! to decide which packages belong in a vendor bundle. It is not an AST.

mod collector;
mod constants;
mod extract;
mod resolver;
mod scanner;
mod strip;
mod types;
mod validate;

// Re-export public API
pub use collector::collect_entries;
pub use constants::{INDEX_FILES, JS_TS_EXTENSIONS, RESOLVE_EXTENSIONS};
pub use extract::extract_specifiers;
pub use resolver::resolve_local;
pub use scanner::{collect_externals, default_is_external};
pub use strip::strip_comments;
pub use types::{SpecKind, Specifier};
pub use validate::is_valid_specifier;
