//! Vendor-splitting build pipeline for JavaScript/TypeScript bundles.
//!
//! Orchestrates the stages around the closure scanner from
//! `vendorsplit_core`:
//! 1. Scan the source tree for the external dependency closure
//! 2. Compile first-party entries with every external excluded
//! 3. Run the transformation engine (obfuscator) on first-party artifacts
//! 4. Bundle all externals into one consolidated vendor artifact
//! 5. Rewrite first-party imports to reference the vendor artifact's aliases
//!
//! The host build tool and the transformation engine are collaborators behind
//! the [`BuildTool`] and [`Transformer`] traits; `Esbuild` ships as the
//! default host tool.

mod alias;
mod config;
mod pipeline;
mod rewrite;
mod tool;
mod transform;
mod types;
mod vendor;

// Re-export public API
pub use alias::AliasMap;
pub use config::{Config, read_transform_options};
pub use pipeline::{resolve_entries, split_build};
pub use rewrite::{rewrite_artifacts, rewrite_source};
pub use tool::{BuildTool, BundleRequest, Esbuild};
pub use transform::{IdentityTransformer, TransformOptions, TransformPlugin, Transformer};
pub use types::{Artifact, BuildOutput, SplitResult};
