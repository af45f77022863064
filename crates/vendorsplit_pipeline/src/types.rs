use std::path::PathBuf;

/// One output file produced by the host build tool. Mutated in place by the
/// import rewriter: content replaced, path unchanged.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub text: String,
}

/// Result of one host-build invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub success: bool,
    pub logs: Vec<String>,
    pub artifacts: Vec<Artifact>,
}

/// Result of a full split build: first-party artifacts (transformed and, when
/// a vendor artifact exists, rewritten) plus the optional vendor build result.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub success: bool,
    pub logs: Vec<String>,
    pub artifacts: Vec<Artifact>,
    pub vendor: Option<BuildOutput>,
}
