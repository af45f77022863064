#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub request: String,
    pub kind: SpecKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// `import … from '…'` / `export … from '…'`
    Static,
    /// `require('…')`
    Require,
    /// `import('…')`
    Dynamic,
}
