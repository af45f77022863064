/// Mapping from each external specifier to a unique synthetic identifier
/// (`_dep0`, `_dep1`, …), assigned in input order.
///
/// Injective by construction and stable for the duration of one build: the
/// vendor entry module and the import rewriter must agree on it.
#[derive(Debug, Clone)]
pub struct AliasMap {
    entries: Vec<(String, String)>,
}

impl AliasMap {
    pub fn new(externals: &[String]) -> Self {
        let entries = externals
            .iter()
            .enumerate()
            .map(|(i, request)| (request.clone(), format!("_dep{}", i)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, request: &str) -> Option<&str> {
        self.entries.iter().find(|(r, _)| r == request).map(|(_, a)| a.as_str())
    }

    /// Pairs of (specifier, alias) in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(r, a)| (r.as_str(), a.as_str()))
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, a)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
