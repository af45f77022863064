use regex::Regex;
use std::sync::LazyLock;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("valid line comment regex"));

/// Remove line and block comments from a source text so that commented-out
/// imports never reach the specifier extractor.
///
/// This is a textual pass, not a lexer: comment-like sequences inside string
/// or template literals are stripped too. Accepted trade-off; downstream
/// validation discards the malformed matches this can produce.
pub fn strip_comments(source: &str) -> String {
    // Blocks first, so `/* … // … */` collapses in one step.
    let without_blocks = BLOCK_COMMENT.replace_all(source, "");
    LINE_COMMENT.replace_all(&without_blocks, "").into_owned()
}
