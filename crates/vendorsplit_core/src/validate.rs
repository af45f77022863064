/// Whether a raw extracted string is a plausible module specifier.
///
/// The extractor is a textual scanner, so it occasionally captures fragments
/// of multi-line templates or concatenated strings. Everything that reaches
/// the external set or the resolver must pass this check first.
pub fn is_valid_specifier(request: &str) -> bool {
    if request.trim().is_empty() {
        return false;
    }
    // A match spanning a newline means the pattern ran past the intended
    // literal, same for leading/trailing whitespace.
    if request.contains('\n') || request.contains('\r') {
        return false;
    }
    if request != request.trim() {
        return false;
    }
    // Template interpolation marker: the value is not statically known.
    if request.contains("${") {
        return false;
    }
    if !request
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-' | '_' | '@' | ':'))
    {
        return false;
    }
    // Pure punctuation is a scanner artifact, not a module name.
    request.chars().any(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_bare_package() {
        assert!(is_valid_specifier("lodash"));
        assert!(is_valid_specifier("left-pad"));
    }

    #[test]
    fn test_accepts_scoped_package() {
        assert!(is_valid_specifier("@scope/pkg"));
        assert!(is_valid_specifier("node:path"));
    }

    #[test]
    fn test_accepts_relative_path() {
        assert!(is_valid_specifier("./utils/helpers"));
        assert!(is_valid_specifier("../index.ts"));
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(!is_valid_specifier(""));
        assert!(!is_valid_specifier("   "));
    }

    #[test]
    fn test_rejects_newlines() {
        assert!(!is_valid_specifier("pkg\nother"));
        assert!(!is_valid_specifier("pkg\r"));
    }

    #[test]
    fn test_rejects_surrounding_whitespace() {
        assert!(!is_valid_specifier(" pkg"));
        assert!(!is_valid_specifier("pkg "));
    }

    #[test]
    fn test_rejects_interpolation() {
        assert!(!is_valid_specifier("./pages/${name}"));
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        assert!(!is_valid_specifier("pkg name"));
        assert!(!is_valid_specifier("pkg;drop"));
        assert!(!is_valid_specifier("a+b"));
    }

    #[test]
    fn test_rejects_pure_punctuation() {
        assert!(!is_valid_specifier("./"));
        assert!(!is_valid_specifier("..."));
        assert!(!is_valid_specifier("@"));
    }
}
