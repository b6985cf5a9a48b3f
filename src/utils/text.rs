// src/utils/text.rs

use std::sync::LazyLock;

use regex::Regex;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_-]*[ \t]*$").expect("fence pattern is valid")
});

/// Removes markdown code-fence marker lines (```` ``` ```` / ```` ```json ````),
/// leaving the fenced body and any surrounding prose in place.
pub fn strip_code_fences(input: &str) -> String {
    FENCE.replace_all(input, "").trim().to_string()
}

/// Truncates on a char boundary so the result holds at most `max_chars` characters.
pub fn truncate_chars(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &input[..byte_idx],
        None => input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fences_with_language_tag() {
        let raw = "```json\n[1, 2]\n```";
        assert_eq!(strip_code_fences(raw), "[1, 2]");
    }

    #[test]
    fn keeps_prose_around_fences() {
        let raw = "Here you go:\n```\n[]\n```\nEnjoy!";
        assert_eq!(strip_code_fences(raw), "Here you go:\n\n[]\n\nEnjoy!");
    }

    #[test]
    fn truncation_respects_multibyte_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
