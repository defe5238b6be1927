/// Sanitizes user-supplied text (book descriptions, review comments) before storage.
///
/// Whitelist based: harmless formatting tags survive, while `<script>` (with
/// its content), `<iframe>` and event-handler attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Cleans an optional field and collapses blank results to `None`.
pub fn clean_optional(input: Option<&str>) -> Option<String> {
    input
        .map(clean_html)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scripts_but_keeps_text() {
        let cleaned = clean_html("Great read<script>alert(1)</script> <b>really</b>");
        assert_eq!(cleaned, "Great read <b>really</b>");
    }

    #[test]
    fn blank_optional_becomes_none() {
        assert_eq!(clean_optional(Some("  ")), None);
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some(" fun ")), Some("fun".to_string()));
    }
}
