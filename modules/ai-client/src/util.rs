/// Truncate a string to at most `max_chars` characters.
pub fn truncate_to_char_count(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Strip a surrounding markdown code fence from a response.
///
/// Handles both bare fences and fences carrying a language tag
/// (```` ```json ````, ```` ```javascript ````). Text without a leading
/// fence is only trimmed.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
