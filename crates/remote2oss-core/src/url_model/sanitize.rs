//! Restriction of URL-derived names to a fixed safe character set.

/// Replaces every character outside `[0-9a-zA-Z._/-]` with `_`, then lowercases.
///
/// Each offending character becomes exactly one `_` (no collapsing), so the
/// output has the same number of characters as the input. `/` is kept; callers
/// that need a single path component sanitize the basename only.
pub fn sanitize_segment(name: &str) -> String {
    name.chars()
        .map(|c| {
            if is_safe(c) {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-')
}
