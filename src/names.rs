//! Record name sanitization
//!
//! Store record names must be lowercase RFC 1123-style labels. These helpers
//! normalize arbitrary input (display names, git hosts) into valid names.

const MAX_NAME_LENGTH: usize = 63;

/// Sanitize to a valid record name: lowercase, `[a-z0-9-]` only
pub fn to_valid_name(name: &str) -> String {
    sanitize(name, false)
}

/// Sanitize to a valid record name, preserving dots
///
/// Used for host-derived names such as `github.example.com`.
pub fn to_valid_name_with_dots(name: &str) -> String {
    sanitize(name, true)
}

fn sanitize(name: &str, allow_dots: bool) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let valid = c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-'
            || (allow_dots && c == '.');
        out.push(if valid { c } else { '-' });
    }

    let trimmed = out.trim_matches(|c| c == '-' || c == '.');
    trimmed.chars().take(MAX_NAME_LENGTH).collect()
}
