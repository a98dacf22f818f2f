//! Address normalization shared by the mapping builder and the rewrite engine.
//!
//! A normalized address is lowercase hexadecimal with no `0x` prefix and at least one digit.

/// Normalize a raw address token.
///
/// Strips one leading `0x`/`0X`, drops every non-hex character, and lowercases the rest.
/// Returns `None` when nothing is left.
pub fn normalize_address(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let normalized: String = body
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if normalized.is_empty() { None } else { Some(normalized) }
}

/// True when `value` is already in normalized form.
pub fn is_normalized(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
