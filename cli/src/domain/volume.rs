//! Data-volume naming rules.

/// Volume used when no other source names one.
pub const DEFAULT_DATA_VOLUME: &str = "agentpod-data";

/// Longest volume name accepted.
pub const MAX_VOLUME_NAME_LEN: usize = 255;

/// Returns `true` when `name` is a syntactically valid data-volume name.
///
/// Non-empty, at most 255 characters, first character ASCII alphanumeric,
/// remaining characters ASCII alphanumeric or one of `_`, `.`, `-`.
#[must_use]
pub fn is_valid_volume_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_VOLUME_NAME_LEN {
        return false;
    }
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Trim surrounding whitespace and keep the value only if it is a valid name.
#[must_use]
pub fn accept_volume_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    is_valid_volume_name(trimmed).then(|| trimmed.to_string())
}
