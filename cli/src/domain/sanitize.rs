//! Name sanitising: turns repo paths and branch names into runtime-legal
//! identifiers.
//!
//! Pure functions only. No I/O, no async.

/// Maximum length of a DNS label, which is what container hostnames must fit.
pub const MAX_HOSTNAME_LEN: usize = 63;

/// Fallback used when sanitising leaves nothing behind.
pub const FALLBACK_NAME: &str = "workspace";

/// Branch placeholder used when the git query fails or times out.
pub const PLACEHOLDER_BRANCH: &str = "detached";

/// Length budget for each free-text component of a generated volume name.
const VOLUME_COMPONENT_LEN: usize = 96;

/// Lowercase, hyphen-separated, `[a-z0-9-]` only, at most 63 characters,
/// never starting or ending with a hyphen.
///
/// Returns an empty string when the input holds no usable characters.
#[must_use]
pub fn sanitize_hostname(input: &str) -> String {
    let collapsed = collapse(input.chars().map(|c| {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        }
    }));
    let mut out: String = collapsed.trim_matches('-').chars().take(MAX_HOSTNAME_LEN).collect();
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Sanitise one free-text component of a volume name.
///
/// Keeps `[a-z0-9_.-]` (lowercased), maps everything else to `-`, and strips
/// leading/trailing separators so the component can start a volume name.
#[must_use]
pub fn sanitize_volume_component(input: &str) -> String {
    let collapsed = collapse(input.chars().map(|c| {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            c
        } else {
            '-'
        }
    }));
    let trimmed = collapsed.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    trimmed.chars().take(VOLUME_COMPONENT_LEN).collect::<String>()
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Last non-empty segment of a slash-separated path.
#[must_use]
pub fn last_path_segment(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

/// Candidate container name for a workspace: its sanitised last segment.
#[must_use]
pub fn container_base_name(workspace: &str) -> String {
    let name = sanitize_hostname(last_path_segment(workspace));
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Fresh data-volume name for `shell --reset`: `<repo>-<branch>-<timestamp>`.
///
/// `branch` of `None` (git unavailable, detached, timed out) uses
/// [`PLACEHOLDER_BRANCH`]. The timestamp is expected in `%Y%m%d-%H%M%S` form.
#[must_use]
pub fn reset_volume_name(workspace: &str, branch: Option<&str>, timestamp: &str) -> String {
    let repo = sanitize_volume_component(last_path_segment(workspace));
    let repo = if repo.is_empty() { FALLBACK_NAME.to_string() } else { repo };
    let branch = branch
        .map(sanitize_volume_component)
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_BRANCH.to_string());
    format!("{repo}-{branch}-{timestamp}")
}

/// Short random suffix for container-name collisions: `-` plus 4 hex chars.
#[must_use]
pub fn collision_suffix() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    format!("-{:04x}", hasher.finish() & 0xffff)
}

/// Append `suffix` to `base`, shortening `base` so the result stays a legal hostname.
#[must_use]
pub fn with_suffix(base: &str, suffix: &str) -> String {
    let room = MAX_HOSTNAME_LEN.saturating_sub(suffix.len());
    let head: String = base.chars().take(room).collect();
    format!("{}{suffix}", head.trim_end_matches('-'))
}

fn collapse(chars: impl Iterator<Item = char>) -> String {
    let mut out = String::new();
    for c in chars {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}
