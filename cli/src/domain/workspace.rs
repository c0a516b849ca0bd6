//! Workspace path handling and in-container layout constants.
//!
//! This module is intentionally free of I/O, async, and external layer imports.
//! Canonicalisation against the real filesystem happens through the
//! `WorkspaceFs` port; everything here is lexical.

use std::path::{Component, Path, PathBuf};

/// Mount point of the host workspace inside the container.
pub const WORKSPACE_MOUNT: &str = "/workspace";

/// Mount point of the data volume inside the container.
pub const DATA_MOUNT: &str = "/data";

/// Per-project config file discovered by walking up from the workspace.
pub const PROJECT_CONFIG_FILE: &str = ".agentpod.yaml";

/// Directory entry marking a version-control root; discovery stops there.
pub const VCS_MARKER: &str = ".git";

/// Expand a leading `~` or `~/` using `home`.
///
/// Other forms (`~user`) are left untouched, as is everything when `home` is unknown.
#[must_use]
pub fn expand_home(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (s, Some(home)) if s.starts_with("~/") => home.join(&s[2..]),
        _ => PathBuf::from(raw),
    }
}

/// Make `path` absolute against `cwd` and fold `.` and `..` components.
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    normalize_lexically(&joined)
}

/// Fold `.` and `..` without touching the filesystem. `..` never climbs above root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.parent().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// String form of a normalised workspace path, as stored in labels and config keys.
#[must_use]
pub fn workspace_key(path: &Path) -> String {
    let s = path.to_string_lossy().to_string();
    if s.len() > 1 {
        s.trim_end_matches('/').to_string()
    } else {
        s
    }
}
