//! Filesystem infrastructure: implements `WorkspaceFs`.

use std::path::{Path, PathBuf};

use crate::application::ports::WorkspaceFs;

/// The real local filesystem.
pub struct LocalFs;

impl WorkspaceFs for LocalFs {
    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
