//! Linker cache entry type.

use std::path::{Path, PathBuf};

/// One entry of the dynamic linker cache.
///
/// Produced by [`crate::LinkerCache::parse`]. The ABI tag is kept for
/// diagnostics only; the architecture check reads the ELF header instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRecord {
    /// Bare shared-object file name (e.g. `libdcgm.so.4`).
    pub name: String,
    /// Text inside the parentheses (e.g. `libc6,x86-64`).
    pub abi_tag: String,
    /// Absolute path the cache resolves the name to.
    pub resolved_path: PathBuf,
}

impl LibraryRecord {
    /// Create a new record.
    pub fn new(
        name: impl Into<String>,
        abi_tag: impl Into<String>,
        resolved_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            abi_tag: abi_tag.into(),
            resolved_path: resolved_path.into(),
        }
    }

    /// Resolved absolute path of the library.
    pub fn path(&self) -> &Path {
        &self.resolved_path
    }
}
