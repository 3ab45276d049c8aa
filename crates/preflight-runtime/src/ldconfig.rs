//! Locating the linker cache tool.
//!
//! Debian and Ubuntu ship `/sbin/ldconfig` as a shell wrapper around
//! `/sbin/ldconfig.real`; calling the real binary avoids the wrapper's
//! side effects, so it is preferred when present.

use std::path::{Path, PathBuf};

use preflight_core::{DEFAULT_LDCONFIG_PATH, LDCONFIG_REAL_PATH};
use tracing::debug;

/// Resolve the ldconfig binary to run.
///
/// An explicitly configured path always wins, even if it does not exist; the
/// resulting execution error is more useful to the operator than a silent
/// fallback.
pub fn resolve_ldconfig(configured: Option<&Path>) -> PathBuf {
    resolve_ldconfig_from(
        configured,
        &[Path::new(LDCONFIG_REAL_PATH)],
        Path::new(DEFAULT_LDCONFIG_PATH),
    )
}

/// Like [`resolve_ldconfig`], with explicit candidates.
pub fn resolve_ldconfig_from(
    configured: Option<&Path>,
    candidates: &[&Path],
    fallback: &Path,
) -> PathBuf {
    if let Some(path) = configured {
        debug!(path = %path.display(), "Using configured ldconfig");
        return path.to_path_buf();
    }

    let path = candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .map_or_else(|| fallback.to_path_buf(), |found| found.to_path_buf());
    debug!(path = %path.display(), "Detected ldconfig");
    path
}
