//! Checks that a shared library is installed and matches this process's architecture.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::PrerequisiteRule;
use crate::error::PrerequisiteError;
use crate::linker_cache::LinkerCache;
use crate::ports::{BinaryInspector, ProcessRunner};
use crate::settings::{LDCONFIG_LIST_ARG, RequiredLibrary, SELF_IMAGE_PATH};

/// Verifies that a library is in the dynamic linker cache and that its ELF
/// machine matches the machine of the running process.
///
/// The pipeline is linear and fail-fast:
///
/// 1. list the linker cache (`<ldconfig> -p`)
/// 2. parse the listing
/// 3. resolve the library name
/// 4. read the machine of the running process image
/// 5. read the machine of the resolved library
/// 6. compare
///
/// Step 4 runs before step 5 so that a broken self image is never reported as
/// a problem with the library.
pub struct LibraryExistsRule {
    rule_name: String,
    library: RequiredLibrary,
    ldconfig: PathBuf,
    self_image: PathBuf,
    processes: Arc<dyn ProcessRunner>,
    inspector: Arc<dyn BinaryInspector>,
}

impl LibraryExistsRule {
    /// Create a rule for `library`, listing the cache with `ldconfig`.
    pub fn new(
        library: RequiredLibrary,
        ldconfig: impl Into<PathBuf>,
        processes: Arc<dyn ProcessRunner>,
        inspector: Arc<dyn BinaryInspector>,
    ) -> Self {
        Self {
            rule_name: format!("library-exists:{}", library.name),
            library,
            ldconfig: ldconfig.into(),
            self_image: PathBuf::from(SELF_IMAGE_PATH),
            processes,
            inspector,
        }
    }

    /// Compare against a different reference image than `/proc/self/exe`.
    #[must_use]
    pub fn with_self_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.self_image = path.into();
        self
    }

    fn list_cache(&self) -> Result<LinkerCache, PrerequisiteError> {
        let args = [LDCONFIG_LIST_ARG.to_string()];
        let output = self.processes.output(&self.ldconfig, &args)?;
        debug!(
            ldconfig = %self.ldconfig.display(),
            bytes = output.len(),
            "Listed dynamic linker cache"
        );
        Ok(LinkerCache::parse_bytes(&output)?)
    }
}

impl PrerequisiteRule for LibraryExistsRule {
    fn name(&self) -> &str {
        &self.rule_name
    }

    fn validate(&self) -> Result<(), PrerequisiteError> {
        let cache = self.list_cache()?;

        let record = cache
            .resolve(&self.library.name)
            .ok_or_else(|| PrerequisiteError::NotFound {
                library: self.library.name.clone(),
                install_hint: self.library.install_hint.clone(),
            })?;
        debug!(
            library = %record.name,
            path = %record.resolved_path.display(),
            abi = %record.abi_tag,
            "Resolved library through linker cache"
        );

        let wanted = self
            .inspector
            .machine(&self.self_image)
            .map_err(PrerequisiteError::ProcessImage)?;

        let received = self
            .inspector
            .machine(record.path())
            .map_err(|source| PrerequisiteError::LibraryImage {
                library: self.library.name.clone(),
                source,
            })?;

        debug!(library = %self.library.name, %wanted, %received, "Compared ELF machines");
        if wanted != received {
            return Err(PrerequisiteError::ArchitectureMismatch {
                library: self.library.name.clone(),
                wanted,
                received,
            });
        }

        Ok(())
    }
}
