//! `BinaryInspector` implementation backed by the ELF header reader.

use std::path::Path;

use preflight_core::{BinaryInspector, Machine, OpenError};
use tracing::debug;

use crate::header::read_header;

/// Reads the `e_machine` field from ELF binaries.
///
/// Stateless; construct once in the composition root and share behind an `Arc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElfInspector;

impl ElfInspector {
    pub const fn new() -> Self {
        Self
    }
}

impl BinaryInspector for ElfInspector {
    fn machine(&self, path: &Path) -> Result<Machine, OpenError> {
        let header = read_header(path)?;
        debug!(
            path = %path.display(),
            class = ?header.class,
            big_endian = header.big_endian,
            machine = %header.machine,
            "Read ELF header"
        );
        Ok(header.machine)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::header::ElfClass;
    use crate::header::test_support::elf_header;
    use preflight_core::OpenErrorKind;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_machine_from_synthetic_library() {
        let mut bytes = elf_header(ElfClass::Elf64, false, object::elf::EM_AARCH64);
        // Trailing section data must not matter.
        bytes.extend(std::iter::repeat_n(0xAB, 4096));
        let file = write_temp(&bytes);

        let machine = ElfInspector::new().machine(file.path()).unwrap();
        assert_eq!(machine, Machine::AARCH64);
    }

    #[test]
    fn test_non_elf_file_is_invalid_format() {
        let file = write_temp(b"#!/bin/sh\nexit 0\n");
        let err = ElfInspector.machine(file.path()).unwrap_err();
        assert!(matches!(err.kind, OpenErrorKind::InvalidFormat(_)));
        assert_eq!(err.path, file.path());
    }

    #[test]
    fn test_empty_file_is_invalid_format() {
        let file = write_temp(b"");
        let err = ElfInspector.machine(file.path()).unwrap_err();
        assert!(matches!(err.kind, OpenErrorKind::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("libdcgm.so.4");
        let err = ElfInspector.machine(&path).unwrap_err();
        assert_eq!(err.kind, OpenErrorKind::NotFound);
        assert_eq!(err.path, path);
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ElfInspector.machine(dir.path()).is_err());
    }

    #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
    #[test]
    fn test_self_image_is_x86_64() {
        let machine = ElfInspector
            .machine(Path::new(preflight_core::SELF_IMAGE_PATH))
            .unwrap();
        assert_eq!(machine, Machine::X86_64);
    }

    #[cfg(all(target_os = "linux", target_arch = "aarch64"))]
    #[test]
    fn test_self_image_is_aarch64() {
        let machine = ElfInspector
            .machine(Path::new(preflight_core::SELF_IMAGE_PATH))
            .unwrap();
        assert_eq!(machine, Machine::AARCH64);
    }
}
