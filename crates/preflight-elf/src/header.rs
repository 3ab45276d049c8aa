//! ELF identification and file header reading.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use object::elf::{ELFMAG, FileHeader32, FileHeader64};
use object::read::elf::FileHeader;
use object::{Endian, Endianness, FileKind};
use preflight_core::{Machine, OpenError};

use crate::error::{ElfInternalError, ElfResult};

/// Largest file header we ever need (ELF64).
const HEADER_READ_LEN: u64 = 64;

/// Size of `e_ident`.
const IDENT_LEN: usize = 16;

/// ELF file class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

/// The parts of an ELF file header we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElfHeader {
    pub class: ElfClass,
    pub big_endian: bool,
    pub machine: Machine,
}

/// Read the ELF header of `path`.
///
/// At most 64 bytes are read and the file is closed before returning.
pub fn read_header(path: &Path) -> Result<ElfHeader, OpenError> {
    read_prefix(path)
        .and_then(|bytes| parse_header(&bytes))
        .map_err(|err| OpenError::new(path, err.into()))
}

fn read_prefix(path: &Path) -> ElfResult<Vec<u8>> {
    let file = File::open(path).map_err(ElfInternalError::from_io)?;
    let mut bytes = Vec::with_capacity(64);
    file.take(HEADER_READ_LEN)
        .read_to_end(&mut bytes)
        .map_err(ElfInternalError::from_io)?;
    Ok(bytes)
}

/// Parse an ELF header from the start of `data`.
pub(crate) fn parse_header(data: &[u8]) -> ElfResult<ElfHeader> {
    if data.len() < ELFMAG.len() {
        return Err(ElfInternalError::Truncated(data.len()));
    }
    if data[..ELFMAG.len()] != ELFMAG {
        return Err(ElfInternalError::NotElf);
    }
    if data.len() < IDENT_LEN {
        return Err(ElfInternalError::Truncated(data.len()));
    }

    match FileKind::parse(data).map_err(|e| ElfInternalError::Malformed(e.to_string()))? {
        FileKind::Elf32 => parse_with::<FileHeader32<Endianness>>(data, ElfClass::Elf32),
        FileKind::Elf64 => parse_with::<FileHeader64<Endianness>>(data, ElfClass::Elf64),
        other => Err(ElfInternalError::Malformed(format!(
            "unexpected file kind {other:?}"
        ))),
    }
}

fn parse_with<H>(data: &[u8], class: ElfClass) -> ElfResult<ElfHeader>
where
    H: FileHeader<Endian = Endianness>,
{
    if data.len() < size_of::<H>() {
        return Err(ElfInternalError::Truncated(data.len()));
    }
    let header = H::parse(data).map_err(|e| ElfInternalError::Malformed(e.to_string()))?;
    let endian = header
        .endian()
        .map_err(|e| ElfInternalError::Malformed(e.to_string()))?;

    Ok(ElfHeader {
        class,
        big_endian: endian.is_big_endian(),
        machine: Machine::from_raw(header.e_machine(endian)),
    })
}
