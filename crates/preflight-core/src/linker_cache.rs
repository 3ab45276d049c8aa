//! Parsing of the dynamic linker cache listing (`ldconfig -p`).
//!
//! The listing looks like:
//!
//! ```text
//! 1211 libs found in cache '/etc/ld.so.cache'
//!         libdcgm.so.4 (libc6,x86-64) => /lib/x86_64-linux-gnu/libdcgm.so.4
//!         libcuda.so (libc6,x86-64) => /lib/x86_64-linux-gnu/libcuda.so
//! Cache generated by: ldconfig (Ubuntu GLIBC 2.35-0ubuntu3.7) stable release version 2.35
//! ```
//!
//! Banner and footer wording differs between distributions, so any line that
//! does not match the entry grammar is skipped instead of failing the parse.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::trace;

use crate::domain::LibraryRecord;

/// The listing contained nothing we could use.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkerCacheParseError {
    #[error("unable to parse the dynamic linker cache: no library entries in {lines} lines of output")]
    NoEntries { lines: usize },
}

/// Parsed linker cache: library name to resolved path.
///
/// Records keep listing order. When a name is listed more than once,
/// [`LinkerCache::resolve`] returns the first entry, which is the one the
/// dynamic loader prefers.
#[derive(Debug, Clone, Default)]
pub struct LinkerCache {
    records: Vec<LibraryRecord>,
    by_name: HashMap<String, usize>,
}

impl LinkerCache {
    /// Parse the raw output of the cache listing command.
    pub fn parse(output: &str) -> Result<Self, LinkerCacheParseError> {
        let mut cache = Self::default();
        let mut lines = 0usize;

        for line in output.lines() {
            lines += 1;
            let line = line.trim();
            if line.is_empty() || is_summary_line(line) || is_generator_line(line) {
                continue;
            }
            match parse_entry(line) {
                Some(record) => cache.insert(record),
                None => trace!(line, "Skipping unrecognised linker cache line"),
            }
        }

        if cache.is_empty() {
            return Err(LinkerCacheParseError::NoEntries { lines });
        }
        Ok(cache)
    }

    /// Parse raw bytes, replacing invalid UTF-8.
    pub fn parse_bytes(output: &[u8]) -> Result<Self, LinkerCacheParseError> {
        Self::parse(&String::from_utf8_lossy(output))
    }

    /// Look up a library by its bare file name (first match wins).
    pub fn resolve(&self, name: &str) -> Option<&LibraryRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// All parsed entries in listing order, duplicates included.
    pub fn records(&self) -> &[LibraryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert(&mut self, record: LibraryRecord) {
        let idx = self.records.len();
        self.by_name.entry(record.name.clone()).or_insert(idx);
        self.records.push(record);
    }
}

/// `1211 libs found in cache '/etc/ld.so.cache'`
fn is_summary_line(line: &str) -> bool {
    let mut words = line.split_whitespace();
    words
        .next()
        .is_some_and(|count| count.chars().all(|c| c.is_ascii_digit()))
        && words.next().is_some_and(|w| w.starts_with("lib"))
        && line.contains("found in cache")
}

/// `Cache generated by: ldconfig (...) stable release version 2.35`
fn is_generator_line(line: &str) -> bool {
    line.starts_with("Cache generated by")
}

/// `<name> (<abi-tag>) => <absolute-path>`
fn parse_entry(line: &str) -> Option<LibraryRecord> {
    let (lhs, path) = line.split_once("=>")?;
    let path = path.trim();
    if !Path::new(path).is_absolute() {
        return None;
    }

    let open = lhs.find('(')?;
    let name = lhs[..open].trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }

    let rest = &lhs[open + 1..];
    let close = rest.rfind(')')?;
    if !rest[close + 1..].trim().is_empty() {
        return None;
    }
    let abi_tag = rest[..close].trim();

    Some(LibraryRecord::new(name, abi_tag, path))
}
