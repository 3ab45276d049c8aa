//! End-to-end checks of the default rule set against a fake ldconfig.

#![cfg(target_os = "linux")]

use std::fs::{self, File};
use std::io::Read;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use preflight_core::{FailureKind, Machine, PreflightSettings, RequiredLibrary};
use preflight_runtime::default_runner;
use tempfile::TempDir;

/// Serializes script creation and execution. Forking while another test still
/// holds a script open for writing makes exec fail with ETXTBSY.
static EXEC_LOCK: Mutex<()> = Mutex::new(());

fn exec_lock() -> MutexGuard<'static, ()> {
    EXEC_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The first 64 bytes of the running test binary: an ELF header for this host.
fn host_elf_header() -> Vec<u8> {
    let mut head = vec![0u8; 64];
    File::open("/proc/self/exe")
        .unwrap()
        .read_exact(&mut head)
        .unwrap();
    head
}

/// A little-endian ELF64 header for `machine`.
fn foreign_elf_header(machine: Machine) -> Vec<u8> {
    let mut bytes = vec![0u8; 64];
    bytes[..4].copy_from_slice(b"\x7fELF");
    bytes[4] = 2; // ELFCLASS64
    bytes[5] = 1; // ELFDATA2LSB
    bytes[6] = 1;
    bytes[16..18].copy_from_slice(&3u16.to_le_bytes()); // ET_DYN
    bytes[18..20].copy_from_slice(&machine.raw().to_le_bytes());
    bytes[20..24].copy_from_slice(&1u32.to_le_bytes());
    bytes[52..54].copy_from_slice(&64u16.to_le_bytes());
    bytes
}

fn other_machine(host: Machine) -> Machine {
    if host == Machine::AARCH64 {
        Machine::X86_64
    } else {
        Machine::AARCH64
    }
}

fn host_machine() -> Machine {
    let head = host_elf_header();
    let raw = if head[5] == 2 {
        u16::from_be_bytes([head[18], head[19]])
    } else {
        u16::from_le_bytes([head[18], head[19]])
    };
    Machine::from_raw(raw)
}

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake ldconfig that lists `entries` when called with `-p`.
fn fake_ldconfig(dir: &Path, entries: &[(&str, &Path)]) -> PathBuf {
    let mut listing = format!("{} libs found in cache `/etc/ld.so.cache'\n", entries.len());
    for (name, path) in entries {
        listing.push_str(&format!("\t{name} (libc6,x86-64) => {}\n", path.display()));
    }
    let body = format!(
        "[ \"$1\" = \"-p\" ] || exit 64\ncat <<'LISTING'\n{listing}LISTING\n"
    );
    write_script(dir, "ldconfig", &body)
}

fn settings_for(ldconfig: PathBuf) -> PreflightSettings {
    PreflightSettings {
        ldconfig_path: Some(ldconfig),
        ..PreflightSettings::default()
    }
}

#[test]
fn test_matching_library_passes() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("libdcgm.so.4");
    fs::write(&library, host_elf_header()).unwrap();
    let ldconfig = fake_ldconfig(
        dir.path(),
        &[
            ("libc.so.6", Path::new("/lib/x86_64-linux-gnu/libc.so.6")),
            ("libdcgm.so.4", library.as_path()),
        ],
    );

    let runner = default_runner(&settings_for(ldconfig)).unwrap();
    runner.run().unwrap();
}

#[test]
fn test_missing_library_reports_install_hint() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let ldconfig = fake_ldconfig(
        dir.path(),
        &[("libc.so.6", Path::new("/lib/x86_64-linux-gnu/libc.so.6"))],
    );

    let err = default_runner(&settings_for(ldconfig))
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
    assert_eq!(
        err.to_string(),
        "the libdcgm.so.4 library was not found. Install Data Center GPU Manager (DCGM)."
    );
}

#[test]
fn test_foreign_library_is_an_architecture_mismatch() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let host = host_machine();
    let foreign = other_machine(host);
    let library = dir.path().join("libdcgm.so.4");
    fs::write(&library, foreign_elf_header(foreign)).unwrap();
    let ldconfig = fake_ldconfig(dir.path(), &[("libdcgm.so.4", library.as_path())]);

    let err = default_runner(&settings_for(ldconfig))
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::ArchitectureMismatch);
    assert_eq!(
        err.to_string(),
        format!(
            "the libdcgm.so.4 library architecture mismatch with the system; wanted: {host}, received: {foreign}"
        )
    );
}

#[test]
fn test_library_that_is_not_elf_cannot_be_opened() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("libdcgm.so.4");
    fs::write(&library, b"INPUT(-lfoo)\n").unwrap();
    let ldconfig = fake_ldconfig(dir.path(), &[("libdcgm.so.4", library.as_path())]);

    let err = default_runner(&settings_for(ldconfig))
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Open);
}

#[test]
fn test_failing_ldconfig_is_an_execution_error() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let ldconfig = write_script(dir.path(), "ldconfig", "echo 'cache unreadable' >&2\nexit 1\n");

    let err = default_runner(&settings_for(ldconfig))
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Execution);
    assert!(err.to_string().contains("cache unreadable"), "{err}");
}

#[test]
fn test_garbage_listing_is_a_parse_error() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let ldconfig = write_script(dir.path(), "ldconfig", "echo 'no cache here'\n");

    let err = default_runner(&settings_for(ldconfig))
        .unwrap()
        .run()
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Parse);
}

#[test]
fn test_hung_ldconfig_times_out() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let ldconfig = write_script(dir.path(), "ldconfig", "exec sleep 30\n");
    let settings = PreflightSettings {
        command_timeout_secs: Some(1),
        ..settings_for(ldconfig)
    };

    let err = default_runner(&settings).unwrap().run().unwrap_err();
    assert_eq!(err.kind(), FailureKind::Execution);
    assert!(err.to_string().contains("did not finish"), "{err}");
}

#[test]
fn test_every_configured_library_is_checked() {
    let _guard = exec_lock();
    let dir = TempDir::new().unwrap();
    let dcgm = dir.path().join("libdcgm.so.4");
    fs::write(&dcgm, host_elf_header()).unwrap();
    let ldconfig = fake_ldconfig(dir.path(), &[("libdcgm.so.4", dcgm.as_path())]);
    let settings = PreflightSettings {
        libraries: vec![
            RequiredLibrary::dcgm(),
            RequiredLibrary::named("libnvidia-ml.so.1"),
        ],
        ..settings_for(ldconfig)
    };

    let err = default_runner(&settings).unwrap().run().unwrap_err();
    assert_eq!(
        err.to_string(),
        "the libnvidia-ml.so.1 library was not found. Install the package that provides libnvidia-ml.so.1."
    );
}
