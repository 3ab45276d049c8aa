//! `ProcessRunner` implementation using `std::process`.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use preflight_core::{ExecutionError, ProcessRunner};
use tracing::{debug, warn};

/// How often a deadline-bound child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs commands on the host and captures their stdout.
///
/// Without a timeout the call blocks until the child exits and its pipes
/// close. With a timeout the child is killed and reaped once the deadline
/// passes, and output still held open by a background job past the deadline
/// is abandoned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner {
    timeout: Option<Duration>,
}

impl SystemProcessRunner {
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Bound every command by `timeout` (`None` disables the bound).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn output(&self, program: &Path, args: &[String]) -> Result<Vec<u8>, ExecutionError> {
        debug!(program = %program.display(), ?args, timeout = ?self.timeout, "Running command");
        let started = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let (status, stdout, stderr) = match self.timeout {
            None => {
                let output = command.output().map_err(|e| spawn_error(program, &e))?;
                (output.status, output.stdout, output.stderr)
            }
            Some(timeout) => run_with_deadline(&mut command, program, timeout)?,
        };

        debug!(
            program = %program.display(),
            %status,
            elapsed_ms = started.elapsed().as_millis(),
            stdout_bytes = stdout.len(),
            "Command finished"
        );

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            return Err(ExecutionError::ExitStatus {
                program: program.to_path_buf(),
                status: status.to_string(),
                stderr: if stderr.is_empty() {
                    "no error output".to_string()
                } else {
                    stderr
                },
            });
        }

        Ok(stdout)
    }
}

fn run_with_deadline(
    command: &mut Command,
    program: &Path,
    timeout: Duration,
) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), ExecutionError> {
    let deadline = Instant::now() + timeout;
    let mut child = command.spawn().map_err(|e| spawn_error(program, &e))?;

    // Drain both pipes concurrently so a chatty child can't block on a full pipe.
    let (tx, rx) = mpsc::channel();
    let mut readers = 0usize;
    if let Some(pipe) = child.stdout.take() {
        drain(pipe, Stream::Stdout, tx.clone());
        readers += 1;
    }
    if let Some(pipe) = child.stderr.take() {
        drain(pipe, Stream::Stderr, tx.clone());
        readers += 1;
    }
    drop(tx);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                warn!(program = %program.display(), ?timeout, "Command timed out, killing it");
                reap(&mut child);
                return Err(timed_out(program, timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                reap(&mut child);
                return Err(io_error(program, &e));
            }
        }
    };

    // A background grandchild can hold the pipes open after the child exits,
    // so collecting output is bounded by the same deadline.
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    for _ in 0..readers {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((stream, result)) => {
                let bytes = result.map_err(|e| io_error(program, &e))?;
                match stream {
                    Stream::Stdout => stdout = bytes,
                    Stream::Stderr => stderr = bytes,
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    program = %program.display(),
                    ?timeout,
                    "Command exited but its output pipes are still open"
                );
                return Err(timed_out(program, timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(ExecutionError::Io {
                    program: program.to_path_buf(),
                    reason: "output reader thread panicked".to_string(),
                });
            }
        }
    }
    Ok((status, stdout, stderr))
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, io::Result<Vec<u8>>);

fn drain<R: Read + Send + 'static>(mut pipe: R, stream: Stream, tx: Sender<Chunk>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        // The receiver is gone once the caller has given up on the deadline.
        if tx.send((stream, result)).is_err() {
            debug!(?stream, "Dropping output collected after the deadline");
        }
    });
}

fn timed_out(program: &Path, timeout: Duration) -> ExecutionError {
    ExecutionError::TimedOut {
        program: program.to_path_buf(),
        timeout,
    }
}

/// Kill and wait, so no zombie is left behind.
fn reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "Kill failed (process may have already exited)");
    }
    if let Err(e) = child.wait() {
        debug!(error = %e, "Wait after kill failed");
    }
}

fn spawn_error(program: &Path, err: &io::Error) -> ExecutionError {
    if err.kind() == io::ErrorKind::NotFound {
        ExecutionError::NotFound {
            program: program.to_path_buf(),
        }
    } else {
        io_error(program, err)
    }
}

fn io_error(program: &Path, err: &io::Error) -> ExecutionError {
    ExecutionError::Io {
        program: program.to_path_buf(),
        reason: err.to_string(),
    }
}
