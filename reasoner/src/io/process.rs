//! Child-process execution with a timeout and bounded output capture.

use std::io::{ErrorKind, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// Limits applied to a single child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessLimits {
    /// Kill the child after this long.
    pub timeout: Duration,
    /// Keep at most this many bytes of each of stdout and stderr.
    pub output_limit_bytes: usize,
}

/// Captured output of a finished (or killed) child process.
#[derive(Debug)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Bytes discarded from stdout and stderr beyond the limit.
    pub truncated_bytes: usize,
    pub timed_out: bool,
}

impl ProcessOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Run `cmd`, feed it `input` on stdin, and wait for it within `limits`.
///
/// stdin is written and stdout/stderr are drained on their own threads while
/// the child runs, so neither a large prompt nor a chatty child can block past
/// the timeout. Bytes beyond the limit are counted and dropped. The child is
/// killed on every error path after it was spawned.
#[instrument(skip_all, fields(timeout_secs = limits.timeout.as_secs(), output_limit_bytes = limits.output_limit_bytes, input_bytes = input.len()))]
pub fn run_with_input(mut cmd: Command, input: &[u8], limits: ProcessLimits) -> Result<ProcessOutput> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("spawning child process");
    let mut child = cmd.spawn().context("spawn command")?;

    let (stdin, stdout, stderr) = match take_pipes(&mut child) {
        Ok(pipes) => pipes,
        Err(err) => {
            kill_quietly(&mut child);
            return Err(err);
        }
    };
    let input = input.to_vec();
    let stdin_handle = thread::spawn(move || write_input(stdin, &input));
    let limit = limits.output_limit_bytes;
    let stdout_handle = thread::spawn(move || read_limited(stdout, limit));
    let stderr_handle = thread::spawn(move || read_limited(stderr, limit));

    let (status, timed_out) = match child.wait_timeout(limits.timeout) {
        Ok(Some(status)) => (status, false),
        Ok(None) => {
            warn!(timeout_secs = limits.timeout.as_secs(), "command timed out, killing");
            child.kill().context("kill command")?;
            (child.wait().context("wait command after kill")?, true)
        }
        Err(err) => {
            kill_quietly(&mut child);
            return Err(err).context("wait for command");
        }
    };

    stdin_handle
        .join()
        .map_err(|_| anyhow!("stdin writer thread panicked"))?
        .context("write stdin")?;
    let (stdout, stdout_dropped) = join_reader(stdout_handle).context("join stdout")?;
    let (stderr, stderr_dropped) = join_reader(stderr_handle).context("join stderr")?;
    let truncated_bytes = stdout_dropped + stderr_dropped;
    if truncated_bytes > 0 {
        warn!(truncated_bytes, "command output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "command finished");
    Ok(ProcessOutput {
        status,
        stdout,
        stderr,
        truncated_bytes,
        timed_out,
    })
}

fn take_pipes(child: &mut Child) -> Result<(ChildStdin, ChildStdout, ChildStderr)> {
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    Ok((stdin, stdout, stderr))
}

fn kill_quietly(child: &mut Child) {
    if let Err(err) = child.kill() {
        debug!(err = %err, "kill after error failed");
    }
    let _ = child.wait();
}

/// Write the whole input, then close the pipe by dropping it.
///
/// A child that exits (or is killed) without reading its input is judged by
/// its exit status, so a broken pipe is not an error.
fn write_input(mut stdin: ChildStdin, input: &[u8]) -> Result<()> {
    match stdin.write_all(input) {
        Err(err) if err.kind() != ErrorKind::BrokenPipe => Err(err.into()),
        _ => Ok(()),
    }
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
}

fn read_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let keep = n.min(limit.saturating_sub(kept.len()));
        kept.extend_from_slice(&chunk[..keep]);
        dropped += n - keep;
    }

    Ok((kept, dropped))
}
