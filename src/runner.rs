//! Child process execution with concurrent stream draining.
//!
//! The engine is run exactly once per operation. Its stdout and stderr are
//! drained concurrently with the wait for exit; draining them sequentially
//! risks a deadlock once the child fills the unread pipe's buffer while
//! blocked writing to it. Output is forwarded to structured logging for
//! diagnostics and never parsed for semantics; stderr is additionally
//! buffered so a failure can carry the engine's own evidence.

use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tracing::{debug, warn};

use crate::error::{Result, SqueezeError};
use crate::invocation::EngineInvocation;

/// Exit status and captured diagnostics of one engine run.
#[derive(Debug)]
pub struct EngineExit {
    /// Exit code; -1 if the child was terminated by a signal.
    pub code: i32,
    /// Everything the engine wrote to its standard error.
    pub stderr: String,
}

impl EngineExit {
    /// Exit code 0 is the sole success signal.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run the engine to completion and return its exit.
///
/// With `timeout` set, a child that outlives the limit is killed and the run
/// fails with [`SqueezeError::EngineTimeout`]; without it the wait is
/// unbounded, matching the engine's non-interactive batch mode.
///
/// # Errors
///
/// [`SqueezeError::ProcessStart`] if the child cannot be spawned,
/// [`SqueezeError::EngineTimeout`] on expiry, or an I/O error from the
/// stream drains. A non-zero exit is *not* an error here; the caller
/// interprets [`EngineExit`].
pub async fn run(invocation: &EngineInvocation, timeout: Option<Duration>) -> Result<EngineExit> {
    debug!(
        program = %invocation.program.display(),
        args = ?invocation.args,
        "starting engine"
    );

    let mut child = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(&invocation.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| SqueezeError::ProcessStart {
            program: invocation.program.clone(),
            source,
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("engine stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("engine stderr was not captured"))?;

    match timeout {
        None => wait_and_drain(&mut child, stdout, stderr).await,
        Some(limit) => {
            let waited =
                tokio::time::timeout(limit, wait_and_drain(&mut child, stdout, stderr)).await;
            match waited {
                Ok(exit) => exit,
                Err(_elapsed) => {
                    if let Err(err) = child.kill().await {
                        warn!(%err, "failed to kill timed-out engine");
                    }
                    Err(SqueezeError::EngineTimeout { limit })
                }
            }
        }
    }
}

/// Wait for exit while both streams drain in parallel.
async fn wait_and_drain(
    child: &mut Child,
    stdout: ChildStdout,
    stderr: ChildStderr,
) -> Result<EngineExit> {
    let (status, (), stderr_buf) = tokio::try_join!(
        async { child.wait().await.map_err(SqueezeError::from) },
        drain_stdout(stdout),
        drain_stderr(stderr),
    )?;

    let code = status.code().unwrap_or(-1);
    debug!(code, "engine exited");

    Ok(EngineExit {
        code,
        stderr: stderr_buf,
    })
}

async fn drain_stdout(stream: ChildStdout) -> Result<()> {
    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        debug!(target: "pdfsqueeze::engine", "{line}");
    }
    Ok(())
}

async fn drain_stderr(stream: ChildStderr) -> Result<String> {
    let mut captured = String::new();
    let mut lines = BufReader::new(stream).lines();
    while let Some(line) = lines.next_line().await? {
        warn!(target: "pdfsqueeze::engine", "{line}");
        captured.push_str(&line);
        captured.push('\n');
    }
    Ok(captured)
}
