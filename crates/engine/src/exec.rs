//! Process executor
//!
//! [`Executer`] implementation that runs programs directly (no shell) through
//! `duct`, captures both output streams and enforces the context's
//! cancellation and deadline by polling the child.
//!
//! On Unix every command leads its own process group, so stopping it also
//! stops whatever it spawned (`sh -c "sleep 600"` leaves no `sleep` behind).

use devhook_core::{DoneReason, ExecContext, ExecOutput, Executer};
use std::path::Path;
use std::time::Duration;

/// Exit code reported when the program cannot be started
pub const EXIT_CODE_NOT_STARTED: i32 = 127;
/// Exit code reported when the context deadline expired
pub const EXIT_CODE_TIMED_OUT: i32 = 124;
/// Exit code reported when the context was cancelled
pub const EXIT_CODE_CANCELLED: i32 = 130;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

fn exit_code_for(reason: DoneReason) -> i32 {
    match reason {
        DoneReason::Cancelled => EXIT_CODE_CANCELLED,
        DoneReason::DeadlineExceeded => EXIT_CODE_TIMED_OUT,
    }
}

/// Runs commands as child processes of the agent
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    poll_interval: Duration,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    /// Create an executor with the default poll interval
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set how often a running child is checked against the context
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Executer for CommandExecutor {
    #[tracing::instrument(skip_all, fields(program = %program))]
    fn execute_with_context_from_dir(
        &self,
        ctx: &ExecContext,
        work_dir: Option<&Path>,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> ExecOutput {
        if program.is_empty() {
            return ExecOutput::failure("empty command", EXIT_CODE_NOT_STARTED);
        }
        if let Some(reason) = ctx.done() {
            return ExecOutput::failure(format!("{program}: {reason}"), exit_code_for(reason));
        }

        // Build command - inherits parent env, overlays the action's variables
        let mut expression = duct::cmd(program, args);
        if let Some(dir) = work_dir {
            expression = expression.dir(dir);
        }
        for (key, value) in env {
            expression = expression.env(key, value);
        }
        #[cfg(unix)]
        {
            expression = expression.before_spawn(|command| {
                use std::os::unix::process::CommandExt;
                command.process_group(0);
                Ok(())
            });
        }

        let handle = match expression
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .start()
        {
            Ok(handle) => handle,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to start command");
                return ExecOutput::failure(
                    format!("failed to start {program}: {e}"),
                    EXIT_CODE_NOT_STARTED,
                );
            }
        };

        loop {
            match handle.try_wait() {
                Ok(Some(output)) => {
                    return ExecOutput {
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                        exit_code: output.status.code().unwrap_or(-1),
                    };
                }
                Ok(None) => {}
                Err(e) => {
                    return ExecOutput::failure(format!("failed to wait for {program}: {e}"), -1);
                }
            }

            if let Some(reason) = ctx.done() {
                tracing::debug!(%reason, "Killing command");
                kill_process_groups(&handle);
                if let Err(e) = handle.kill() {
                    tracing::warn!(error = %e, "Failed to kill command");
                }
                return ExecOutput::failure(format!("{program}: {reason}"), exit_code_for(reason));
            }

            let wait = ctx
                .remaining()
                .map_or(self.poll_interval, |left| left.min(self.poll_interval));
            std::thread::sleep(wait);
        }
    }
}

/// Kill the process group led by each child of the expression
#[cfg(unix)]
fn kill_process_groups(handle: &duct::Handle) {
    use rustix::process::{Pid, Signal, kill_process_group};

    for pid in handle.pids() {
        let Some(pid) = i32::try_from(pid).ok().and_then(Pid::from_raw) else {
            continue;
        };
        if let Err(e) = kill_process_group(pid, Signal::KILL) {
            tracing::debug!(error = %e, "Failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_groups(_handle: &duct::Handle) {}
