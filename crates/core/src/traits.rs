//! Core behavioral traits for devhook components
//!
//! The hook engine never spawns processes itself. It depends on the
//! [`Executer`] interface so that real process execution can be swapped for
//! a recording mock in tests.

use crate::ExecContext;
use std::path::Path;

/// Captured result of one external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Process exit code (0 on success)
    pub exit_code: i32,
}

impl ExecOutput {
    /// Build a failed output carrying only an error message and exit code
    pub fn failure(stderr: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Check whether the command exited successfully
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Command executor interface
///
/// Implementations must honor the context's cancellation and deadline, run
/// the program in `work_dir` when given, and apply `env` on top of the
/// inherited environment. Failures to run at all are reported through a
/// non-zero exit code and `stderr`, never by panicking.
///
/// # Examples
///
/// ```ignore
/// let out = exec.execute_with_context_from_dir(
///     &ctx,
///     None,
///     "systemctl",
///     &["daemon-reload".to_string()],
///     &[],
/// );
/// if !out.success() {
///     eprintln!("{} (exit code {})", out.stderr, out.exit_code);
/// }
/// ```
pub trait Executer: Send + Sync {
    /// Run `program` with `args` under `ctx`
    fn execute_with_context_from_dir(
        &self,
        ctx: &ExecContext,
        work_dir: Option<&Path>,
        program: &str,
        args: &[String],
        env: &[(String, String)],
    ) -> ExecOutput;
}
