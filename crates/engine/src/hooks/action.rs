//! Action execution
//!
//! Turns one hook action into one external command: resolves its timeout,
//! validates its environment, checks its working directory, renders the
//! command line and drives the executor under a context bounded by the
//! action timeout.

use super::command::{render, split_command_and_args};
use super::vars::ActionContext;
use crate::error::{Error, Result};
use devhook_config::{HookAction, HookActionRun};
use devhook_core::{ExecContext, Executer};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

/// Timeout for actions that do not declare one
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Fractional digits kept when parsing; 10^20 * 1h in nanoseconds still fits in u128
const MAX_FRACTION_DIGITS: usize = 20;

/// One `<number><unit>` component of a duration string
static DURATION_COMPONENT: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^([0-9]*(?:\.[0-9]*)?)(ns|us|µs|μs|ms|s|m|h)")
        .expect("Failed to compile duration pattern")
});

/// Parse a duration string such as `10s`, `1m30s`, `1.5h` or `250ms`
///
/// Components are summed. A bare `0` is accepted; negative durations and
/// numbers without a unit are rejected.
///
/// # Examples
///
/// ```
/// use devhook_engine::hooks::action::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert!(parse_duration("ten").is_err());
/// ```
pub fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = |reason: &str| Error::InvalidTimeout {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut rest = value.strip_prefix('+').unwrap_or(value);
    if rest.starts_with('-') {
        return Err(invalid("negative durations are not allowed"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total_nanos: u128 = 0;
    while !rest.is_empty() {
        let caps = DURATION_COMPONENT
            .captures(rest)
            .ok_or_else(|| invalid("expected a number followed by a unit (ns, us, ms, s, m, h)"))?;

        let number = &caps[1];
        if number.is_empty() || number == "." {
            return Err(invalid("missing number before unit"));
        }

        let unit_nanos: u128 = match &caps[2] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            _ => 3600 * 1_000_000_000,
        };

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("malformed number"))?
        };
        let mut nanos = whole
            .checked_mul(unit_nanos)
            .ok_or_else(|| invalid("duration out of range"))?;

        if !fraction.is_empty() {
            // Digits past this point are worth less than a nanosecond even in hours
            let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
            let scale = 10_u128.pow(u32::try_from(fraction.len()).unwrap_or(0));
            let fraction: u128 = fraction.parse().map_err(|_| invalid("malformed number"))?;
            nanos = nanos
                .checked_add(fraction * unit_nanos / scale)
                .ok_or_else(|| invalid("duration out of range"))?;
        }

        total_nanos = total_nanos
            .checked_add(nanos)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = &rest[caps[0].len()..];
    }

    let total_nanos = u64::try_from(total_nanos).map_err(|_| invalid("duration out of range"))?;
    Ok(Duration::from_nanos(total_nanos))
}

/// Resolve an action's timeout, falling back to `default`
pub fn resolve_timeout(timeout: Option<&str>, default: Duration) -> Result<Duration> {
    timeout.map_or(Ok(default), parse_duration)
}

/// Validate declared environment variables
///
/// Keys must be non-empty, free of whitespace and uppercase; values must be
/// non-empty. The first violation is reported with the offending entry.
pub fn validate_env_vars(env_vars: Option<&IndexMap<String, String>>) -> Result<()> {
    let Some(env_vars) = env_vars else {
        return Ok(());
    };

    for (key, value) in env_vars {
        let reason = if key.is_empty() {
            Some("key cannot be empty")
        } else if key.chars().any(char::is_whitespace) {
            Some("key cannot contain spaces")
        } else if value.is_empty() {
            Some("value cannot be empty")
        } else if *key != key.to_uppercase() {
            Some("key must be uppercase")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(Error::InvalidEnvVar {
                reason,
                entry: format!("{key}={value}"),
            });
        }
    }

    Ok(())
}

/// Check that a declared working directory exists
///
/// The directory is expected to be created by the configuration itself, so
/// a missing one is an error rather than something to create here.
fn resolve_work_dir(work_dir: Option<&str>) -> Result<Option<PathBuf>> {
    let Some(work_dir) = work_dir else {
        return Ok(None);
    };

    let path = PathBuf::from(work_dir);
    match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => Ok(Some(path)),
        Ok(_) => Err(Error::WorkDirNotFound { path }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::WorkDirNotFound { path }),
        Err(e) => Err(Error::WorkDirCheck {
            path,
            source: Arc::new(e),
        }),
    }
}

/// Runs hook actions through an [`Executer`]
#[derive(Clone)]
pub struct ActionExecutor {
    executor: Arc<dyn Executer>,
    default_timeout: Duration,
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl ActionExecutor {
    /// Create an action executor
    pub fn new(executor: Arc<dyn Executer>, default_timeout: Duration) -> Self {
        Self {
            executor,
            default_timeout,
        }
    }

    /// Timeout used for actions that declare none
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute one action whose condition has already been satisfied
    pub fn execute(
        &self,
        ctx: &ExecContext,
        action: &HookAction,
        actx: &ActionContext<'_>,
    ) -> Result<()> {
        match action {
            HookAction::Run(run) => self.execute_run(ctx, run, actx),
        }
    }

    #[tracing::instrument(skip_all, fields(checkpoint = %actx.checkpoint, run = %run.run))]
    fn execute_run(
        &self,
        ctx: &ExecContext,
        run: &HookActionRun,
        actx: &ActionContext<'_>,
    ) -> Result<()> {
        let timeout = resolve_timeout(run.timeout.as_deref(), self.default_timeout)?;
        validate_env_vars(run.env_vars.as_ref())?;
        let work_dir = resolve_work_dir(run.work_dir.as_deref())?;

        let command_line = render(&run.run, &actx.vars);
        let (program, args) = split_command_and_args(&command_line);

        let env: Vec<(String, String)> = run
            .env_vars
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        tracing::debug!(
            program = %program,
            args = ?args,
            timeout_ms = timeout.as_millis(),
            "Executing hook action"
        );

        let bounded = ctx.with_timeout(timeout);
        let output = self.executor.execute_with_context_from_dir(
            &bounded,
            work_dir.as_deref(),
            &program,
            &args,
            &env,
        );

        if !output.success() {
            tracing::error!(
                "running {:?} returned with exit code {}: {}",
                command_line,
                output.exit_code,
                output.stderr
            );
            return Err(Error::CommandFailed {
                command: command_line.into_owned(),
                stderr: output.stderr,
                exit_code: output.exit_code,
            });
        }

        Ok(())
    }
}
