//! Check command implementation
//!
//! Statically validates every hook action of a specification: the timeout
//! must be a valid duration and environment variables must follow the
//! naming rules. Nothing is executed.

use clap::Args;
use devhook_config::{Checkpoint, Config, DeviceHooksSpec, HookAction, load_spec};
use devhook_engine::hooks::action::{DEFAULT_ACTION_TIMEOUT, resolve_timeout, validate_env_vars};
use devhook_engine::hooks::default_actions;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::error::{CommandError, Result};

/// Validate the hooks of a specification
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Rendered device specification to validate
    #[arg(long, value_name = "FILE")]
    pub spec: PathBuf,
}

impl Command for CheckCommand {
    type Output = ();

    fn execute(&self, _config: &Config) -> Result<()> {
        let spec = load_spec(&self.spec)?;
        let hooks = spec.hooks.unwrap_or_default();

        let problems = validate_hooks(&hooks);
        for checkpoint in Checkpoint::ALL {
            let declared = hooks.actions(checkpoint).len();
            let failed: Vec<_> = problems
                .iter()
                .filter(|e| {
                    matches!(e, devhook_engine::Error::Action { checkpoint: cp, .. } if *cp == checkpoint)
                })
                .collect();

            if failed.is_empty() {
                println!(
                    "{} {} ({} action(s))",
                    "✓".green(),
                    checkpoint.bold(),
                    declared
                );
            } else {
                println!(
                    "{} {} ({} action(s))",
                    "✗".red(),
                    checkpoint.bold(),
                    declared
                );
                for error in failed {
                    println!("    {}", error.to_string().red());
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CommandError::InvalidHooks {
                count: problems.len(),
            })
        }
    }
}

/// Validate every declared action, returning one error per invalid action
///
/// Action numbers count the built-in actions first, matching the numbers
/// reported when the checkpoint actually runs.
pub fn validate_hooks(hooks: &DeviceHooksSpec) -> Vec<devhook_engine::Error> {
    let mut problems = Vec::new();

    for checkpoint in Checkpoint::ALL {
        let offset = default_actions(checkpoint).len();
        for (i, action) in hooks.actions(checkpoint).iter().enumerate() {
            if let Err(e) = validate_action(action) {
                problems.push(e.in_action(checkpoint, offset + i + 1));
            }
        }
    }

    problems
}

fn validate_action(action: &HookAction) -> devhook_engine::Result<()> {
    match action {
        HookAction::Run(run) => {
            resolve_timeout(run.timeout.as_deref(), DEFAULT_ACTION_TIMEOUT)?;
            validate_env_vars(run.env_vars.as_ref())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn hooks(json: &str) -> DeviceHooksSpec {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spec.json");
        std::fs::write(&path, json).unwrap();
        load_spec(&path).unwrap().hooks.unwrap_or_default()
    }

    #[test]
    fn test_valid_hooks() {
        let hooks = hooks(
            r#"{
                "hooks": {
                    "beforeUpdating": [
                        { "run": "backup", "timeout": "1m30s", "envVars": { "TARGET": "/var" } }
                    ],
                    "afterUpdating": [ { "run": "true" } ]
                }
            }"#,
        );
        assert!(validate_hooks(&hooks).is_empty());
    }

    #[test]
    fn test_problems_are_numbered_like_runtime() {
        let hooks = hooks(
            r#"{
                "hooks": {
                    "beforeUpdating": [
                        { "run": "true" },
                        { "run": "true", "timeout": "soon" }
                    ],
                    "afterUpdating": [ { "run": "true", "envVars": { "lower": "x" } } ]
                }
            }"#,
        );

        let problems = validate_hooks(&hooks);
        assert_eq!(problems.len(), 2);
        assert!(
            problems[0]
                .to_string()
                .starts_with("failed to execute beforeUpdating hook action #2: invalid timeout")
        );
        assert!(problems[1].to_string().starts_with(
            "failed to execute afterUpdating hook action #4: invalid envVar format: key must be uppercase"
        ));
    }

    #[test]
    fn test_execute_reports_invalid_hooks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spec.toml");
        std::fs::write(
            &path,
            r#"
[[hooks.beforeRebooting]]
run = "sync"
timeout = "-1s"
"#,
        )
        .unwrap();

        let err = CheckCommand { spec: path }
            .execute(&Config::default())
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidHooks { count: 1 }));
    }
}
