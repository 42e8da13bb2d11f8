//! Defaults command implementation
//!
//! Lists the built-in hook actions that run before any configured action.

use clap::Args;
use devhook_config::{Checkpoint, Config, HookAction, HookCondition};
use devhook_engine::hooks::default_actions;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::error::Result;

/// List built-in hook actions
#[derive(Debug, Args)]
pub struct DefaultsCommand {}

impl Command for DefaultsCommand {
    type Output = ();

    fn execute(&self, _config: &Config) -> Result<()> {
        for checkpoint in Checkpoint::ALL {
            let actions = default_actions(checkpoint);
            println!("{}", checkpoint.bold());
            if actions.is_empty() {
                println!("  {}", "(none)".dimmed());
            }
            for (i, action) in actions.iter().enumerate() {
                println!("  #{} {}", i + 1, describe(action));
            }
        }
        Ok(())
    }
}

/// One-line description of an action: command and condition
pub fn describe(action: &HookAction) -> String {
    let HookAction::Run(run) = action;
    match action.condition() {
        None => run.run.clone(),
        Some(HookCondition::FileOp(cond)) => {
            let ops: Vec<String> = cond.op.iter().map(|op| format!("{op:?}")).collect();
            format!("{} (if {} [{}])", run.run, cond.path, ops.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devhook_config::HookActionRun;

    #[test]
    fn test_describe_default_action() {
        let action = &default_actions(Checkpoint::AfterUpdating)[0];
        assert_eq!(
            describe(action),
            "systemctl daemon-reload (if /etc/systemd/system/ [Create, Update, Remove])"
        );
    }

    #[test]
    fn test_describe_unconditional_action() {
        let action = HookAction::Run(HookActionRun {
            run: "sync".to_string(),
            ..HookActionRun::default()
        });
        assert_eq!(describe(&action), "sync");
    }

    #[test]
    fn test_execute() {
        assert!(DefaultsCommand {}.execute(&Config::default()).is_ok());
    }
}
