//! Run command implementation
//!
//! Drives one apply cycle against the real process executor: sync the
//! desired specification, record the file mutations given on the command
//! line, then run a single checkpoint.

use clap::Args;
use devhook_config::{Checkpoint, Config, load_spec};
use devhook_core::ExecContext;
use devhook_engine::hooks::parse_duration;
use devhook_engine::{CommandExecutor, FileSnapshot, HookManager};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::command::Command;
use crate::error::{CommandError, Result};

/// Run the hooks of one checkpoint
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Checkpoint to run (e.g. afterUpdating or after-updating)
    #[arg(value_name = "CHECKPOINT")]
    pub checkpoint: Checkpoint,

    /// Desired (new) rendered device specification
    #[arg(long, value_name = "FILE")]
    pub spec: PathBuf,

    /// Current (old) rendered device specification
    #[arg(long, value_name = "FILE")]
    pub current: Option<PathBuf>,

    /// Path created during the update (repeatable)
    #[arg(long, value_name = "PATH")]
    pub created: Vec<String>,

    /// Path updated during the update (repeatable)
    #[arg(long, value_name = "PATH")]
    pub updated: Vec<String>,

    /// Path removed during the update (repeatable)
    #[arg(long, value_name = "PATH")]
    pub removed: Vec<String>,
}

impl Command for RunCommand {
    type Output = ();

    fn execute(&self, config: &Config) -> Result<()> {
        let desired = load_spec(&self.spec)?;
        let current = self.current.as_deref().map(load_spec).transpose()?;

        let default_timeout =
            parse_duration(&config.hooks.default_timeout).map_err(CommandError::config)?;
        let mut manager = HookManager::builder(Arc::new(CommandExecutor::new()))
            .default_timeout(default_timeout)
            .build();

        // A fresh manager holds no configured hooks, so it first adopts the
        // current ones; the second sync then only sees the actual transition
        manager.sync(None, current.as_ref());
        manager.sync(current.as_ref(), Some(&desired));
        for path in &self.created {
            manager.on_path_created(path.as_str());
        }
        for path in &self.updated {
            manager.on_path_updated(path.as_str());
        }
        for path in &self.removed {
            manager.on_path_removed(path.as_str(), snapshot(Path::new(path)));
        }

        let total = manager.actions(self.checkpoint).count();
        println!(
            "Running {} hooks ({} action(s) declared)",
            self.checkpoint.cyan(),
            total
        );

        manager.run_checkpoint(self.checkpoint, &ExecContext::background())?;

        println!(
            "{} {}",
            "✓".green(),
            format!("{} hooks completed", self.checkpoint).green().bold()
        );
        Ok(())
    }
}

/// Describe a removed file from whatever is still readable on disk
fn snapshot(path: &Path) -> FileSnapshot {
    let mut snapshot = FileSnapshot {
        path: path.display().to_string(),
        contents: std::fs::read(path).ok(),
        ..FileSnapshot::default()
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = std::fs::metadata(path) {
            snapshot.mode = Some(metadata.permissions().mode() & 0o7777);
        }
    }

    snapshot
}
