//! Hook manager
//!
//! Orchestrates one apply cycle: collects mutation notifications into the
//! ledger, then runs the merged (built-in + configured) action list of a
//! checkpoint and latches the outcome per checkpoint.
//!
//! ## Concurrency
//!
//! `sync` and the `on_path_*` notifications take `&mut self`, so the borrow
//! checker serializes them against checkpoint runs. Checkpoints take `&self`:
//! different checkpoints may run concurrently since they only read the ledger
//! and each writes its own entry of the mutex-guarded error map. The lock is
//! never held while a command runs.

use super::action::{ActionExecutor, DEFAULT_ACTION_TIMEOUT};
use super::condition;
use super::defaults::default_actions;
use super::ledger::{FileSnapshot, MutationLedger};
use super::vars::ActionContext;
use crate::error::{Error, Result};
use devhook_config::{Checkpoint, DeviceHooksSpec, HookAction, RenderedDeviceSpec};
use devhook_core::{ExecContext, Executer};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Lifecycle hook manager, the single entry point of the hook engine
#[derive(Debug)]
pub struct HookManager {
    executor: ActionExecutor,
    ledger: MutationLedger,
    hooks: DeviceHooksSpec,
    errors: Mutex<BTreeMap<Checkpoint, Error>>,
}

impl HookManager {
    /// Create a hook manager with default settings
    ///
    /// For custom configuration, use [`HookManager::builder`].
    pub fn new(executor: Arc<dyn Executer>) -> Self {
        Self::builder(executor).build()
    }

    /// Create a builder for configuring a `HookManager`
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let manager = HookManager::builder(Arc::new(CommandExecutor::new()))
    ///     .default_timeout(Duration::from_secs(30))
    ///     .build();
    /// ```
    pub fn builder(executor: Arc<dyn Executer>) -> HookManagerBuilder {
        HookManagerBuilder::new(executor)
    }

    /// Refresh the configured hooks and start a new mutation cycle
    ///
    /// The configured action lists are replaced only when the hooks of
    /// `desired` differ from those of `current`; checkpoints missing from
    /// `desired` end up with no configured actions. The ledger is always
    /// cleared.
    pub fn sync(
        &mut self,
        current: Option<&RenderedDeviceSpec>,
        desired: Option<&RenderedDeviceSpec>,
    ) {
        tracing::debug!("Syncing hook manager");

        let current_hooks = current.and_then(|spec| spec.hooks.as_ref());
        let desired_hooks = desired.and_then(|spec| spec.hooks.as_ref());
        if current_hooks != desired_hooks {
            self.hooks = desired_hooks.cloned().unwrap_or_default();
            tracing::debug!(
                before_updating = self.hooks.actions(Checkpoint::BeforeUpdating).len(),
                after_updating = self.hooks.actions(Checkpoint::AfterUpdating).len(),
                before_rebooting = self.hooks.actions(Checkpoint::BeforeRebooting).len(),
                after_rebooting = self.hooks.actions(Checkpoint::AfterRebooting).len(),
                "Replaced configured hooks"
            );
        }

        self.ledger.clear();
        tracing::debug!("Finished syncing hook manager");
    }

    /// Record that the file writer created `path`
    pub fn on_path_created(&mut self, path: impl Into<String>) {
        let path = path.into();
        tracing::trace!(path = %path, "Path created");
        self.ledger.record_created(path);
    }

    /// Record that the file writer updated `path`
    pub fn on_path_updated(&mut self, path: impl Into<String>) {
        let path = path.into();
        tracing::trace!(path = %path, "Path updated");
        self.ledger.record_updated(path);
    }

    /// Record that the file writer removed `path`, keeping its prior snapshot
    pub fn on_path_removed(&mut self, path: impl Into<String>, snapshot: FileSnapshot) {
        let path = path.into();
        tracing::trace!(path = %path, "Path removed");
        self.ledger.record_removed(path, snapshot);
    }

    /// Run the `beforeUpdating` checkpoint
    pub fn on_before_updating(&self, ctx: &ExecContext) -> Result<()> {
        self.run_checkpoint(Checkpoint::BeforeUpdating, ctx)
    }

    /// Run the `afterUpdating` checkpoint
    pub fn on_after_updating(&self, ctx: &ExecContext) -> Result<()> {
        self.run_checkpoint(Checkpoint::AfterUpdating, ctx)
    }

    /// Run the `beforeRebooting` checkpoint
    pub fn on_before_rebooting(&self, ctx: &ExecContext) -> Result<()> {
        self.run_checkpoint(Checkpoint::BeforeRebooting, ctx)
    }

    /// Run the `afterRebooting` checkpoint
    pub fn on_after_rebooting(&self, ctx: &ExecContext) -> Result<()> {
        self.run_checkpoint(Checkpoint::AfterRebooting, ctx)
    }

    /// Run every action of `checkpoint` whose condition holds, in order
    ///
    /// Stops at the first failing action. The outcome replaces the
    /// checkpoint's latched error: a failure is recorded, a success clears it.
    #[tracing::instrument(skip_all, fields(checkpoint = %checkpoint))]
    pub fn run_checkpoint(&self, checkpoint: Checkpoint, ctx: &ExecContext) -> Result<()> {
        tracing::debug!("Starting hook checkpoint");

        let result = self.execute_actions(checkpoint, ctx);
        self.set_error(checkpoint, result.as_ref().err());

        match &result {
            Ok(()) => tracing::debug!("Finished hook checkpoint"),
            Err(e) => tracing::warn!(error = %e, "Hook checkpoint failed"),
        }
        result
    }

    fn execute_actions(&self, checkpoint: Checkpoint, ctx: &ExecContext) -> Result<()> {
        let mut actx = ActionContext::new(checkpoint, &self.ledger);

        for (i, action) in self.actions(checkpoint).enumerate() {
            let index = i + 1;

            // Variables never leak from one action into the next
            actx.vars.reset();
            if !condition::evaluate(action.condition(), &mut actx) {
                tracing::debug!("skipping {checkpoint} hook action #{index}: condition not met");
                continue;
            }

            self.executor
                .execute(ctx, action, &actx)
                .map_err(|e| e.in_action(checkpoint, index))?;
        }

        Ok(())
    }

    fn set_error(&self, checkpoint: Checkpoint, error: Option<&Error>) {
        let mut errors = self.errors.lock().unwrap_or_else(PoisonError::into_inner);
        match error {
            Some(e) => {
                errors.insert(checkpoint, e.clone());
            }
            None => {
                errors.remove(&checkpoint);
            }
        }
    }

    /// Snapshot of the currently latched error of every checkpoint
    ///
    /// Checkpoints whose last run succeeded (or that never ran) are absent.
    pub fn errors(&self) -> BTreeMap<Checkpoint, Error> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Active actions of a checkpoint: built-in defaults first, then configured ones
    pub fn actions(&self, checkpoint: Checkpoint) -> impl Iterator<Item = &HookAction> {
        default_actions(checkpoint)
            .iter()
            .chain(self.hooks.actions(checkpoint))
    }

    /// Mutations recorded since the last sync
    pub fn ledger(&self) -> &MutationLedger {
        &self.ledger
    }

    /// Timeout applied to actions that declare none
    pub fn default_timeout(&self) -> Duration {
        self.executor.default_timeout()
    }
}

/// Builder for creating a `HookManager` with custom configuration
pub struct HookManagerBuilder {
    executor: Arc<dyn Executer>,
    default_timeout: Duration,
}

impl HookManagerBuilder {
    /// Create a new builder around the command executor
    ///
    /// This is typically called via [`HookManager::builder`].
    pub fn new(executor: Arc<dyn Executer>) -> Self {
        Self {
            executor,
            default_timeout: DEFAULT_ACTION_TIMEOUT,
        }
    }

    /// Set the timeout for actions that declare none (default: 10s)
    #[must_use]
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Build the `HookManager`
    pub fn build(self) -> HookManager {
        HookManager {
            executor: ActionExecutor::new(self.executor, self.default_timeout),
            ledger: MutationLedger::new(),
            hooks: DeviceHooksSpec::default(),
            errors: Mutex::new(BTreeMap::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use devhook_config::HookActionRun;
    use devhook_core::ExecOutput;
    use std::path::Path;

    /// Executor that never runs anything and always succeeds
    struct NullExecutor;

    impl Executer for NullExecutor {
        fn execute_with_context_from_dir(
            &self,
            _ctx: &ExecContext,
            _work_dir: Option<&Path>,
            _program: &str,
            _args: &[String],
            _env: &[(String, String)],
        ) -> ExecOutput {
            ExecOutput::default()
        }
    }

    fn spec_with(checkpoint: Checkpoint, runs: &[&str]) -> RenderedDeviceSpec {
        let actions: Vec<HookAction> = runs
            .iter()
            .map(|run| {
                HookAction::Run(HookActionRun {
                    run: (*run).to_string(),
                    ..HookActionRun::default()
                })
            })
            .collect();

        let mut hooks = DeviceHooksSpec::default();
        match checkpoint {
            Checkpoint::BeforeUpdating => hooks.before_updating = Some(actions),
            Checkpoint::AfterUpdating => hooks.after_updating = Some(actions),
            Checkpoint::BeforeRebooting => hooks.before_rebooting = Some(actions),
            Checkpoint::AfterRebooting => hooks.after_rebooting = Some(actions),
        }

        RenderedDeviceSpec {
            hooks: Some(hooks),
            ..RenderedDeviceSpec::default()
        }
    }

    #[test]
    fn test_new_manager_has_only_defaults() {
        let manager = HookManager::new(Arc::new(NullExecutor));
        assert_eq!(manager.actions(Checkpoint::AfterUpdating).count(), 3);
        assert_eq!(manager.actions(Checkpoint::BeforeUpdating).count(), 0);
        assert_eq!(manager.default_timeout(), Duration::from_secs(10));
        assert!(manager.errors().is_empty());
    }

    #[test]
    fn test_sync_appends_configured_after_defaults() {
        let mut manager = HookManager::new(Arc::new(NullExecutor));
        let desired = spec_with(Checkpoint::AfterUpdating, &["echo custom"]);
        manager.sync(None, Some(&desired));

        let runs: Vec<&str> = manager
            .actions(Checkpoint::AfterUpdating)
            .map(|HookAction::Run(run)| run.run.as_str())
            .collect();
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[3], "echo custom");
    }

    #[test]
    fn test_sync_keeps_hooks_when_unchanged() {
        let mut manager = HookManager::new(Arc::new(NullExecutor));
        let spec = spec_with(Checkpoint::BeforeRebooting, &["sync"]);
        manager.sync(None, Some(&spec));
        assert_eq!(manager.actions(Checkpoint::BeforeRebooting).count(), 1);

        // Same hooks on both sides: configured actions stay as they are
        manager.sync(Some(&spec), Some(&spec));
        assert_eq!(manager.actions(Checkpoint::BeforeRebooting).count(), 1);
    }

    #[test]
    fn test_sync_missing_checkpoints_become_empty() {
        let mut manager = HookManager::new(Arc::new(NullExecutor));
        let first = spec_with(Checkpoint::BeforeRebooting, &["sync"]);
        manager.sync(None, Some(&first));

        let second = spec_with(Checkpoint::AfterRebooting, &["true"]);
        manager.sync(Some(&first), Some(&second));
        assert_eq!(manager.actions(Checkpoint::BeforeRebooting).count(), 0);
        assert_eq!(manager.actions(Checkpoint::AfterRebooting).count(), 1);

        manager.sync(Some(&second), None);
        assert_eq!(manager.actions(Checkpoint::AfterRebooting).count(), 0);
    }

    #[test]
    fn test_sync_always_clears_ledger() {
        let mut manager = HookManager::new(Arc::new(NullExecutor));
        manager.on_path_created("/etc/a");
        manager.on_path_updated("/etc/b");
        manager.on_path_removed("/etc/c", FileSnapshot::default());
        assert!(!manager.ledger().is_empty());

        manager.sync(None, None);
        assert!(manager.ledger().is_empty());
    }

    #[test]
    fn test_on_path_removed_keeps_snapshot() {
        let mut manager = HookManager::new(Arc::new(NullExecutor));
        let snapshot = FileSnapshot {
            path: "/etc/app.conf".to_string(),
            contents: Some(b"key=value".to_vec()),
            mode: Some(0o600),
            user: Some("root".to_string()),
            group: Some("root".to_string()),
        };
        manager.on_path_removed("/etc/app.conf", snapshot.clone());

        assert_eq!(
            manager.ledger().removed_snapshot("/etc/app.conf"),
            Some(&snapshot)
        );
        assert_eq!(
            manager.ledger().created().len() + manager.ledger().updated().len(),
            0
        );
    }

    #[test]
    fn test_builder_default_timeout() {
        let manager = HookManager::builder(Arc::new(NullExecutor))
            .default_timeout(Duration::from_secs(42))
            .build();
        assert_eq!(manager.default_timeout(), Duration::from_secs(42));
    }
}
