//! Built-in hook actions
//!
//! Actions shipped with the agent and evaluated before any user-declared
//! action of the same checkpoint. Only `afterUpdating` carries defaults: they
//! reload system services whose configuration directory was touched.

use devhook_config::{
    Checkpoint, FileOperation, HookAction, HookActionRun, HookCondition, HookConditionFileOp,
};
use std::sync::LazyLock;

/// Service manager unit definitions
pub const SYSTEMD_UNITS_DIR: &str = "/etc/systemd/system/";
/// Network manager connection profiles
pub const NETWORK_MANAGER_CONNECTIONS_DIR: &str = "/etc/NetworkManager/system-connections/";
/// Firewall daemon configuration
pub const FIREWALLD_DIR: &str = "/etc/firewalld/";

static DEFAULT_AFTER_UPDATING: LazyLock<Vec<HookAction>> = LazyLock::new(|| {
    vec![
        reload_on_change(SYSTEMD_UNITS_DIR, "systemctl daemon-reload"),
        reload_on_change(NETWORK_MANAGER_CONNECTIONS_DIR, "nmcli conn reload"),
        reload_on_change(FIREWALLD_DIR, "firewall-cmd --reload"),
    ]
});

/// Run `command` whenever anything below `dir` is created, updated or removed
fn reload_on_change(dir: &str, command: &str) -> HookAction {
    HookAction::Run(HookActionRun {
        condition: Some(HookCondition::FileOp(HookConditionFileOp {
            path: dir.to_string(),
            op: vec![
                FileOperation::Create,
                FileOperation::Update,
                FileOperation::Remove,
            ],
        })),
        run: command.to_string(),
        ..HookActionRun::default()
    })
}

/// Built-in actions for a checkpoint
#[must_use]
pub fn default_actions(checkpoint: Checkpoint) -> &'static [HookAction] {
    match checkpoint {
        Checkpoint::AfterUpdating => DEFAULT_AFTER_UPDATING.as_slice(),
        Checkpoint::BeforeUpdating | Checkpoint::BeforeRebooting | Checkpoint::AfterRebooting => {
            &[]
        }
    }
}
