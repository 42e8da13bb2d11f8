//! Rendered device specification
//!
//! The subset of the device specification that drives lifecycle hooks: an
//! ordered list of actions for each of the four checkpoints of an apply cycle.
//! Condition and action kinds are closed sum types, so an unknown kind is
//! rejected when the specification is decoded rather than when it runs.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Fixed points of an apply cycle where hooks may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Checkpoint {
    /// Before the new configuration is written
    BeforeUpdating,
    /// After the new configuration has been written
    AfterUpdating,
    /// Before the device reboots into the new configuration
    BeforeRebooting,
    /// After the device has rebooted
    AfterRebooting,
}

impl Checkpoint {
    /// All checkpoints in apply-cycle order
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::BeforeUpdating,
        Checkpoint::AfterUpdating,
        Checkpoint::BeforeRebooting,
        Checkpoint::AfterRebooting,
    ];

    /// Get the wire name of this checkpoint
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Checkpoint::BeforeUpdating => "beforeUpdating",
            Checkpoint::AfterUpdating => "afterUpdating",
            Checkpoint::BeforeRebooting => "beforeRebooting",
            Checkpoint::AfterRebooting => "afterRebooting",
        }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Checkpoint {
    type Err = Error;

    /// Accepts the wire name (`afterUpdating`) or kebab-case (`after-updating`)
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        Checkpoint::ALL
            .into_iter()
            .find(|cp| cp.name().to_lowercase() == normalized)
            .ok_or_else(|| {
                Error::Config(format!(
                    "unknown checkpoint '{s}' (expected one of: beforeUpdating, afterUpdating, beforeRebooting, afterRebooting)"
                ))
            })
    }
}

/// Device specification as rendered for one device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDeviceSpec {
    /// Version of the rendered specification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_version: Option<String>,

    /// Lifecycle hooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<DeviceHooksSpec>,
}

/// Hook declarations per checkpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceHooksSpec {
    /// Actions run before the update is applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_updating: Option<Vec<HookAction>>,

    /// Actions run after the update is applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_updating: Option<Vec<HookAction>>,

    /// Actions run before rebooting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_rebooting: Option<Vec<HookAction>>,

    /// Actions run after rebooting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_rebooting: Option<Vec<HookAction>>,
}

impl DeviceHooksSpec {
    /// Actions declared for a checkpoint (empty when the checkpoint is absent)
    #[must_use]
    pub fn actions(&self, checkpoint: Checkpoint) -> &[HookAction] {
        let actions = match checkpoint {
            Checkpoint::BeforeUpdating => &self.before_updating,
            Checkpoint::AfterUpdating => &self.after_updating,
            Checkpoint::BeforeRebooting => &self.before_rebooting,
            Checkpoint::AfterRebooting => &self.after_rebooting,
        };
        actions.as_deref().unwrap_or(&[])
    }

    /// Check if no checkpoint declares any action
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Checkpoint::ALL.iter().all(|cp| self.actions(*cp).is_empty())
    }
}

/// A conditionally executed hook action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookAction {
    /// Run an external command
    Run(HookActionRun),
}

impl HookAction {
    /// Condition gating this action (`None` = always run)
    #[must_use]
    pub fn condition(&self) -> Option<&HookCondition> {
        match self {
            HookAction::Run(run) => run.condition.as_ref(),
        }
    }
}

/// Run an external command when the condition holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HookActionRun {
    /// Condition gating the command
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<HookCondition>,

    /// Command line template, e.g. `systemctl restart {{ Path }}`
    pub run: String,

    /// Working directory (must already exist)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<String>,

    /// Duration string such as `30s` (default: 10s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Extra environment variables for the command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_vars: Option<IndexMap<String, String>>,
}

/// Declarative condition on the mutations of the current apply cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookCondition {
    /// Match file operations on a path or a directory subtree
    FileOp(HookConditionFileOp),
}

/// File operation condition
///
/// A `path` ending in `/` matches any file in the subtree below it,
/// otherwise only the exact path matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookConditionFileOp {
    /// Watched file or directory
    pub path: String,

    /// Operations that satisfy the condition
    #[serde(default)]
    pub op: Vec<FileOperation>,
}

/// Kind of filesystem mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileOperation {
    /// A file was created
    Create,
    /// An existing file was updated
    Update,
    /// A file was removed
    Remove,
}

/// Load a rendered device specification from disk
///
/// Files ending in `.json` are decoded as JSON, everything else as TOML.
pub fn load_spec(path: &Path) -> Result<RenderedDeviceSpec> {
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let spec = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    spec.map_err(|message| Error::SpecParse {
        path: path.to_path_buf(),
        message,
    })
}
