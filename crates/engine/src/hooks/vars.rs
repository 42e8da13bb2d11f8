//! Command-line variables and the per-checkpoint action context

use super::ledger::MutationLedger;
use devhook_config::Checkpoint;

/// Variables a command template may reference as `{{ Name }}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLineVar {
    /// The (normalized) path of the matched condition
    Path,
    /// Space-separated files created, updated or removed
    Files,
    /// Space-separated files created
    CreatedFiles,
    /// Space-separated files updated
    UpdatedFiles,
    /// Space-separated files removed
    RemovedFiles,
}

impl CommandLineVar {
    /// Every recognized variable
    pub const ALL: [CommandLineVar; 5] = [
        CommandLineVar::Path,
        CommandLineVar::Files,
        CommandLineVar::CreatedFiles,
        CommandLineVar::UpdatedFiles,
        CommandLineVar::RemovedFiles,
    ];

    /// Name used inside placeholders
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CommandLineVar::Path => "Path",
            CommandLineVar::Files => "Files",
            CommandLineVar::CreatedFiles => "CreatedFiles",
            CommandLineVar::UpdatedFiles => "UpdatedFiles",
            CommandLineVar::RemovedFiles => "RemovedFiles",
        }
    }

    /// Look a variable up by its placeholder name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Current values of all command-line variables (unset = empty)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineVars {
    values: [String; 5],
}

impl CommandLineVars {
    /// Current value of a variable
    pub fn get(&self, var: CommandLineVar) -> &str {
        &self.values[var.index()]
    }

    /// Overwrite a variable
    pub fn set(&mut self, var: CommandLineVar, value: impl Into<String>) {
        self.values[var.index()] = value.into();
    }

    /// Append space-separated files to a variable, keeping what is already there
    pub fn append<S: AsRef<str>>(&mut self, var: CommandLineVar, files: &[S]) {
        let value = &mut self.values[var.index()];
        for file in files {
            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(file.as_ref());
        }
    }

    /// Unset every variable
    pub fn reset(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
    }
}

/// Transient state for one checkpoint invocation
///
/// Borrows the ledger read-only; the variables are scratch space rewritten by
/// each condition evaluation.
#[derive(Debug)]
pub struct ActionContext<'a> {
    /// Checkpoint being run
    pub checkpoint: Checkpoint,
    /// Mutations of the current apply cycle
    pub ledger: &'a MutationLedger,
    /// Variables populated by the last condition evaluation
    pub vars: CommandLineVars,
}

impl<'a> ActionContext<'a> {
    /// Create a context with all variables unset
    pub fn new(checkpoint: Checkpoint, ledger: &'a MutationLedger) -> Self {
        Self {
            checkpoint,
            ledger,
            vars: CommandLineVars::default(),
        }
    }
}
