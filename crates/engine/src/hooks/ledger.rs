//! Mutation ledger
//!
//! Records every path created, updated or removed during one apply cycle.
//! Each mutation kind has its own mapping, so a path touched by two kinds of
//! operation in one cycle shows up in both. Within a kind, the latest event
//! for a path wins.

use indexmap::IndexMap;

/// Descriptor of a file as seen by the writer
///
/// Created and updated paths carry the empty placeholder descriptor; removed
/// paths keep the pre-removal snapshot so the file can be audited or restored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSnapshot {
    /// Absolute path on the device
    pub path: String,
    /// File contents before removal
    pub contents: Option<Vec<u8>>,
    /// Permission bits
    pub mode: Option<u32>,
    /// Owning user
    pub user: Option<String>,
    /// Owning group
    pub group: Option<String>,
}

/// Path → descriptor mapping for one mutation kind
pub type PathMap = IndexMap<String, FileSnapshot>;

/// Per-cycle record of filesystem mutations
#[derive(Debug, Clone, Default)]
pub struct MutationLedger {
    created: PathMap,
    updated: PathMap,
    removed: PathMap,
}

impl MutationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created path
    pub fn record_created(&mut self, path: impl Into<String>) {
        self.created.insert(path.into(), FileSnapshot::default());
    }

    /// Record an updated path
    pub fn record_updated(&mut self, path: impl Into<String>) {
        self.updated.insert(path.into(), FileSnapshot::default());
    }

    /// Record a removed path together with its pre-removal snapshot
    pub fn record_removed(&mut self, path: impl Into<String>, snapshot: FileSnapshot) {
        self.removed.insert(path.into(), snapshot);
    }

    /// Paths created in this cycle
    pub fn created(&self) -> &PathMap {
        &self.created
    }

    /// Paths updated in this cycle
    pub fn updated(&self) -> &PathMap {
        &self.updated
    }

    /// Paths removed in this cycle
    pub fn removed(&self) -> &PathMap {
        &self.removed
    }

    /// Snapshot of a removed file, if it was removed in this cycle
    pub fn removed_snapshot(&self, path: &str) -> Option<&FileSnapshot> {
        self.removed.get(path)
    }

    /// Check if nothing was recorded in this cycle
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Forget every recorded mutation
    pub fn clear(&mut self) {
        self.created.clear();
        self.updated.clear();
        self.removed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = MutationLedger::new();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_path_can_appear_in_several_kinds() {
        let mut ledger = MutationLedger::new();
        ledger.record_updated("/etc/app.conf");
        ledger.record_removed("/etc/app.conf", FileSnapshot::default());

        assert!(ledger.updated().contains_key("/etc/app.conf"));
        assert!(ledger.removed().contains_key("/etc/app.conf"));
        assert!(ledger.created().is_empty());
    }

    #[test]
    fn test_latest_removal_wins() {
        let mut ledger = MutationLedger::new();
        let first = FileSnapshot {
            path: "/etc/app.conf".to_string(),
            contents: Some(b"old".to_vec()),
            ..FileSnapshot::default()
        };
        let second = FileSnapshot {
            path: "/etc/app.conf".to_string(),
            contents: Some(b"older".to_vec()),
            mode: Some(0o644),
            ..FileSnapshot::default()
        };

        ledger.record_removed("/etc/app.conf", first);
        ledger.record_removed("/etc/app.conf", second.clone());

        assert_eq!(ledger.removed().len(), 1);
        assert_eq!(ledger.removed_snapshot("/etc/app.conf"), Some(&second));
    }

    #[test]
    fn test_clear() {
        let mut ledger = MutationLedger::new();
        ledger.record_created("/etc/a");
        ledger.record_updated("/etc/b");
        ledger.record_removed("/etc/c", FileSnapshot::default());
        assert!(!ledger.is_empty());

        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.removed_snapshot("/etc/c").is_none());
    }
}
