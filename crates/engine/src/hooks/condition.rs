//! Condition evaluation
//!
//! Decides whether an action runs by testing its condition against the
//! mutation ledger. A satisfied file operation condition also populates the
//! command-line variables with the concrete paths it matched.

use super::ledger::PathMap;
use super::vars::{ActionContext, CommandLineVar};
use devhook_config::{FileOperation, HookCondition, HookConditionFileOp};

/// Evaluate a condition against the ledger held by `ctx`
///
/// A missing condition always matches and leaves the variables untouched.
/// The caller is expected to reset the variables beforehand.
pub fn evaluate(condition: Option<&HookCondition>, ctx: &mut ActionContext<'_>) -> bool {
    match condition {
        None => true,
        Some(HookCondition::FileOp(cond)) => evaluate_file_op(cond, ctx),
    }
}

/// Check whether any requested operation touched the condition path
///
/// A path ending in `/` is a subtree condition, anything else must match a
/// recorded path exactly.
fn evaluate_file_op(cond: &HookConditionFileOp, ctx: &mut ActionContext<'_>) -> bool {
    let subtree = cond.path.ends_with('/');
    let path = if subtree {
        normalize_dir(&cond.path)
    } else {
        cond.path.clone()
    };

    let ledger = ctx.ledger;
    let kinds: [(FileOperation, CommandLineVar, &PathMap); 3] = [
        (
            FileOperation::Create,
            CommandLineVar::CreatedFiles,
            ledger.created(),
        ),
        (
            FileOperation::Update,
            CommandLineVar::UpdatedFiles,
            ledger.updated(),
        ),
        (
            FileOperation::Remove,
            CommandLineVar::RemovedFiles,
            ledger.removed(),
        ),
    ];

    let mut matched = false;
    for (op, var, files) in kinds {
        if !cond.op.contains(&op) {
            continue;
        }

        let hits = if subtree {
            contained_files(&path, files)
        } else if files.contains_key(&path) {
            vec![path.as_str()]
        } else {
            Vec::new()
        };

        if hits.is_empty() {
            continue;
        }

        ctx.vars.append(CommandLineVar::Files, &hits);
        ctx.vars.append(var, &hits);
        matched = true;
    }

    if matched {
        ctx.vars.set(CommandLineVar::Path, path);
    }
    matched
}

/// Collapse trailing separators to exactly one so `/etc/foo/` never matches `/etc/foo2`
fn normalize_dir(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

/// Recorded paths lying in the subtree rooted at `dir` (which ends in `/`)
fn contained_files<'m>(dir: &str, files: &'m PathMap) -> Vec<&'m str> {
    files
        .keys()
        .filter(|file| file.starts_with(dir))
        .map(String::as_str)
        .collect()
}
