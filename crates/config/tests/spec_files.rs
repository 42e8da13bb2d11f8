//! Integration tests for loading rendered device specifications

use devhook_config::{Checkpoint, FileOperation, HookAction, HookCondition, load_spec};

const DEVICE_SPEC_TOML: &str = r#"
renderedVersion = "42"

[[hooks.beforeUpdating]]
run = "/usr/local/bin/backup --all"
workDir = "/var/lib/app"
timeout = "1m"

[hooks.beforeUpdating.envVars]
BACKUP_TARGET = "/var/backup"
BACKUP_MODE = "full"

[[hooks.afterUpdating]]
run = "systemctl restart {{ Path }}"

[hooks.afterUpdating.if]
path = "/etc/app/"
op = ["Create", "Update"]

[[hooks.afterUpdating]]
run = "logger removed {{ RemovedFiles }}"

[hooks.afterUpdating.if]
path = "/etc/app/legacy.conf"
op = ["Remove"]

[[hooks.beforeRebooting]]
run = "sync"
"#;

const DEVICE_SPEC_JSON: &str = r#"{
  "renderedVersion": "42",
  "hooks": {
    "beforeUpdating": [
      {
        "run": "/usr/local/bin/backup --all",
        "workDir": "/var/lib/app",
        "timeout": "1m",
        "envVars": { "BACKUP_TARGET": "/var/backup", "BACKUP_MODE": "full" }
      }
    ],
    "afterUpdating": [
      {
        "if": { "path": "/etc/app/", "op": ["Create", "Update"] },
        "run": "systemctl restart {{ Path }}"
      },
      {
        "if": { "path": "/etc/app/legacy.conf", "op": ["Remove"] },
        "run": "logger removed {{ RemovedFiles }}"
      }
    ],
    "beforeRebooting": [ { "run": "sync" } ]
  }
}"#;

#[test]
fn test_device_spec_formats_agree() {
    let dir = tempfile::tempdir().unwrap();
    let toml_path = dir.path().join("device.toml");
    let json_path = dir.path().join("device.json");
    std::fs::write(&toml_path, DEVICE_SPEC_TOML).unwrap();
    std::fs::write(&json_path, DEVICE_SPEC_JSON).unwrap();

    let from_toml = load_spec(&toml_path).unwrap();
    let from_json = load_spec(&json_path).unwrap();
    assert_eq!(from_toml, from_json);
}

#[test]
fn test_device_spec_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.toml");
    std::fs::write(&path, DEVICE_SPEC_TOML).unwrap();

    let spec = load_spec(&path).unwrap();
    assert_eq!(spec.rendered_version.as_deref(), Some("42"));

    let hooks = spec.hooks.unwrap();
    assert_eq!(hooks.actions(Checkpoint::BeforeUpdating).len(), 1);
    assert_eq!(hooks.actions(Checkpoint::AfterUpdating).len(), 2);
    assert_eq!(hooks.actions(Checkpoint::BeforeRebooting).len(), 1);
    assert!(hooks.actions(Checkpoint::AfterRebooting).is_empty());

    let HookAction::Run(backup) = &hooks.actions(Checkpoint::BeforeUpdating)[0];
    assert_eq!(backup.work_dir.as_deref(), Some("/var/lib/app"));
    assert_eq!(backup.timeout.as_deref(), Some("1m"));
    let env = backup.env_vars.as_ref().unwrap();
    assert_eq!(env.len(), 2);
    assert_eq!(env.get("BACKUP_TARGET").map(String::as_str), Some("/var/backup"));
    assert_eq!(env.get("BACKUP_MODE").map(String::as_str), Some("full"));

    let Some(HookCondition::FileOp(cond)) = hooks.actions(Checkpoint::AfterUpdating)[1].condition()
    else {
        panic!("expected a file operation condition");
    };
    assert_eq!(cond.path, "/etc/app/legacy.conf");
    assert_eq!(cond.op, vec![FileOperation::Remove]);
}

#[test]
fn test_action_with_unknown_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("device.json");
    std::fs::write(
        &path,
        r#"{ "hooks": { "afterRebooting": [ { "run": "true", "retries": 3 } ] } }"#,
    )
    .unwrap();

    let err = load_spec(&path).unwrap_err();
    assert!(err.to_string().contains("device.json"));
}
