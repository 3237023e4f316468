//! Integration tests for the `gridboard` binary.
//!
//! Each test points `XDG_CONFIG_HOME` and `XDG_DATA_HOME` at its own temp
//! directory, so the real user configuration and saved layout are never
//! touched.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const GRIDBOARD_BIN: &str = env!("CARGO_BIN_EXE_gridboard");

const LAYOUT_KEY: &str = "dashboard-grid-layout";

/// Isolated config and data homes for one test.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn config_home(&self) -> PathBuf {
        self.dir.path().join("config")
    }

    fn data_home(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn config_file(&self) -> PathBuf {
        self.config_home().join("gridboard").join("config.toml")
    }

    fn layout_file(&self) -> PathBuf {
        self.data_home().join("gridboard").join(LAYOUT_KEY)
    }

    fn write_layout(&self, raw: &str) {
        let path = self.layout_file();
        fs::create_dir_all(path.parent().expect("has parent")).expect("create data dir");
        fs::write(path, raw).expect("write layout");
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(GRIDBOARD_BIN);
        cmd.env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.data_home())
            .env_remove("GRIDBOARD_LOG");
        cmd
    }
}

#[test]
fn test_show_without_saved_layout_prints_default() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("no saved layout"))
        .stdout(predicate::str::contains("default layout:"))
        .stdout(predicate::str::contains("\"id\": \"a\""));
}

#[test]
fn test_show_prints_saved_layout() {
    let sandbox = Sandbox::new();
    sandbox.write_layout(
        r#"[{"id":"a","x":0,"y":0,"w":6,"h":2,"content":"A"},{"id":"widget-1","x":6,"y":0,"w":3,"h":2,"content":"widget-1"}]"#,
    );
    sandbox
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("saved layout with 2 widget(s)"))
        .stdout(predicate::str::contains("saved layout:"))
        .stdout(predicate::str::contains("widget-1"));
}

#[test]
fn test_show_reports_corrupt_layout_and_falls_back() {
    let sandbox = Sandbox::new();
    sandbox.write_layout("{not json");
    sandbox
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("saved layout malformed"))
        .stdout(predicate::str::contains("default layout:"));
}

#[test]
fn test_show_reports_non_list_layout() {
    let sandbox = Sandbox::new();
    sandbox.write_layout(r#"{"id":"a","x":0,"y":0,"w":4,"h":2}"#);
    sandbox
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("saved layout is not a list"));
}

#[test]
fn test_reset_removes_saved_layout() {
    let sandbox = Sandbox::new();
    sandbox.write_layout("[]");
    sandbox
        .cmd()
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared saved layout"));
    assert!(!sandbox.layout_file().exists());

    // Nothing left to remove is still a success
    sandbox.cmd().arg("reset").assert().success();
}

#[test]
fn test_config_path_uses_xdg_config_home() {
    let sandbox = Sandbox::new();
    let expected = sandbox.config_file().display().to_string();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected));
}

#[test]
fn test_config_path_honours_override() {
    let sandbox = Sandbox::new();
    let custom = sandbox.dir.path().join("custom.toml");
    sandbox
        .cmd()
        .args(["config", "path", "--config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout(predicate::str::contains(custom.display().to_string()));
}

#[test]
fn test_config_init_then_validate() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration at"));
    assert!(sandbox.config_file().exists());

    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_init_twice_requires_force() {
    let sandbox = Sandbox::new();
    sandbox.cmd().args(["config", "init"]).assert().success();
    sandbox
        .cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
    sandbox
        .cmd()
        .args(["config", "init", "--force"])
        .assert()
        .success();
    assert!(sandbox.config_file().with_extension("toml.backup").exists());
}

#[test]
fn test_invalid_config_fails_commands() {
    let sandbox = Sandbox::new();
    let path = sandbox.dir.path().join("bad.toml");
    fs::write(&path, "[grid]\ncolumn = 0\n").expect("write config");
    sandbox
        .cmd()
        .args(["show", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_custom_storage_key_from_config() {
    let sandbox = Sandbox::new();
    let store_dir = sandbox.dir.path().join("store");
    let path = sandbox.dir.path().join("custom.toml");
    fs::write(
        &path,
        format!(
            "[storage]\nkey = \"team-layout\"\ndir = \"{}\"\n",
            store_dir.display()
        ),
    )
    .expect("write config");
    fs::create_dir_all(&store_dir).expect("create store dir");
    fs::write(store_dir.join("team-layout"), "[]").expect("write layout");

    sandbox
        .cmd()
        .args(["show", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("saved layout with 0 widget(s)"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["show", "--config"])
        .arg(sandbox.dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
