//! CLI integration tests
//!
//! Only non-mutating surfaces are exercised here: plan output, config
//! inspection, and dry runs. The real `run` path shells out to package
//! managers and is covered by the library's engine tests instead.

use assert_cmd::Command;
use predicates::prelude::*;

/// Command with an isolated home so a developer's real config file and
/// dotfiles never leak into assertions.
fn shellrig(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shellrig").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SHELLRIG_EDITOR")
        .env_remove("SHELLRIG_THEME");
    cmd
}

#[test]
fn show_text_lists_plan() {
    let home = tempfile::tempdir().unwrap();
    shellrig(home.path())
        .args(["show", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Install zsh"))
        .stdout(predicate::str::contains("Install oh-my-zsh"))
        .stdout(predicate::str::contains("Write .zshrc"))
        .stdout(predicate::str::contains("skip when: zsh on PATH"));
}

#[test]
fn show_yaml_serializes_plan() {
    let home = tempfile::tempdir().unwrap();
    shellrig(home.path())
        .args(["show", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Install zsh"))
        .stdout(predicate::str::contains("required: true"))
        .stdout(predicate::str::contains("actions:"));
}

#[test]
fn show_config_reports_missing_file() {
    let home = tempfile::tempdir().unwrap();
    shellrig(home.path())
        .arg("--show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("shellrig/config.toml"))
        .stdout(predicate::str::contains("not found"));
}

#[test]
fn dry_run_prints_plan_without_mutating() {
    let home = tempfile::tempdir().unwrap();
    shellrig(home.path())
        .args(["run", "--dry-run", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("Install zsh"));

    // Nothing was written into the scratch home.
    assert!(!home.path().join(".zshrc").exists());
    assert!(!home.path().join(".oh-my-zsh").exists());
}

#[test]
fn config_file_drives_the_plan() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/shellrig");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[prompt]
theme = "none"

[tools]
editor = "vim"
fuzzy_finder = false

[shell]
plugins = ["zsh-autosuggestions"]
"#,
    )
    .unwrap();

    shellrig(home.path())
        .args(["show", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Install vim"))
        .stdout(predicate::str::contains("zsh-autosuggestions"))
        .stdout(predicate::str::contains("Install powerlevel10k").not())
        .stdout(predicate::str::contains("Install fzf").not());
}

#[test]
fn cli_flags_override_config_file() {
    let home = tempfile::tempdir().unwrap();
    shellrig(home.path())
        .args(["run", "--dry-run", "--yes", "--theme", "none", "--editor", "helix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Install helix"))
        .stdout(predicate::str::contains("powerlevel10k").not());
}

#[test]
fn invalid_config_file_is_a_hard_error() {
    let home = tempfile::tempdir().unwrap();
    let config_dir = home.path().join(".config/shellrig");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "not = [valid").unwrap();

    shellrig(home.path())
        .args(["show", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
