use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("lotus").unwrap();
    cmd.env_remove("LOTUS_API_KEY")
        .env_remove("MISTRAL_API_KEY")
        .env_remove("LOTUS_MODEL");
    cmd
}

#[test]
fn test_version_command() {
    cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lotus"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_main_help_shows_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("tools"))
        .stdout(predicate::str::contains("skills"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_tools_lists_builtins() {
    cmd()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("set_skill"))
        .stdout(predicate::str::contains("create_skill"))
        .stdout(predicate::str::contains("get_top_songs"))
        .stdout(predicate::str::contains("search_tracks"));
}

#[test]
fn test_tools_filter_narrows_output() {
    cmd()
        .args(["tools", "--filter", "top_songs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get_top_songs"))
        .stdout(predicate::str::contains("set_skill").not());
}

#[test]
fn test_tools_filter_matches_descriptions_too() {
    cmd()
        .args(["tools", "--filter", "SKILL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set_skill"))
        .stdout(predicate::str::contains("create_skill"));
}

#[test]
fn test_tools_filter_no_match() {
    cmd()
        .args(["tools", "--filter", "zzz-no-such-tool"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tools match"));
}

#[test]
fn test_skills_lists_builtin_profiles() {
    cmd()
        .arg("skills")
        .assert()
        .success()
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("analyst"))
        .stdout(predicate::str::contains("curator"));
}

#[test]
fn test_chat_without_api_key_fails() {
    cmd()
        .args(["chat", "hello"])
        .env("HOME", "/nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_unknown_command_fails() {
    cmd().arg("frobnicate").assert().failure();
}
