//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's config and environment.
fn braindriver(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("braindriver").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("BRAINDRIVER_LANGUAGE")
        .env_remove("BRAINDRIVER_STORE_DIR")
        .env_remove("RUST_LOG");
    cmd
}

const SMALL_CATALOG: &str = r##"
[catalog]
name = "Tiny"

[[stage1]]
id = "s1-a"
locale_key = "main1"
correct = "reptilian"

[[stage2]]
id = "s2-a"
locale_key = "ctrl1"
controller = "limbic"
controlled = "neocortex"
"##;

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created braindriver.toml"))
        .stdout(predicate::str::contains("Created catalog.toml"));

    assert!(dir.path().join("braindriver.toml").exists());
    assert!(dir.path().join("catalog.toml").exists());

    braindriver(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_generated_catalog() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir).arg("init").assert().success();

    braindriver(&dir)
        .args(["validate", "--catalog", "catalog.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("20 stage 1, 20 stage 2"))
        .stdout(predicate::str::contains("Catalog valid."));
}

#[test]
fn validate_small_catalog_warns() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tiny.toml"), SMALL_CATALOG).unwrap();

    braindriver(&dir)
        .args(["validate", "--catalog", "tiny.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Catalog: Tiny"))
        .stdout(predicate::str::contains(
            "stage 1 pool has 1 questions but 6 are drawn per game",
        ))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_duplicate_ids_fails() {
    let dir = TempDir::new().unwrap();
    let content = SMALL_CATALOG.replace("s2-a", "s1-a");
    std::fs::write(dir.path().join("dup.toml"), content).unwrap();

    braindriver(&dir)
        .args(["validate", "--catalog", "dup.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("s1-a"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["validate", "--catalog", "nope.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn catalog_lists_builtin_questions() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("stage1-1"))
        .stdout(predicate::str::contains("stage2-20"))
        .stdout(predicate::str::contains("neocortex -> limbic"))
        .stdout(predicate::str::contains(
            "40 questions (20 stage 1, 20 stage 2)",
        ));
}

#[test]
fn catalog_as_toml() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["catalog", "--toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[[stage1]]"))
        .stdout(predicate::str::contains("[[stage2]]"))
        .stdout(predicate::str::contains("controller = \"neocortex\""));
}

#[test]
fn simulate_reports_chi_square() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["simulate", "--runs", "500", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Stage 1: 20 questions, 6 drawn per game over 500 runs",
        ))
        .stdout(predicate::str::contains("Stage 2: 20 questions"))
        .stdout(predicate::str::contains("chi-square ="))
        .stdout(predicate::str::contains("(df = 19)"));
}

#[test]
fn simulate_rejects_zero_runs() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["simulate", "--runs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("runs must be at least 1"));
}

#[test]
fn play_with_undersized_pool_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tiny.toml"), SMALL_CATALOG).unwrap();

    braindriver(&dir)
        .args(["play", "--catalog", "tiny.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "cannot draw 6 stage 1 questions from a pool of 1",
        ));
}

#[test]
fn unsupported_language_in_config_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("braindriver.toml"), "language = \"de\"\n").unwrap();

    braindriver(&dir)
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported language"));
}

#[test]
fn explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["catalog", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn results_need_json_store() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["results", "--session", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("results need a JSON store"));
}

#[test]
fn results_for_unknown_session() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .args(["results", "--session", "abc", "--store-dir", "sessions"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no decisions recorded for session abc",
        ));
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    braindriver(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("results"));
}
