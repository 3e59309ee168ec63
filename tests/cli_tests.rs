use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn honeylab(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("honeylab").expect("binary built");
    cmd.current_dir(dir)
        .env_remove("YOUTUBE_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env("RUST_LOG", "off");
    cmd
}

fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join("config.toml"), contents).expect("write config");
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    honeylab(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("recover"))
        .stdout(predicate::str::contains("classify"));
}

#[test]
fn classify_without_config_uses_pattern_defaults() {
    let dir = tempfile::tempdir().unwrap();
    honeylab(dir.path())
        .args(["--json", "classify", "비트코인 지금 사야 하는 이유"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"command\":\"classify\""))
        .stdout(predicate::str::contains("Bitcoin"))
        .stdout(predicate::str::contains("positive"));
}

#[test]
fn stats_on_empty_ledger_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "data_dir = \"ledger\"\n");

    honeylab(dir.path())
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"honeyIndex\":0.0"))
        .stdout(predicate::str::contains("\"resolved\":0"));
}

#[test]
fn collect_without_youtube_key_fails_before_work() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "data_dir = \"ledger\"\n");

    honeylab(dir.path())
        .arg("collect")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("YOUTUBE_API_KEY"));
    assert!(!dir.path().join("ledger").exists());
}

#[test]
fn llm_classify_without_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    honeylab(dir.path())
        .args(["classify", "테슬라 폭락", "--strategy", "llm"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn invalid_config_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "[resolution]\nwindow_hours = 0\n");

    honeylab(dir.path())
        .arg("stats")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("resolution.window_hours"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    honeylab(dir.path())
        .args(["--config", "elsewhere.toml", "stats"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn migrate_rewrites_legacy_partitions() {
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), "data_dir = \"ledger\"\n");
    let partition = dir.path().join("ledger/2025/01");
    fs::create_dir_all(&partition).unwrap();
    fs::write(
        partition.join("unresolved.json"),
        r#"[{
            "videoId": "v1",
            "title": "비트코인 반등",
            "publishedAt": "2025-01-10T09:00:00Z",
            "asset": "Bitcoin",
            "reason": "no_market_data",
            "positiveScore": 2,
            "negativeScore": 0
        }]"#,
    )
    .unwrap();

    honeylab(dir.path())
        .args(["--json", "migrate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"partitions\":1"));

    let rewritten: serde_json::Value =
        serde_json::from_slice(&fs::read(partition.join("unresolved.json")).unwrap()).unwrap();
    assert_eq!(rewritten["version"], 2);
    assert_eq!(rewritten["records"].as_array().unwrap().len(), 1);
}
