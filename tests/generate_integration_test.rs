//! End-to-end tests for the forum-fixtures binary

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn forum_fixtures_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_forum-fixtures"))
}

fn generate_small(output: &Path, extra: &[&str]) -> std::process::Output {
    forum_fixtures_bin()
        .arg("generate")
        .arg("--scale")
        .arg("small")
        .arg("--output")
        .arg(output)
        .args(extra)
        .output()
        .expect("Failed to execute forum-fixtures")
}

fn sql_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".sql"))
        .collect();
    names.sort();
    names
}

#[test]
fn test_generate_writes_all_segments_and_scripts() {
    let out = TempDir::new().unwrap();
    let output = generate_small(out.path(), &[]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(
        sql_files(out.path()),
        vec![
            "01_members.sql",
            "02_categories.sql",
            "03_boards.sql",
            "04_book_reviews.sql",
            "05_root_replies.sql",
            "06_depth1_replies.sql",
            "07_depth2_replies.sql",
            "08_likes.sql",
        ]
    );
    assert!(out.path().join("import_all.sh").exists());
    assert!(out.path().join("import_all.bat").exists());

    let members = fs::read_to_string(out.path().join("01_members.sql")).unwrap();
    assert!(members.contains("'testuser10@booktalk.com'"));
    assert!(!members.contains("testuser11@"));
}

#[test]
fn test_generate_is_byte_identical_for_same_seed() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    assert!(generate_small(a.path(), &["--seed", "9"]).status.success());
    assert!(generate_small(b.path(), &["--seed", "9", "--batch-size", "1000"])
        .status
        .success());

    for name in sql_files(a.path()) {
        let left = fs::read(a.path().join(&name)).unwrap();
        let right = fs::read(b.path().join(&name)).unwrap();
        assert_eq!(left, right, "{name} differs between runs");
    }
}

#[test]
fn test_generate_no_scripts_and_dry_run() {
    let out = TempDir::new().unwrap();
    assert!(generate_small(out.path(), &["--no-scripts"]).status.success());
    assert!(!out.path().join("import_all.sh").exists());

    let dry = TempDir::new().unwrap();
    let target = dry.path().join("never");
    let output = generate_small(&target, &["--dry-run"]);
    assert!(output.status.success());
    assert!(!target.exists());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Dry run completed"));
}

#[test]
fn test_infeasible_likes_write_no_files() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("fixtures.yaml");
    fs::write(&config, "scale: small\ncounts:\n  likes: 1000000\n").unwrap();
    let out = dir.path().join("out");

    let output = forum_fixtures_bin()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unique likes"));
    assert!(!out.exists() || sql_files(&out).is_empty());
}

#[test]
fn test_check_command_passes() {
    let output = forum_fixtures_bin()
        .args(["check", "--scale", "small", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["total_issues"], 0);
    assert_eq!(json["hot_posts"]["non_hot_root_replies"], 0);
    assert_eq!(json["segments"].as_array().unwrap().len(), 8);
}

#[test]
fn test_plan_json() {
    let output = forum_fixtures_bin()
        .args(["plan", "--scale", "full", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_rows"], 4_610_100);
    assert_eq!(json["hot_posts"]["total"], 30_000);
    assert_eq!(
        json["hot_posts"]["boards"],
        "BO_000000975001 .. BO_000001000000"
    );
    assert_eq!(json["like_pool"]["total"], 250_000);
}
