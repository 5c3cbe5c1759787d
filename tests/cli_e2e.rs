#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn coursemap(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("coursemap").unwrap();
    cmd.current_dir(dir)
        .env("COURSEMAP_CONFIG_DIR", dir.join("config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_build_and_render_course() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir).arg("init").assert().success();
    assert!(dir.join("course_data.json").exists());

    coursemap(dir)
        .args(["set", "number", "CS101"])
        .assert()
        .success();
    coursemap(dir)
        .args(["set", "name", "Intro", "to", "Things"])
        .assert()
        .success();
    coursemap(dir)
        .args(["outcome", "add", "Explain", "X"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added outcome A"));
    coursemap(dir)
        .args(["module", "add", "Basics"])
        .assert()
        .success();
    coursemap(dir)
        .args(["module", "slos", "1", "A"])
        .assert()
        .success();
    coursemap(dir)
        .args(["objective", "add", "1", "Define", "X"])
        .assert()
        .success();
    coursemap(dir)
        .args(["item", "add", "1", "resource", "Textbook ch.1", "--obj", "1.1"])
        .assert()
        .success();

    coursemap(dir)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("CS101 - Intro to Things"))
        .stdout(predicate::str::contains("1. Textbook ch.1 (Obj: 1.1)"));

    let out = dir.join("map.txt");
    coursemap(dir)
        .args(["render", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered 1 page(s)"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("Course Map"));
    assert!(text.contains("CS101 - Intro to Things"));
    assert!(text.contains("A. Explain X"));
    assert!(text.contains("1.1 Define X"));
    assert!(text.contains("Textbook ch.1 (Obj: 1.1)"));
}

#[test]
fn test_export_then_import_into_another_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir)
        .args(["outcome", "add", "Explain", "X"])
        .assert()
        .success();
    coursemap(dir)
        .args(["export", "copy.json"])
        .assert()
        .success();

    coursemap(dir)
        .args(["--file", "other.json", "import", "copy.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 outcomes"));

    let original = std::fs::read_to_string(dir.join("course_data.json")).unwrap();
    let imported = std::fs::read_to_string(dir.join("other.json")).unwrap();
    assert_eq!(original, imported);
}

#[test]
fn test_bad_label_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir)
        .args(["objective", "rm", "1.x"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_out_of_range_leaves_file_untouched() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir)
        .args(["module", "add", "Basics"])
        .assert()
        .success();
    let before = std::fs::read_to_string(dir.join("course_data.json")).unwrap();

    coursemap(dir)
        .args(["item", "add", "1", "activity", "Lab", "--obj", "1.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("objective"));

    let after = std::fs::read_to_string(dir.join("course_data.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_reset_needs_confirmation() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir)
        .args(["module", "add", "Basics"])
        .assert()
        .success();
    coursemap(dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
    coursemap(dir)
        .arg("show")
        .assert()
        .stdout(predicate::str::contains("Module 1: Basics"));

    coursemap(dir).args(["reset", "-y"]).assert().success();
    coursemap(dir)
        .arg("show")
        .assert()
        .stdout(predicate::str::contains("Empty course"));
}

#[test]
fn test_config_set_changes_course_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();

    coursemap(dir)
        .args(["config", "course_file", "elsewhere.json"])
        .assert()
        .success();
    coursemap(dir)
        .args(["module", "add", "Basics"])
        .assert()
        .success();

    assert!(dir.join("elsewhere.json").exists());
    assert!(!dir.join("course_data.json").exists());

    coursemap(dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("course_file").and(predicate::str::contains("elsewhere.json")));
}

#[test]
fn test_grouped_help() {
    let temp_dir = tempfile::tempdir().unwrap();
    coursemap(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Structure Commands:"));
}
