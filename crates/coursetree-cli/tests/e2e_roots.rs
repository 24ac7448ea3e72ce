//! E2E CLI tests for `ctree roots`, `ctree substitute`, `ctree validation`
//! and `ctree config`.
//!
//! Each test runs the `ctree` binary as a subprocess in an isolated temp
//! directory. Tests cover text, pretty and `--json` output.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn ctree_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ctree").expect("ctree binary must exist");
    cmd.current_dir(dir);
    cmd.env("CTREE_LOG", "error");
    cmd.env("FORMAT", "text");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write fixture");
    path
}

fn json_stdout(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

const SOME_TREES: &str = r#"[
    {"id": "child_1", "parent_id": "vertical_1", "parent_category": "vertical"},
    {"id": "child_2", "parent_id": "vertical_1", "parent_category": "vertical"},
    {"id": "vertical_1", "parent_id": "sequential_1", "parent_category": "sequential"},
    {"id": "child_3", "parent_id": "vertical_2", "parent_category": "vertical"},
    {"id": "child_4", "parent_id": "vertical_2", "parent_category": "vertical"},
    {"id": "vertical_2", "parent_id": "grandparent_vertical", "parent_category": "vertical"},
    {"id": "grandparent_vertical", "parent_id": "great_grandparent_vertical", "parent_category": "vertical"}
]"#;

const PROMOTED: &str = r#"[
    {"id": "url_grandparent", "parent_id": "chapter_1", "parent_category": "chapter"},
    {"id": "url_parent_1", "parent_id": "url_grandparent", "parent_category": "sequential"}
]"#;

// ---------------------------------------------------------------------------
// roots
// ---------------------------------------------------------------------------

#[test]
fn roots_text_lists_one_root_per_line() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(dir.path(), "drafts.json", SOME_TREES);

    ctree_cmd(dir.path())
        .args(["roots"])
        .arg(&input)
        .assert()
        .success()
        .stdout("vertical_1\ngrandparent_vertical\n");
}

#[test]
fn roots_json_groups_members() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", SOME_TREES);

    let output = ctree_cmd(dir.path())
        .args(["roots", "drafts.json", "--group", "--json"])
        .output()
        .expect("roots should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["node_count"], 7);
    assert_eq!(json["use_parent_category"], true);
    let roots = json["roots"].as_array().expect("roots array");
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0]["id"], "vertical_1");
    assert_eq!(roots[0]["members"], serde_json::json!(["child_1", "child_2"]));
    assert_eq!(roots[1]["id"], "grandparent_vertical");
    assert_eq!(
        roots[1]["members"],
        serde_json::json!(["child_3", "child_4", "vertical_2"])
    );
}

#[test]
fn roots_structural_only_skips_promotion() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", PROMOTED);

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json"])
        .assert()
        .success()
        .stdout("url_grandparent\nurl_parent_1\n");

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json", "--structural-only"])
        .assert()
        .success()
        .stdout("url_grandparent\n");
}

#[test]
fn roots_honors_project_config() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", PROMOTED);
    std::fs::create_dir_all(dir.path().join(".coursetree")).expect("config dir");
    write_file(
        dir.path(),
        ".coursetree/config.toml",
        "[roots]\nuse_parent_category = false\n",
    );

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json"])
        .assert()
        .success()
        .stdout("url_grandparent\n");

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json", "--use-parent-category"])
        .assert()
        .success()
        .stdout("url_grandparent\nurl_parent_1\n");
}

#[test]
fn roots_reads_stdin() {
    let dir = TempDir::new().expect("temp dir");

    ctree_cmd(dir.path())
        .args(["roots", "-"])
        .write_stdin(r#"[{"id": "only"}]"#)
        .assert()
        .success()
        .stdout("only\n");
}

#[test]
fn roots_empty_list_prints_nothing() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", "[]");

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn roots_pretty_has_summary() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", SOME_TREES);

    ctree_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["roots", "drafts.json", "--group"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft subtree roots"))
        .stdout(predicate::str::contains("roots:       2"))
        .stdout(predicate::str::contains("└── child_1"));
}

#[test]
fn roots_missing_file_reports_code() {
    let dir = TempDir::new().expect("temp dir");

    let output = ctree_cmd(dir.path())
        .args(["roots", "nope.json", "--json"])
        .output()
        .expect("roots should not crash");
    assert!(!output.status.success());

    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error");
    assert_eq!(err["error"]["error_code"], "E2001");
}

#[test]
fn roots_bad_json_reports_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "drafts.json", "{not json");

    ctree_cmd(dir.path())
        .args(["roots", "drafts.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2002]"));
}

// ---------------------------------------------------------------------------
// substitute
// ---------------------------------------------------------------------------

const CONTEXT: &str = r#"{
    "user": {"anonymous_id": "abc123", "full_name": "Test User"},
    "course": {"display_name": "test_course", "end": "2015-03-01T17:30:00Z"}
}"#;

#[test]
fn substitute_text_replaces_known_keywords() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "ctx.json", CONTEXT);

    ctree_cmd(dir.path())
        .args([
            "substitute",
            "ctx.json",
            "--text",
            "%%USER_FULLNAME%% (%%user_id%%) in %%COURSE_DISPLAY_NAME%% until %%COURSE_END_DATE%%",
        ])
        .assert()
        .success()
        .stdout("Test User (%%user_id%%) in test_course until Mar 01, 2015 at 17:30 UTC\n");
}

#[test]
fn substitute_file_json_lists_keywords() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "ctx.json", CONTEXT);
    write_file(dir.path(), "email.html", "<p>%%USER_ID%%</p>\n");

    let output = ctree_cmd(dir.path())
        .args(["substitute", "ctx.json", "--file", "email.html", "--json"])
        .output()
        .expect("substitute should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["text"], "<p>abc123</p>\n");
    assert_eq!(json["keywords"], serde_json::json!(["%%USER_ID%%"]));
}

// ---------------------------------------------------------------------------
// validation
// ---------------------------------------------------------------------------

const MESSAGES: &str = r#"{
    "detailed_messages": [
        {"message": "not configured", "type": "warning"},
        {"message": "group missing", "type": "error", "action_class": "edit-button"}
    ],
    "show_detailed_only_when_root": true
}"#;

#[test]
fn validation_root_shows_details() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "messages.json", MESSAGES);

    ctree_cmd(dir.path())
        .args(["validation", "messages.json"])
        .assert()
        .success()
        .stdout(
            "error\tThis component has validation issues.\nwarning\tnot configured\nerror\tgroup missing\n",
        );
}

#[test]
fn validation_inline_hides_details() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "messages.json", MESSAGES);

    let output = ctree_cmd(dir.path())
        .args(["validation", "messages.json", "--inline", "--json"])
        .output()
        .expect("validation should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["summary"]["type"], "error");
    assert_eq!(json["detailed_messages"], serde_json::json!([]));
    assert_eq!(json["error_count"], 1);
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_json_shows_defaults() {
    let dir = TempDir::new().expect("temp dir");

    let output = ctree_cmd(dir.path())
        .args(["config", "--json"])
        .output()
        .expect("config should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["project"]["roots"]["use_parent_category"], true);
    assert_eq!(json["resolved_output"], "json");
}

#[test]
fn config_reports_the_format_flag_over_env() {
    let dir = TempDir::new().expect("temp dir");

    let output = ctree_cmd(dir.path())
        .args(["--format", "json", "config"])
        .output()
        .expect("config should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["resolved_output"], "json");
}

#[test]
fn config_text_reports_env_format() {
    let dir = TempDir::new().expect("temp dir");

    ctree_cmd(dir.path())
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("output=text\n"));
}

#[test]
fn project_output_format_is_used_without_env() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join(".coursetree")).expect("config dir");
    write_file(dir.path(), ".coursetree/config.toml", "[output]\nformat = \"json\"\n");

    let output = ctree_cmd(dir.path())
        .env_remove("FORMAT")
        .args(["config"])
        .output()
        .expect("config should not crash");
    let json = json_stdout(&output);

    assert_eq!(json["project"]["output"]["format"], "json");
    assert_eq!(json["resolved_output"], "json");
}

#[test]
fn missing_input_named_config_toml_is_an_input_error() {
    let dir = TempDir::new().expect("temp dir");

    ctree_cmd(dir.path())
        .args(["roots", "config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"));
}

#[test]
fn malformed_config_fails_with_code() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join(".coursetree")).expect("config dir");
    write_file(dir.path(), ".coursetree/config.toml", "[roots\n");

    ctree_cmd(dir.path())
        .args(["config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"));
}
