//! Integration tests for the `dl` CLI.
//!
//! Each test points `dl` at a temp data directory, runs it as a subprocess,
//! and verifies stdout and/or the snapshot file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `dl` binary.
fn dl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dl"))
}

/// Run `dl -C <dir>` with the given args, returning (stdout, stderr, success).
fn run_dl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dl_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("DAYLIST_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dl` expecting success, return stdout.
fn run_dl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dl(dir, args);
    if !success {
        panic!(
            "dl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run a command that prints a new id and return it.
fn add(dir: &Path, args: &[&str]) -> String {
    run_dl_ok(dir, args).trim().to_string()
}

fn list_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut all = vec!["list", "--json"];
    all.extend_from_slice(args);
    serde_json::from_str(&run_dl_ok(dir, &all)).unwrap()
}

fn names(tasks: &serde_json::Value) -> Vec<String> {
    tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[test]
fn test_empty_list() {
    let tmp = TempDir::new().unwrap();
    let out = run_dl_ok(tmp.path(), &["list"]);
    assert!(out.contains("no groups yet"));
    assert!(!tmp.path().join("daylist.json").exists());
}

#[test]
fn test_group_add_creates_snapshot() {
    let tmp = TempDir::new().unwrap();
    let id = add(tmp.path(), &["group", "add", "Morning"]);
    assert_eq!(id.len(), 36);

    let text = fs::read_to_string(tmp.path().join("daylist.json")).unwrap();
    assert!(text.contains("\"name\": \"Morning\""));
    assert!(text.contains("\"isOpen\": true"));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_group_rename_mv_rm() {
    let tmp = TempDir::new().unwrap();
    let g1 = add(tmp.path(), &["group", "add", "Morning"]);
    let g2 = add(tmp.path(), &["group", "add", "Evening"]);

    run_dl_ok(tmp.path(), &["group", "rename", &g1[..8], "Sunrise"]);
    run_dl_ok(tmp.path(), &["group", "mv", &g2, &g1]);
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups), vec!["Evening", "Sunrise"]);

    let out = run_dl_ok(tmp.path(), &["group", "rm", &g2]);
    assert_eq!(out.trim(), format!("deleted {}", g2));
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups), vec!["Sunrise"]);
}

#[test]
fn test_blank_group_name_rejected() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_dl(tmp.path(), &["group", "add", "   "]);
    assert!(!success);
    assert!(stderr.contains("name cannot be empty"));
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn test_add_nested_and_list_text() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    add(tmp.path(), &["add", &g, "Pans", "--parent", &t1]);
    add(tmp.path(), &["add", &g, "Laundry"]);

    let out = run_dl_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with(" Home"));
    assert!(lines[1].starts_with("  - [ ] "));
    assert!(lines[1].ends_with(" Kitchen"));
    assert!(lines[2].starts_with("    - [ ] "));
    assert!(lines[2].ends_with(" Pans"));
    assert!(lines[3].ends_with(" Laundry"));
}

#[test]
fn test_done_propagates_to_subtasks() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    add(tmp.path(), &["add", &g, "Pans", "--parent", &t1]);

    let out = run_dl_ok(tmp.path(), &["done", &t1]);
    assert_eq!(out.trim(), format!("{} done", t1));

    let groups = list_json(tmp.path(), &[]);
    let kitchen = &groups[0]["tasks"][0];
    assert_eq!(kitchen["completion"], "done_today");
    assert_eq!(kitchen["tasks"][0]["completion"], "done_today");

    let out = run_dl_ok(tmp.path(), &["done", &t1]);
    assert_eq!(out.trim(), format!("{} open", t1));
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(groups[0]["tasks"][0]["tasks"][0]["completion"], "open");
}

#[test]
fn test_hide_removes_from_list_until_tomorrow() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    add(tmp.path(), &["add", &g, "Pans", "--parent", &t1]);
    add(tmp.path(), &["add", &g, "Laundry"]);

    let out = run_dl_ok(tmp.path(), &["hide", &t1]);
    assert!(out.contains("hidden until"));

    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups[0]["tasks"]), vec!["Laundry"]);

    let groups = list_json(tmp.path(), &["--all"]);
    assert_eq!(names(&groups[0]["tasks"]), vec!["Kitchen", "Laundry"]);
    assert!(groups[0]["tasks"][0]["hidden_until"].is_string());
}

#[test]
fn test_show_hidden_from_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[view]\nshow_hidden = true\n").unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    run_dl_ok(tmp.path(), &["hide", &t1]);

    let out = run_dl_ok(tmp.path(), &["list"]);
    assert!(out.contains("Kitchen (hidden until "));
}

#[test]
fn test_storage_file_from_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[storage]\nfile = \"lists/today.json\"\n")
        .unwrap();
    add(tmp.path(), &["group", "add", "Home"]);
    assert!(tmp.path().join("lists/today.json").exists());
    assert!(!tmp.path().join("daylist.json").exists());
}

#[test]
fn test_mv_reorders_siblings() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let a = add(tmp.path(), &["add", &g, "A"]);
    add(tmp.path(), &["add", &g, "B"]);
    let c = add(tmp.path(), &["add", &g, "C"]);

    run_dl_ok(tmp.path(), &["mv", &g, &c, &a]);
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups[0]["tasks"]), vec!["C", "A", "B"]);

    let text = fs::read_to_string(tmp.path().join("daylist.json")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&text).unwrap();
    let orders: Vec<u64> = stored[0]["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["order"].as_u64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[test]
fn test_rm_removes_subtree() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    let t1a = add(tmp.path(), &["add", &g, "Pans", "--parent", &t1]);
    add(tmp.path(), &["add", &g, "Laundry"]);

    let out = run_dl_ok(tmp.path(), &["rm", &t1]);
    assert_eq!(out.trim(), format!("deleted {}", t1));

    let text = fs::read_to_string(tmp.path().join("daylist.json")).unwrap();
    assert!(!text.contains(&t1a));
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups[0]["tasks"]), vec!["Laundry"]);
}

#[test]
fn test_close_and_open() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    add(tmp.path(), &["add", &g, "Pans", "--parent", &t1]);

    run_dl_ok(tmp.path(), &["close", &t1]);
    let out = run_dl_ok(tmp.path(), &["list"]);
    assert!(out.contains("Kitchen +"));
    assert!(!out.contains("Pans"));

    run_dl_ok(tmp.path(), &["open", &t1]);
    let out = run_dl_ok(tmp.path(), &["list"]);
    assert!(out.contains("Pans"));
}

#[test]
fn test_rename_task() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    run_dl_ok(tmp.path(), &["rename", &t1, "Scullery"]);
    let groups = list_json(tmp.path(), &[]);
    assert_eq!(names(&groups[0]["tasks"]), vec!["Scullery"]);
}

#[test]
fn test_parent_must_be_in_group() {
    let tmp = TempDir::new().unwrap();
    let g1 = add(tmp.path(), &["group", "add", "Home"]);
    let g2 = add(tmp.path(), &["group", "add", "Work"]);
    let t1 = add(tmp.path(), &["add", &g1, "Kitchen"]);

    let (_, stderr, success) = run_dl(tmp.path(), &["add", &g2, "Pans", "--parent", &t1]);
    assert!(!success);
    assert!(stderr.contains("is not in group"));
}

// ---------------------------------------------------------------------------
// Id resolution
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_id_is_an_error() {
    let tmp = TempDir::new().unwrap();
    add(tmp.path(), &["group", "add", "Home"]);
    let (_, stderr, success) = run_dl(tmp.path(), &["done", "zzzz"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("zzzz"));
}

#[test]
fn test_group_id_is_not_a_task() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let (_, _, success) = run_dl(tmp.path(), &["done", &g]);
    assert!(!success);
}

// ---------------------------------------------------------------------------
// Search and check
// ---------------------------------------------------------------------------

#[test]
fn test_search() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    let t1 = add(tmp.path(), &["add", &g, "Kitchen"]);
    let t1a = add(tmp.path(), &["add", &g, "Wash pans", "--parent", &t1]);
    add(tmp.path(), &["add", &g, "Laundry"]);

    let out = run_dl_ok(tmp.path(), &["search", "(?i)pans"]);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("Home > Kitchen > Wash pans"));

    let hits: serde_json::Value =
        serde_json::from_str(&run_dl_ok(tmp.path(), &["search", "pans", "--json"])).unwrap();
    assert_eq!(hits[0]["task_id"], t1a.as_str());
    assert_eq!(hits[0]["group_id"], g.as_str());
}

#[test]
fn test_invalid_regex() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_dl(tmp.path(), &["search", "(unclosed"]);
    assert!(!success);
    assert!(stderr.contains("invalid regex"));
}

#[test]
fn test_check_valid() {
    let tmp = TempDir::new().unwrap();
    let g = add(tmp.path(), &["group", "add", "Home"]);
    add(tmp.path(), &["add", &g, "Kitchen"]);
    let out = run_dl_ok(tmp.path(), &["check"]);
    assert!(out.contains("checklist is valid"));
}

#[test]
fn test_check_reports_gaps_and_duplicates() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("daylist.json"),
        r#"[{"id":"g1","name":"Home","order":0,"isOpen":true,"tasks":[
            {"id":"t1","name":"A","order":0,"hiddenUntil":null,"completedDate":null,"isOpen":true,"tasks":[]},
            {"id":"t1","name":"B","order":1,"hiddenUntil":null,"completedDate":null,"isOpen":true,"tasks":[]}
        ]}]"#,
    )
    .unwrap();

    let out = run_dl_ok(tmp.path(), &["check", "--json"]);
    let result: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(result["valid"], false);
    assert_eq!(result["errors"][0]["type"], "duplicate_id");
    assert_eq!(result["errors"][0]["id"], "t1");

    let out = run_dl_ok(tmp.path(), &["check"]);
    assert!(out.contains("t1 is used by 2 nodes"));
    assert!(out.contains("checklist has errors"));
}

#[test]
fn test_malformed_snapshot_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("daylist.json"), "{ nope").unwrap();
    let (_, stderr, success) = run_dl(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("could not parse"));
}
