// Drives the compiled `doodle` binary. Every invocation gets its own
// --db/--config so nothing touches the user's real journal.

use std::path::Path;
use std::process::Output;

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

const CIRCLE: &str = r##"[{"color":"#ff0000","width":3,"points":[
  {"x":150,"y":100},{"x":135.36,"y":135.36},{"x":100,"y":150},{"x":64.64,"y":135.36},
  {"x":50,"y":100},{"x":64.64,"y":64.64},{"x":100,"y":50},{"x":135.36,"y":64.64},
  {"x":150,"y":100}]}]"##;

fn doodle(dir: &TempDir, args: &[&str]) -> Output {
    let db = dir.path().join("journal.db");
    let config = dir.path().join("config.json");
    Command::cargo_bin("doodle")
        .unwrap()
        .arg("--db")
        .arg(&db)
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("OPENAI_API_KEY")
        .output()
        .unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path.display().to_string()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn analyze_empty_sketch() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "empty.json", "[]");
    let out = doodle(&dir, &["analyze", &file]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.starts_with("No strokes drawn.\n"));
    assert!(text.contains("No shapes confidently detected yet."));
}

#[test]
fn analyze_json_report() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "circle.json", CIRCLE);
    let out = doodle(&dir, &["analyze", &file, "--json", "--width", "400", "--height", "400"]);
    assert!(out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["metrics"]["strokeCount"], 1);
    assert_eq!(report["metrics"]["hasStrokes"], true);
    assert_eq!(report["metrics"]["dominantArea"], "top");
    assert_eq!(report["shapes"][0]["type"], "circle-like");
    assert_eq!(report["shapes"][0]["color"], "#ff0000");
    assert!(report["summary"]
        .as_str()
        .unwrap()
        .ends_with("1 × circle-like"));
}

#[test]
fn analyze_rejects_malformed_file() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "bad.json", "{not json");
    let out = doodle(&dir, &["analyze", &file]);
    assert!(!out.status.success());
}

#[test]
fn save_show_feedback_export_roundtrip() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "circle.json", CIRCLE);

    let out = doodle(
        &dir,
        &["save", &file, "--date", "2026-10-17", "--mood", "calm", "--no-reflect"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(stdout(&out).contains("Saved journal entry for 2026-10-17."));

    let out = doodle(&dir, &["show", "--date", "2026-10-17"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Mood: 😌 calm"));
    assert!(text.contains("Stroke count: 1"));
    assert!(text.contains("1. circle-like – red"));

    // nothing to rate without a reflection
    let out = doodle(&dir, &["feedback", "like", "--date", "2026-10-17"]);
    assert!(!out.status.success());

    let csv_path = dir.path().join("out.csv");
    let out = doodle(&dir, &["export", "--output", &csv_path.display().to_string()]);
    assert!(out.status.success());
    let csv = std::fs::read_to_string(csv_path).unwrap();
    assert!(csv.starts_with("date,mood_emoji,summary,reflection,encouragement,updated_at\n"));
    assert!(csv.contains("2026-10-17,😌,"));
}

#[test]
fn save_without_api_key_saves_nothing() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "circle.json", CIRCLE);
    let out = doodle(&dir, &["save", &file, "--date", "2026-10-18"]);
    assert!(!out.status.success());

    let out = doodle(&dir, &["show", "--date", "2026-10-18"]);
    assert!(stdout(&out).contains("No journal entry for 2026-10-18."));
}

#[test]
fn mood_command_and_bad_date() {
    let dir = tempdir().unwrap();
    let out = doodle(&dir, &["mood", "sad", "--date", "2026-10-19"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Mood for 2026-10-19: 😢 sad"));

    let out = doodle(&dir, &["mood", "sad", "--date", "19.10.2026"]);
    assert!(!out.status.success());
}
