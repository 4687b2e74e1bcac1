//! Integration tests driving the tplconv binary
//!
//! `cat` and `false` stand in for a real template converter.
#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_tplconv(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tplconv"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run tplconv")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_converts_tree_with_cat() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write_file(&src.join("x.tpl"), "h1 x");
    write_file(&src.join("sub/y.tpl"), "h1 y");

    let output = run_tplconv(&[
        src.to_str().unwrap(),
        dest.to_str().unwrap(),
        "--converter",
        "cat",
        "--ext",
        "html",
    ]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(fs::read_to_string(dest.join("x.html")).unwrap(), "h1 x");
    assert_eq!(fs::read_to_string(dest.join("sub/y.html")).unwrap(), "h1 y");
    assert!(stdout(&output).contains("✓"), "stdout={}", stdout(&output));
}

#[test]
fn test_failed_files_exit_nonzero_with_count() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write_file(&src.join("a.tpl"), "a");
    write_file(&src.join("nested/b.tpl"), "b");

    let output = run_tplconv(&[
        src.to_str().unwrap(),
        dest.to_str().unwrap(),
        "--converter",
        "false",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Had 2 errors"), "stderr={}", err);
    assert!(err.contains("[convert]"), "stderr={}", err);
    assert!(!dest.join("a.tpl").exists());
}

#[test]
fn test_missing_arguments_is_usage_error() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    write_file(&src.join("a.tpl"), "a");

    let output = run_tplconv(&[src.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("DEST"), "stderr={}", stderr(&output));
}

#[test]
fn test_missing_source_fails() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("nope");
    let dest = tmp.path().join("dest");

    let output = run_tplconv(&[src.to_str().unwrap(), dest.to_str().unwrap(), "--converter", "cat"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("does not exist"), "stderr={}", stderr(&output));
    assert!(!dest.exists());
}

#[test]
fn test_json_report() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write_file(&src.join("one.pug"), "p one");
    write_file(&src.join("two/two.pug"), "p two");

    let output = run_tplconv(&[
        src.to_str().unwrap(),
        dest.to_str().unwrap(),
        "--converter",
        "cat",
        "--json",
        "--parallel",
    ]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], true);
    assert_eq!(report["converted"].as_array().unwrap().len(), 2);
    assert_eq!(report["statistics"]["files_written"], 2);
    assert_eq!(report["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_options_forwarded_to_converter() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    let dest = tmp.path().join("dest");
    write_file(&src.join("page.pug"), "p");

    let script = "printf '%s;%s;%s;%s' \"$TPLCONV_PRETTY\" \"$TPLCONV_INDENT\" \"$TPLCONV_LEFT_DELIM\" \"$TPLCONV_RIGHT_DELIM\"";
    let output = run_tplconv(&[
        src.to_str().unwrap(),
        dest.to_str().unwrap(),
        "--converter",
        "sh",
        "--converter-arg",
        "-c",
        "--converter-arg",
        script,
        "--pretty",
        "--indent-str",
        "    ",
        "--left-delim",
        "{{",
        "--right-delim",
        "}}",
        "--quiet",
    ]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert_eq!(
        fs::read_to_string(dest.join("page.pug")).unwrap(),
        "1;    ;{{;}}"
    );
}

#[test]
fn test_stats_output() {
    let tmp = tempdir().unwrap();
    let src = tmp.path().join("src");
    write_file(&src.join("a.pug"), "abc");

    let output = run_tplconv(&[
        src.to_str().unwrap(),
        tmp.path().join("dest").to_str().unwrap(),
        "--converter",
        "cat",
        "--stats",
    ]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Conversion Statistics:"), "stdout={}", out);
    assert!(out.contains("Files written: 1"), "stdout={}", out);
}
