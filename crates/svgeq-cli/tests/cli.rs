//! Runs the `svgeq` binary end to end

use std::path::PathBuf;
use std::process::{Command, Output};

fn write_document(name: &str, json: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn svgeq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svgeq"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

#[test]
fn repeated_failures_are_reported_once() {
    let path = write_document(
        "repeated_failures.json",
        r#"{ "svg": { "children": [
            { "type": "rect", "x": "q", "width": "2" },
            { "type": "rect", "x": "q", "width": "3" },
            { "type": "rect", "x": "q", "width": "4" }
        ] } }"#,
    );
    let out = svgeq(&[path.to_str().unwrap()]);
    assert!(out.status.success());

    let stderr = String::from_utf8(out.stderr).unwrap();
    let lines: Vec<&str> = stderr.lines().collect();
    assert_eq!(lines, vec!["warning: <rect> x: undefined variable: q"]);

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.matches("<rect").count(), 3);
    assert!(stdout.contains(r#"<rect width="4"/>"#), "{stdout}");
}

#[test]
fn eval_prints_the_number() {
    let out = svgeq(&["eval", "(w+20)/2", "w=80"]);
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "50\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn eval_failure_exits_nonzero() {
    let out = svgeq(&["eval", "nope+1"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("undefined variable: nope"));
}
