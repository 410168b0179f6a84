use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use assert_cmd::prelude::*;
use tempfile::TempDir;

fn snask() -> Command {
    Command::cargo_bin("snask").unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn usage_without_args() {
    let out = snask().output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage: snask"));
}

#[test]
fn unknown_command_is_usage_error() {
    let out = snask().arg("frobnicate").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown command: frobnicate"));
}

#[test]
fn json_fmt_pretty_prints() {
    let dir = TempDir::new().unwrap();
    let f = write_file(&dir, "doc.json", r#"{"a":[1,2],"b":{"c":null}}"#);
    let out = snask().args(["json", "fmt"]).arg(&f).output().unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "{\n  \"a\": {\n    \"0\": 1,\n    \"1\": 2\n  },\n  \"b\": {\n    \"c\": null\n  }\n}\n"
    );
}

#[test]
fn json_fmt_reports_parse_errors() {
    let dir = TempDir::new().unwrap();
    let f = write_file(&dir, "bad.json", "{\"a\": }");
    let out = snask().args(["json", "fmt"]).arg(&f).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("at byte 6"));
}

#[test]
fn json_fmt_requires_file() {
    let out = snask().args(["json", "fmt"]).output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Missing <file>"));
}

#[test]
fn json_get_follows_paths() {
    let dir = TempDir::new().unwrap();
    let f = write_file(&dir, "doc.json", r#"{"a":{"b":[10,20,30]}}"#);
    let out = snask().args(["json", "get"]).arg(&f).arg("a.b.1").output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "20\n");

    let out = snask().args(["json", "get"]).arg(&f).arg("a.x").output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("'x'"));
}

#[test]
fn serve_rejects_bad_port() {
    let dir = TempDir::new().unwrap();
    let f = write_file(&dir, "routes.json", "{}");
    let out = snask().arg("serve").arg(&f).arg("nope").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid port: nope"));
}

#[test]
fn serve_answers_health_checks() {
    let dir = TempDir::new().unwrap();
    let f = write_file(
        &dir,
        "routes.json",
        r#"{"GET /health": {"handler": "health"}, "/": "home"}"#,
    );
    let mut child = snask()
        .arg("serve")
        .arg(&f)
        .arg("0")
        .env("BLAZE_HOST", "127.0.0.1")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut line = String::new();
    BufReader::new(child.stdout.take().unwrap())
        .read_line(&mut line)
        .unwrap();
    let addr = line
        .trim()
        .strip_prefix("blaze listening on http://")
        .unwrap()
        .to_string();

    let mut stream = TcpStream::connect(&addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(b"GET /health HTTP/1.1\r\n\r\n").unwrap();
    let mut resp = String::new();
    stream.read_to_string(&mut resp).unwrap();
    child.kill().unwrap();
    let _ = child.wait();

    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(resp.ends_with("\r\n\r\n{\"status\":\"ok\"}"));
}
