use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const CAPTURE: &str = r#"{
  "log": {
    "entries": [
      {
        "startedDateTime": "2024-05-01T10:00:00.000Z",
        "request": {
          "method": "GET",
          "url": "https://api.test/users?page=2",
          "httpVersion": "h2",
          "headers": [
            { "name": ":authority", "value": "api.test" },
            { "name": "accept", "value": "application/json" }
          ]
        }
      },
      {
        "startedDateTime": "2024-05-01T10:00:01.000Z",
        "request": {
          "method": "GET",
          "url": "https://cdn.test/static/app.js?v=3",
          "httpVersion": "HTTP/1.1",
          "headers": []
        }
      },
      {
        "startedDateTime": "2024-05-01T10:00:02.000Z",
        "request": {
          "method": "POST",
          "url": "http://api.test/login",
          "httpVersion": "HTTP/1.1",
          "headers": [
            { "name": "Host", "value": "api.test" },
            { "name": "Content-Type", "value": "application/json" }
          ],
          "postData": { "mimeType": "application/json", "text": "{\"user\":\"ada\",\"remember\":true}" }
        }
      }
    ]
  }
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("capture.har"), CAPTURE).unwrap();
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("repeater");
        cmd.env_remove("RUST_LOG")
            .env_remove("REPEATER_CAPTURE")
            .env_remove("REPEATER_LOG_LEVEL")
            .env_remove("REPEATER_LOG_FILE")
            .arg("--config")
            .arg(self.dir.path().join("missing.toml"));
        cmd
    }

    fn dump(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg(self.dir.path().join("capture.har")).arg("--dump");
        cmd
    }
}

#[test]
fn test_dump_prints_admitted_requests_in_order() {
    let fixture = Fixture::new();
    let output = fixture.dump().assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(!stdout.contains("app.js"));
    let first = stdout.find("### 0").unwrap();
    let second = stdout.find("### 1").unwrap();
    assert!(first < second);
    assert!(stdout.contains("GET /users?page=2 HTTP/2\n"));
    assert!(stdout.contains(":authority: api.test\n"));
    assert!(stdout.contains("POST /login HTTP/1.1\nHost: api.test\nContent-Type: application/json\n\n{\n  \"user\": \"ada\",\n  \"remember\": true\n}"));
}

#[test]
fn test_dump_plain_search_is_case_insensitive() {
    let fixture = Fixture::new();
    fixture
        .dump()
        .args(["--search", "ADA"])
        .assert()
        .success()
        .stdout(contains("POST /login").and(contains("GET /users").not()));
}

#[test]
fn test_dump_category_filter() {
    let fixture = Fixture::new();
    fixture
        .dump()
        .args(["--category", "get"])
        .assert()
        .success()
        .stdout(contains("GET /users").and(contains("POST /login").not()));
}

#[test]
fn test_dump_regex_search() {
    let fixture = Fixture::new();
    fixture
        .dump()
        .args(["--regex", "--search", r"page=\d+"])
        .assert()
        .success()
        .stdout(contains("### 0").and(contains("### 1").not()));
}

#[test]
fn test_dump_invalid_regex_matches_nothing() {
    let fixture = Fixture::new();
    fixture
        .dump()
        .args(["--regex", "--search", "(unclosed"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(contains("invalid regex"));
}

#[test]
fn test_missing_capture_is_an_error() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg(fixture.dir.path().join("nope.har"))
        .arg("--dump")
        .assert()
        .failure()
        .stderr(contains("failed to read capture"));
}

#[test]
fn test_generate_config_prints_defaults() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("--generate-config")
        .assert()
        .success()
        .stdout(contains("request_timeout = \"30s\"").and(contains("history_limit = 100")));
}
