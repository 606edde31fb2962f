//
//  sonar-web-api
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::path::Path;

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use tempfile::TempDir;

fn sq(config_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sq"));
    cmd.env("SQ_CONFIG", config_dir.join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("SQ_SERVER")
        .env_remove("SQ_PROJECT")
        .env_remove("SQ_DEBUG");
    cmd
}

const BRANCHES: &str = r#"{
    "branches": [
        {
            "name": "master",
            "isMain": true,
            "type": "LONG",
            "analysisDate": "2017-04-03T13:37:00+0100",
            "status": { "qualityGateStatus": "OK" }
        }
    ]
}"#;

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("branches and measures"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "sq version {}",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    sq(dir.path())
        .args(["config", "set", "url", "sonar.example.com/"])
        .assert()
        .success();

    sq(dir.path())
        .args(["config", "get", "url"])
        .assert()
        .success()
        .stdout("https://sonar.example.com\n");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_branch_list_without_server_fails() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "list", "--project", "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_branch_list_json() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/project_branches/list")
        .match_query(Matcher::UrlEncoded("project".into(), "demo".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(BRANCHES)
        .create();

    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "list", "--json", "--project", "demo", "--server"])
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"master\""))
        .stdout(predicate::str::contains("2734").not());

    mock.assert();
}

#[test]
fn test_branch_list_mock_mode_appends_samples() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/project_branches/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(BRANCHES)
        .create();

    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "list", "--json", "--mock", "--project", "demo", "--server"])
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"2734\""))
        .stdout(predicate::str::contains("\"id\": \"9999\""));
}

#[test]
fn test_branch_list_not_found_exit_code() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/project_branches/list")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"errors":[{"msg":"Project 'ghost' not found"}]}"#)
        .create();

    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "list", "--project", "ghost", "--server"])
        .arg(server.url())
        .assert()
        .code(8)
        .stderr(predicate::str::starts_with("error:"))
        .stderr(predicate::str::contains("Project 'ghost' not found"));
}

#[test]
fn test_branch_delete_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "delete", "--branch", "feature", "--project", "demo"])
        .args(["--server", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));
}

#[test]
fn test_branch_delete_requires_a_target() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "delete", "--yes", "--project", "demo"])
        .args(["--server", "http://127.0.0.1:9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_branch_delete_rejects_both_targets() {
    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "delete", "--yes", "--project", "demo"])
        .args(["--branch", "feat", "--pull-request", "42"])
        .args(["--server", "http://127.0.0.1:9"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_branch_delete_pull_request() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/project_branches/delete")
        .match_body("project=demo&pullRequest=42")
        .with_status(204)
        .create();

    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["branch", "delete", "--yes", "--project", "demo", "--pull-request", "42"])
        .arg("--server")
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted pull request 42 of demo"));

    mock.assert();
}

#[test]
fn test_measure_get_uses_default_project() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/measures/component")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("componentKey".into(), "demo".into()),
            Matcher::UrlEncoded("metricKeys".into(), "bugs,coverage".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"component":{"key":"demo","name":"Demo","qualifier":"TRK","measures":[
                {"metric":"bugs","value":"12"},{"metric":"coverage","value":"81.4"}]}}"#,
        )
        .create();

    let dir = TempDir::new().unwrap();
    sq(dir.path())
        .args(["config", "set", "default_project", "demo"])
        .assert()
        .success();

    sq(dir.path())
        .args(["measure", "get", "-m", "bugs,coverage", "--json", "--server"])
        .arg(server.url())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": \"81.4\""));

    mock.assert();
}
