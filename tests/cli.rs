use assert_cmd::prelude::*;
use mockito::Matcher;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const TITLES_REPLY: &str = r#"{"choices":[{"message":{"content":"1. Hope Hero!\n2. \"Kindness Captain\"\n3. Community Champion\n4. Good Guardian\n5. Bright Beacon\n6. Extra Line"}}]}"#;

fn write_config(dir: &Path, upstream: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!(
        "openai_api_key: test-key\nregistry_url: {upstream}\nopenai_url: {upstream}\nrate_limit_per_second: 50\n"
    );
    fs::write(&path, contents).expect("failed to write config");
    path
}

/// The binary with a clean environment and the given config file
fn goodbadger(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("goodbadger"));
    cmd.arg("--config")
        .arg(config)
        .env_remove("GOODBADGER_CONFIG")
        .env_remove("GOODBADGER_FORMAT")
        .env_remove("GOODBADGER_REGISTRY_URL")
        .env_remove("GOODBADGER_OPENAI_URL")
        .env_remove("GOODBADGER_PORT")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn status_reports_custom_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "http://127.0.0.1:9");

    let assert = goodbadger(&config_path).arg("status").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("OpenAI API key configured"));
    assert!(stdout.contains("Image store: inline"));

    Ok(())
}

#[test]
fn explicit_missing_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    goodbadger(&temp.path().join("nope.yaml"))
        .args(["search", "food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("goodbadger init"));

    Ok(())
}

#[test]
fn search_prints_json_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/search.json")
        .match_query(Matcher::UrlEncoded("q".into(), "food bank".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"organizations":[{"ein":421234567,"name":"Food Bank of Iowa","city":"Des Moines","state":"IA"}]}"#,
        )
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    let assert = goodbadger(&config_path)
        .args(["search", "food bank", "--format", "json"])
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(json["data"][0]["ein"], "421234567");
    assert_eq!(json["data"][0]["name"], "Food Bank of Iowa");
    assert!(json["meta"]["version"].is_string());

    Ok(())
}

#[test]
fn search_table_output() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"organizations":[{"ein":"12","name":"Foodshare","state":"CT"}]}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    goodbadger(&config_path)
        .args(["search", "foodshare"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foodshare").and(predicate::str::contains("EIN")));

    Ok(())
}

#[test]
fn search_upstream_failure_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _search = server
        .mock("GET", "/search.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    goodbadger(&config_path)
        .args(["search", "food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Search failed"));

    Ok(())
}

#[test]
fn lookup_not_found_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _lookup = server
        .mock("GET", "/organizations/999999999.json")
        .with_status(404)
        .with_body("Not Found")
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    goodbadger(&config_path)
        .args(["lookup", "99-9999999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    Ok(())
}

#[test]
fn titles_are_cleaned_and_capped() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let chat = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::PartialJson(serde_json::json!({ "max_tokens": 100 })))
        .with_status(200)
        .with_body(TITLES_REPLY)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    let assert = goodbadger(&config_path)
        .args(["titles", "Alpha Fund", "Beta Trust", "--format", "json"])
        .assert()
        .success();

    chat.assert();

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    let titles = json["data"].as_array().expect("titles array");
    assert_eq!(titles.len(), 5);
    assert_eq!(titles[0], "Hope Hero");
    assert_eq!(titles[1], "Kindness Captain");

    Ok(())
}

#[test]
fn titles_without_api_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = temp.path().join("config.yaml");
    fs::write(&config_path, "registry_url: http://127.0.0.1:9\n")?;

    goodbadger(&config_path)
        .args(["titles", "Alpha Fund"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    Ok(())
}

#[test]
fn badge_writes_png() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _image = server
        .mock("POST", "/images/generations")
        .match_body(Matcher::PartialJson(serde_json::json!({ "size": "1024x1024", "n": 1 })))
        .with_status(200)
        .with_body(r#"{"data":[{"b64_json":"aGVsbG8="}]}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());
    let png = temp.path().join("badge.png");

    goodbadger(&config_path)
        .args(["badge", "Hope Hero", "--out"])
        .arg(&png)
        .assert()
        .success()
        .stdout(predicate::str::contains("inline PNG"));

    assert_eq!(fs::read(&png)?, b"hello");

    Ok(())
}

#[test]
fn completion_generates_script() {
    Command::new(assert_cmd::cargo::cargo_bin!("goodbadger"))
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goodbadger"));
}
