use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: shopchat <COMMAND>"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_cli_serve_help() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: shopchat serve"))
        .stdout(predicate::str::contains("--port <PORT>"))
        .stdout(predicate::str::contains("--backend-url <BACKEND_URL>"))
        .stdout(predicate::str::contains("--layout <LAYOUT>"))
        .stdout(predicate::str::contains("plain"))
        .stdout(predicate::str::contains("rich"))
        .stdout(predicate::str::contains("--overlap <OVERLAP>"))
        .stdout(predicate::str::contains("--templates <TEMPLATES>"));
}

#[test]
fn test_cli_chat_help() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.arg("chat")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: shopchat chat"))
        .stdout(predicate::str::contains("--currency <CURRENCY>"));
}

#[test]
fn test_cli_rejects_unknown_layout() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.args(["chat", "--layout", "fancy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'fancy'"));
}

#[test]
fn test_cli_chat_quits_on_command() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.args(["chat", "--backend-url", "http://127.0.0.1:1"])
        .write_stdin("/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bot: Hello! I'm your AI shopping assistant."));
}

#[test]
fn test_cli_defaults_come_from_environment() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.args(["serve", "--help"])
        .env("SHOPCHAT_BACKEND_URL", "http://shop.internal:8080")
        .env("SHOPCHAT_CURRENCY", "$")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: http://shop.internal:8080]"))
        .stdout(predicate::str::contains("[default: $]"));
}

#[test]
fn test_cli_no_command() {
    let mut cmd = Command::cargo_bin("shopchat").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage: shopchat <COMMAND>"));
}
