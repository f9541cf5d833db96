use assert_cmd::Command;
use predicates::prelude::*;

fn chatrelay() -> Command {
    let mut cmd = Command::cargo_bin("chatrelay").expect("binary built");
    cmd.env_remove("RUST_LOG").env_remove("CHATRELAY_URL");
    cmd
}

#[test]
fn version_prints_package_version() {
    chatrelay()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn blank_prompt_is_refused() {
    chatrelay()
        .args(["chat", "   "])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("prompt is empty"));
}

#[test]
fn unreachable_gateway_reports_error() {
    chatrelay()
        .args(["chat", "Hello", "--stream", "--server", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn missing_prompt_is_a_usage_error() {
    chatrelay().arg("chat").assert().failure();
}
