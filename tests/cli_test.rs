use assert_cmd::Command;

#[test]
fn help_lists_the_check_version_command() {
    let assert = Command::cargo_bin("pysemver").unwrap().arg("--help").assert();
    let output = assert.success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("check-version"));
}

#[test]
fn check_version_help_documents_the_revision_flags() {
    let assert = Command::cargo_bin("pysemver")
        .unwrap()
        .args(["check-version", "--help"])
        .assert();
    let output = assert.success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("--this"));
    assert!(stdout.contains("--that"));
    assert!(stdout.contains("--ignore"));
}

#[test]
fn an_unknown_subcommand_fails() {
    Command::cargo_bin("pysemver")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
