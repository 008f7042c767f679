use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn sample_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("samples")
        .join(name)
}

#[test]
fn prints_trace_then_tree() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("countdown.calc"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.first(), Some(&"predict program --> stmt_list eof"));
    assert_eq!(lines[lines.len() - 2], "matched eof");
    assert!(lines[lines.len() - 1].starts_with("(program(read \"n\")(while"));
}

#[test]
fn tree_only() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("countdown.calc")).arg("--no-trace");

    cmd.assert().success().stdout(
        predicate::str::starts_with("(program")
            .and(predicate::str::contains("predict").not()),
    );
}

#[test]
fn reads_stdin() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg("-").arg("--no-trace").write_stdin("read a write a");

    cmd.assert()
        .success()
        .stdout("(program(read \"a\")(write (id \"a\"))])\n");
}

#[test]
fn syntax_errors_do_not_fail_by_default() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("malformed.calc")).arg("--no-tree");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("syntax error found in: factor_tail"));
}

#[test]
fn fail_on_error_sets_exit_status() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("malformed.calc")).arg("--fail-on-error");

    cmd.assert().code(1);
}

#[test]
fn fail_on_error_from_config_file() {
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(config, "[diagnostics]\nfail_on_error = true").unwrap();

    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("malformed.calc"))
        .arg("--config")
        .arg(config.path());

    cmd.assert().code(1);
}

#[test]
fn json_format() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("gcd.calc"))
        .arg("--no-trace")
        .arg("--format")
        .arg("tree-json");

    cmd.assert().success().stdout(
        predicate::str::contains("\"type\": \"while\"")
            .and(predicate::str::contains("\"errors\": []")),
    );
}

#[test]
fn token_format() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg("-").arg("-f").arg("token-simple").write_stdin("x := 1");

    cmd.assert()
        .success()
        .stdout("id: x\ngets\nliteral: 1\neof\n");
}

#[test]
fn unknown_format_exits_with_two() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg(sample_path("gcd.calc")).arg("--format").arg("tree-xml");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Available formats"));
}

#[test]
fn missing_file_exits_with_two() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg("/definitely/not/here.calc");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn lists_formats() {
    let mut cmd = cargo_bin_cmd!("calcparse");
    cmd.arg("--list-formats");

    cmd.assert().success().stdout(
        predicate::str::contains("tree-sexpr")
            .and(predicate::str::contains("tree-yaml"))
            .and(predicate::str::contains("token-json")),
    );
}
