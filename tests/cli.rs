use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_hsh(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_hsh"))
        .args(args)
        .env_clear()
        .env("PATH", "/usr/bin:/bin")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn exit_ends_session_quietly() {
    let output = run_hsh(&[], "exit\n");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}

#[test]
fn unknown_command_is_reported_with_line_number() {
    let output = run_hsh(&[], "\nnosuchcommand arg\n");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.ends_with(": 2: nosuchcommand: not found\n"),
        "{:?}",
        stdout
    );
}

#[test]
fn external_command_output_reaches_stdout() {
    let output = run_hsh(&[], "/bin/echo one two\nenv\n");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "one two\nPATH=/usr/bin:/bin\n");
}

#[test]
fn verbose_flag_logs_to_stderr() {
    let output = run_hsh(&["-v"], "/bin/true\n");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn bad_option_is_rejected() {
    let output = run_hsh(&["--log-level", "loud"], "");
    assert!(!output.status.success());
}
