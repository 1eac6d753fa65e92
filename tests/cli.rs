use std::io::Write;
use std::process::{Command, Output, Stdio};

fn mycli(args: &[&str], stdin: Option<&str>) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_mycli"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    if let Some(input) = stdin {
        let mut pipe = child.stdin.take().unwrap();
        pipe.write_all(input.as_bytes()).unwrap();
    }
    child.wait_with_output().unwrap()
}

#[test]
fn test_echo_reads_piped_stdin() {
    let output = mycli(&["echo"], Some("from pipe\n"));
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[MyCli] from pipe"), "stdout: {stdout}");
}

#[test]
fn test_echo_reads_input_longer_than_one_chunk() {
    let line = "x".repeat(100);
    let output = mycli(&["echo"], Some(&line));
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(&format!("[MyCli] {line}")), "stdout: {stdout}");
}

#[test]
fn test_echo_prefers_argument() {
    let output = mycli(&["echo", "hi"], None);
    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim_end(), "[MyCli] hi");
}

#[test]
fn test_missing_argument_fails() {
    let output = mycli(&["say", "Hello"], None);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Missing required argument 'name'"), "stderr: {stderr}");
}
