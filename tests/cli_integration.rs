use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_multidiff").to_string()
}

fn write_inputs(dir: &Path, contents: &[&[u8]]) -> Vec<PathBuf> {
    contents
        .iter()
        .enumerate()
        .map(|(n, data)| {
            let path = dir.join(format!("obj{n}.bin"));
            std::fs::write(&path, data).unwrap();
            path
        })
        .collect()
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

#[test]
fn cli_pair_plain_hex() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"abc", b"abx"]);

    let out = stdout_of(
        Command::new(bin())
            .args(["--encode", "hex", "--color", "none", "pair"])
            .args(&files),
    );
    assert_eq!(
        out,
        format!(
            "--- #0 {} -> #1 {}\n616278\n",
            files[0].display(),
            files[1].display()
        )
    );
}

#[test]
fn cli_pair_html_hexdump_quiet() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"Hello, World!", b"Hello, World!"]);

    let out = stdout_of(
        Command::new(bin())
            .args(["-q", "--color", "html", "pair"])
            .args(&files),
    );
    assert_eq!(
        out,
        "000000: 48 65 6c 6c 6f 2c 20 57 6f 72 6c 64 21          |Hello, World!   |\n"
    );
}

#[test]
fn cli_sequence_renders_each_neighbour_pair() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"v1", b"v2", b"v3"]);

    let out = stdout_of(
        Command::new(bin())
            .args(["-q", "-e", "utf8", "--color", "html", "sequence"])
            .args(&files),
    );
    assert_eq!(
        out,
        "v<span class='replace'>2</span>\nv<span class='replace'>3</span>\n"
    );
}

#[test]
fn cli_baseline_skips_the_reference() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"aaa", b"aba", b"aca"]);

    let out = stdout_of(
        Command::new(bin())
            .args(["--encode", "utf8", "--color", "none", "baseline", "-b", "1"])
            .args(&files),
    );
    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with("---")).collect();
    assert_eq!(headers.len(), 2);
    assert!(headers[0].starts_with("--- #1 ") && headers[0].contains(" -> #0 "));
    assert!(headers[1].starts_with("--- #1 ") && headers[1].contains(" -> #2 "));
}

#[test]
fn cli_baseline_out_of_range_fails() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"a", b"b"]);

    let out = Command::new(bin())
        .args(["baseline", "--baseline", "5"])
        .args(&files)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("out of range"));
}

#[test]
fn cli_opcodes_text_and_json() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"abc", b"abx"]);

    let text = stdout_of(Command::new(bin()).arg("opcodes").args(&files));
    assert_eq!(
        text,
        "equal   source[0..2] target[0..2]\nreplace source[2..3] target[2..3]\n"
    );

    let json = stdout_of(Command::new(bin()).args(["--json", "opcodes"]).args(&files));
    let compact: String = json.split_whitespace().collect();
    assert_eq!(compact, r#"[["equal",0,2,0,2],["replace",2,3,2,3]]"#);
}

#[test]
fn cli_opcodes_verbose_reports_alignment_stats() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"abcXdef", b"abcYdef"]);

    let out = Command::new(bin())
        .args(["-v", "opcodes"])
        .args(&files)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout).lines().count(), 3);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let summary = "3 opcodes, 2 matching blocks, 6 bytes matched";
    assert!(stderr.contains(summary), "{stderr}");
}

#[test]
fn cli_json_stats_on_stderr() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"same", b"same"]);

    let out = Command::new(bin())
        .args(["-q", "--json", "pair"])
        .args(&files)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("\"command\": \"pair\""), "{stderr}");
    assert!(stderr.contains("\"identical\": true"), "{stderr}");
}

#[test]
fn cli_output_file_requires_force() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"old", b"new"]);
    let output = dir.path().join("diff.txt");
    std::fs::write(&output, b"keep me").unwrap();

    let st = Command::new(bin())
        .args(["-e", "hex", "--color", "none", "-q", "pair", "-o"])
        .arg(&output)
        .args(&files)
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(1));
    assert_eq!(std::fs::read(&output).unwrap(), b"keep me");

    let st = Command::new(bin())
        .args(["-e", "hex", "--color", "none", "-q", "-f", "pair", "-o"])
        .arg(&output)
        .args(&files)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "6e6577\n");
}

#[test]
fn cli_missing_input_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.bin");

    let out = Command::new(bin())
        .arg("pair")
        .arg(&missing)
        .arg(&missing)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.bin"));
}

#[test]
fn cli_invalid_utf8_reports_error() {
    let dir = tempdir().unwrap();
    let files = write_inputs(dir.path(), &[b"ok", b"ok\xff"]);

    let out = Command::new(bin())
        .args(["-e", "utf8", "pair"])
        .args(&files)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid UTF-8"));
}
