use std::io::Write;
use std::process::{Command, Output, Stdio};

fn cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ftally"))
}

fn run_on(content: &[u8], args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("input.txt");
    std::fs::write(&file, content).unwrap();
    cmd()
        .args(args)
        .arg(file.to_str().unwrap())
        .arg("1")
        .output()
        .unwrap()
}

fn run_chunks(content: &[u8], chunks: &str, extra: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("input.txt");
    std::fs::write(&file, content).unwrap();
    cmd()
        .args(extra)
        .arg(file.to_str().unwrap())
        .arg(chunks)
        .output()
        .unwrap()
}

/// Pull "Number of <label>: N" out of the report.
fn field(stdout: &str, label: &str) -> u64 {
    let prefix = format!("Number of {}: ", label);
    stdout
        .lines()
        .find_map(|l| l.strip_prefix(prefix.as_str()))
        .unwrap_or_else(|| panic!("missing '{}' in output: {}", label, stdout))
        .trim()
        .parse()
        .unwrap()
}

#[test]
fn test_tally_basic() {
    let output = run_on(b"ab! cd\n", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "lines"), 1);
    assert_eq!(field(&stdout, "words"), 2);
    assert_eq!(field(&stdout, "vowels"), 1);
    assert_eq!(field(&stdout, "punctuation"), 1);
}

#[test]
fn test_tally_output_order() {
    let output = run_on(b"hello\n", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let labels: Vec<&str> = stdout
        .lines()
        .map(|l| l.split(':').next().unwrap())
        .collect();
    assert_eq!(
        labels,
        [
            "Number of lines",
            "Number of words",
            "Number of vowels",
            "Number of punctuation",
            "Run Time"
        ]
    );
}

#[test]
fn test_tally_split_between_words() {
    // 11 bytes in 2 chunks: "hello" | " world"
    let output = run_chunks(b"hello world", "2", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "words"), 2);
}

#[test]
fn test_tally_split_inside_word() {
    // 12 bytes in 4 chunks: "abc" | " de" | "fgh" | " ij"
    // "defgh" spans two chunks and is counted in both
    let output = run_chunks(b"abc defgh ij", "4", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "words"), 4);
}

#[test]
fn test_tally_remainder_last() {
    // 10 bytes in 3 chunks: the 10th byte lands in the last chunk
    let output = run_chunks(b"bbbbbbbbba", "3", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "vowels"), 1);
}

#[test]
fn test_tally_remainder_drop() {
    let output = run_chunks(b"bbbbbbbbba", "3", &["--remainder", "drop"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "vowels"), 0);
}

#[test]
fn test_tally_line_start_rule() {
    let output = run_on(b"a\n\nb\n", &["--lines-rule", "line-start"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "lines"), 1);
}

#[test]
fn test_tally_invalid_rule_rejected() {
    let output = run_on(b"a\n", &["--lines-rule", "crlf"]);
    assert!(!output.status.success());
}

#[test]
fn test_tally_zero_chunks() {
    let output = run_chunks(b"hello\n", "0", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid argument"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_tally_negative_chunks() {
    let output = run_chunks(b"hello\n", "-3", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be positive"), "stderr: {}", stderr);
}

#[test]
fn test_tally_non_numeric_chunks() {
    let output = run_chunks(b"hello\n", "four", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'four'"), "stderr: {}", stderr);
}

#[test]
fn test_tally_nonexistent_file() {
    let output = cmd()
        .args(["/nonexistent_xyz_tally", "2"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ftally: /nonexistent_xyz_tally: "));
    assert!(!stderr.contains("os error"));
}

#[test]
fn test_tally_directory_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = cmd()
        .arg(dir.path().to_str().unwrap())
        .arg("2")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_tally_empty_file() {
    let output = run_chunks(b"", "3", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "lines"), 0);
    assert_eq!(field(&stdout, "words"), 0);
    assert_eq!(field(&stdout, "vowels"), 0);
    assert_eq!(field(&stdout, "punctuation"), 0);
}

#[test]
fn test_tally_prompt_for_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("input.txt");
    std::fs::write(&file, "one two three\n").unwrap();
    let mut child = cmd()
        .arg(file.to_str().unwrap())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"1\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Enter the number of chunks: "));
    assert_eq!(field(&stdout, "words"), 3);
}

#[test]
fn test_tally_prompt_eof() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("input.txt");
    std::fs::write(&file, "x\n").unwrap();
    let mut child = cmd()
        .arg(file.to_str().unwrap())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdin.take().unwrap());
    let output = child.wait_with_output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_tally_many_chunks_large_file() {
    let content = "The quick brown fox, jumps over the lazy dog.\n".repeat(20_000);
    let output = run_chunks(content.as_bytes(), "16", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "lines"), 20_000);
    // "The quick brown fox, jumps over the lazy dog." has 11 vowels and 2 marks
    assert_eq!(field(&stdout, "vowels"), 11 * 20_000);
    assert_eq!(field(&stdout, "punctuation"), 2 * 20_000);
}

#[test]
fn test_tally_huge_chunk_count_rejected() {
    let output = run_chunks(b"abc\n", "1099511627776", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("at most"), "stderr: {}", stderr);
}

#[test]
fn test_tally_more_chunks_than_bytes() {
    let output = run_chunks(b"ab cd\n", "64", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(field(&stdout, "lines"), 1);
    assert_eq!(field(&stdout, "vowels"), 1);
}
