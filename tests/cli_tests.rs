use std::fs;
use std::process::Command;

use tempfile::tempdir;

fn cleaner() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sequence_cleaner"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn short_v_prints_version() {
    let out = cleaner().arg("-v").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn underscore_flag_spellings_are_accepted() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::write(
        input.path().join("reads.fasta"),
        ">r1\nACG\n>r2\nNNAC\n>r3\nNNNAC\n>r4\nGTTT\n",
    )
    .unwrap();

    let status = cleaner()
        .arg("--query")
        .arg(input.path())
        .arg("--output_directory")
        .arg(output.path())
        .args(["--minimum_length", "3", "--percentage_n", "50"])
        .arg("--concatenate_duplicates")
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(
        fs::read_to_string(output.path().join("clean_reads.fasta")).unwrap(),
        ">r2\nNNAC\n>r4\nGTTT\n"
    );
}

#[test]
fn fatal_error_is_reported_once() {
    let dir = tempdir().unwrap();
    let out = cleaner()
        .arg("-q")
        .arg(dir.path().join("missing"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(text.matches("is not a directory").count(), 1, "{text}");
}

#[test]
fn failing_file_is_reported_once() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    fs::write(input.path().join("bad.fastq"), "@q1\nACGT\n+\nII\n").unwrap();

    let out = cleaner()
        .arg("-q")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(1));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(text.matches("cannot read records from").count(), 1, "{text}");
}
