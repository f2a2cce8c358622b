//! CLI integration tests

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const SAMPLE_LOG: &str = "\
MEASUREMENT LOG DUMP
+++    SWITCH-A  2016-03-08 10:00:00
       Measurements for SA_SPAMEAS table
  INTERVAL  SPA_NAME  COUNT  FAILED
   10  EPAYSRV   100   0
   10  DIAMCL    500   0
+--    END

+++    SWITCH-A  2016-03-08 10:00:00
       Measurements for MS_PROCESS_MEAS table
  ID   HOST    PROCESS        CPU
  299  0-0-4   EPAYSRV_1      20.00
  300  0-0-2   EPAYSRV_2      30.00
  301  0-0-9   DIAMCL28I_2    18.89
+--    END
";

fn write_log(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_measlog-kpi"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_no_argument_prints_usage() {
    let output = run(&[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "missing file should not be an error");
    assert!(stdout.contains("Usage: measlog-kpi <measlog file>"));
}

#[test]
fn test_text_report() {
    let log = write_log(SAMPLE_LOG);
    let output = run(&[log.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    let expected = "\
EPAY SPA KPI report: (demo version)
============================================================
# report_time, tps, StdClient# CPU% CallCost, SpcClient# CPU% CallCost
1 2016-03-08 10:00 10 1 20.00 20.00 1 30.00 30.00
------------------------------------------------------------
  AVERAGE          10 -- 20.00 20.00 - 30.00 30.00
============================================================
finished!
";
    assert_eq!(stdout, expected);
}

#[test]
fn test_json_report() {
    let log = write_log(SAMPLE_LOG);
    let output = run(&["--format", "json", log.path().to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["rows"].as_array().map(|r| r.len()), Some(1));
    assert_eq!(value["rows"][0]["std_client_num"], 1);
    assert_eq!(value["rows"][0]["spc_client_num"], 1);
    assert_eq!(value["average"]["tps"], 10);
}

#[test]
fn test_non_utf8_bytes_outside_blocks_are_tolerated() {
    let mut content = b"comment \xe9t\xe9\n".to_vec();
    content.extend_from_slice(SAMPLE_LOG.as_bytes());
    let mut log = NamedTempFile::new().expect("Failed to create temp file");
    log.write_all(&content).expect("Failed to write temp file");

    let output = run(&[log.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("1 2016-03-08 10:00 10 1 20.00 20.00 1 30.00 30.00\n"));
    assert!(stdout.ends_with("finished!\n"));
}

#[test]
fn test_unreadable_file_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("missing.log");
    let output = run(&[missing.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("read measurement log"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_malformed_block_skipped_or_fatal() {
    let content = format!("{}       Measurements for SA_SPAMEAS table\n   10  EPAYX  100  0\n", SAMPLE_LOG);
    let log = write_log(&content);
    let path = log.path().to_str().unwrap();

    let lenient = run(&[path]);
    assert!(lenient.status.success());
    assert!(String::from_utf8_lossy(&lenient.stdout).contains("finished!"));

    let strict = run(&["--strict", path]);
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(!strict.status.success());
    assert!(stderr.contains("malformed block"));
}
