//! Exit codes and output of the astroglia-calibrate binary

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

const TABLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sic_calibration.csv");

fn calibrate(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_astroglia-calibrate"))
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_json_report() {
    let out = calibrate(&[TABLE, "--amplitude", "40", "--window", "300", "--json"]);
    assert_eq!(out.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["calibration"]["row"], 8);
    assert_eq!(report["knobs"]["ip3_to_sic_weight"], 10);
    assert_eq!(report["knobs"]["sic_generator"]["current_decay"], 40);
    assert_eq!(report["substrate"]["compartments"].as_array().unwrap().len(), 4);
}

#[test]
fn test_config_file_with_override() {
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{ "knobs": {{ "sr_to_ip3_weight": 5 }}, "targets": {{ "ip3_sensitivity": 12 }} }}"#
    )
    .unwrap();
    let path = config.path().to_str().unwrap();

    let out = calibrate(&[TABLE, "--config", path, "--json"]);
    assert_eq!(out.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["knobs"]["sr_to_ip3_weight"], 12);
    assert!(report["calibration"].is_null());

    let out = calibrate(&[TABLE, "--config", path, "--sensitivity", "70", "--json"]);
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["knobs"]["sr_to_ip3_weight"], 70);
}

#[test]
fn test_out_of_range_target_exits_1() {
    let out = calibrate(&[TABLE, "--window", "609"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_bad_arguments_exit_2() {
    assert_eq!(calibrate(&[]).status.code(), Some(2));
    assert_eq!(calibrate(&[TABLE, "--bogus"]).status.code(), Some(2));
    assert_eq!(calibrate(&[TABLE, "--amplitude", "loud"]).status.code(), Some(2));
    assert_eq!(
        calibrate(&["/nonexistent/table.csv"]).status.code(),
        Some(2)
    );
}
