//! Command-line tests
//!
//! Each test writes its inputs to a temporary directory and runs the binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn ab_report() -> Command {
    Command::cargo_bin("ab-report").expect("binary should build")
}

const COORDS: &str = "0 20000 | 0 20000 | chr1 tig1\n30000 20000 | 0 10000 | chr1 tig2\n";

#[test]
fn test_help_lists_module_commands() {
    ab_report()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("synteny"))
        .stdout(predicate::str::contains("read-quality"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_synteny_json_output() {
    let dir = TempDir::new().unwrap();
    let coords = write(dir.path(), "canu.coords", COORDS);

    let output = ab_report()
        .args(["synteny", "--format", "json"])
        .arg(&coords)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let section = &report["sections"][0];
    assert_eq!(section["anchor"], "syntenyplot");
    assert_eq!(section["content"]["plot_type"], "scatter");
    assert_eq!(section["content"]["config"]["data_labels"][0]["name"], "canu");
}

#[test]
fn test_step_size_changes_point_count() {
    let dir = TempDir::new().unwrap();
    let coords = write(dir.path(), "canu.coords", "0 20000 | 0 20000 | chr1 tig1\n");

    let count_points = |step: &str| {
        let output = ab_report()
            .args(["synteny", "--format", "json", "--step-size", step])
            .arg(&coords)
            .output()
            .unwrap();
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        report["sections"][0]["content"]["datasets"][0]
            .as_array()
            .map_or(0, Vec::len)
    };

    // 0, 5000, 10000, 15000, 20000
    assert_eq!(count_points("5000"), 5);
    // 0, 10000, 20000
    assert_eq!(count_points("10000"), 3);
}

#[test]
fn test_zero_step_size_rejected() {
    let dir = TempDir::new().unwrap();
    let coords = write(dir.path(), "canu.coords", COORDS);

    ab_report()
        .args(["synteny", "--step-size", "0"])
        .arg(&coords)
        .assert()
        .failure();
}

#[test]
fn test_minimap2_writes_report() {
    let dir = TempDir::new().unwrap();
    let tsv = write(
        dir.path(),
        "minimap2_aligns_flye.tsv",
        "ref_start\tref_end\tcontig_start\tcontig_end\tcontig\n0\t30000\t0\t30000\ttig1\n",
    );
    let out = dir.path().join("out");

    ab_report()
        .args(["minimap2", "--label-prefix", "minimap2_aligns_", "-o"])
        .arg(&out)
        .arg(&tsv)
        .assert()
        .success()
        .stdout(predicate::str::contains("contig_alignment_plots"))
        .stdout(predicate::str::contains("report.json"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    let config = &report["sections"][0]["content"]["config"];
    assert_eq!(config["data_labels"][0]["name"], "flye");
    assert_eq!(config["xmax"], 30000.0);
}

#[test]
fn test_cpu_times_text_output() {
    let dir = TempDir::new().unwrap();
    let times = write(dir.path(), "cpu.yaml", "canu: 5400\nflye: 90061\n");

    ab_report()
        .arg("cpu-times")
        .arg(&times)
        .assert()
        .success()
        .stdout(predicate::str::contains("canu: CPU time=1:30:00"))
        .stdout(predicate::str::contains("flye: CPU time=1 day, 1:01:01"));
}

#[test]
fn test_cpu_times_tsv_output() {
    let dir = TempDir::new().unwrap();
    let times = write(dir.path(), "cpu.yaml", "canu: 60\n");

    ab_report()
        .args(["cpu-times", "--format", "tsv"])
        .arg(&times)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("module\tanchor\tkind\tdatasets\titems"))
        .stdout(predicate::str::contains("general_stats\tcanu\tCPU time\t\t0:01:00"));
}

#[test]
fn test_no_data_fails() {
    let dir = TempDir::new().unwrap();
    let coords = write(dir.path(), "empty.coords", "header\nNUCMER\n");

    ab_report()
        .arg("nucmer")
        .arg(&coords)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No usable input"));
}

#[test]
fn test_missing_file_fails() {
    ab_report()
        .args(["synteny", "does_not_exist.coords"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does_not_exist.coords"));
}

#[test]
fn test_jellyfish_comparison() {
    let dir = TempDir::new().unwrap();
    let canu = write(dir.path(), "canu.dump", "AA 3\nAC 1\nCA 2\n");
    let flye = write(dir.path(), "flye.dump", "AA 4\nCC 1\n");

    let output = ab_report()
        .args(["jellyfish", "--format", "json", "--dump"])
        .arg(&canu)
        .arg("--dump")
        .arg(&flye)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sections"][0]["anchor"], "jellyfish_kmer_comparison_plot");
    assert_eq!(
        report["sections"][0]["content"]["config"]["data_labels"][0]["name"],
        "canu.dump vs flye.dump"
    );
}

#[test]
fn test_report_from_config() {
    let dir = TempDir::new().unwrap();
    let times = write(dir.path(), "cpu.yaml", "canu: 3600\n");
    let coords = write(dir.path(), "canu.coords", COORDS);
    let empty = write(dir.path(), "empty.coords", "nothing here\n");
    let publication = write(
        dir.path(),
        "publication_info.txt",
        "authors=\"A. Author\"\norganism=\"E. coli\"\nflowcell=\"R9.4\"\nkit=\"SQK-LSK108\"\nbasecaller=\"guppy_3\"\n",
    );
    let versions = write(
        dir.path(),
        "tool_versions.yaml",
        "Nanoplot: 1.20.0\nMinimap2: 2.17\nQuast: 5.0.2\nJellyfish: 2.2.10\n",
    );
    let out = dir.path().join("report_out");

    let config = format!(
        "output_dir: {out}\n\
         data_format: yaml\n\
         modules:\n\
         \x20 - module: cpu_times\n\
         \x20   inputs:\n\
         \x20     times: [{times}]\n\
         \x20 - module: nucmer\n\
         \x20   inputs:\n\
         \x20     coords: [{empty}]\n\
         \x20 - module: synteny\n\
         \x20   inputs:\n\
         \x20     coords: [{coords}]\n\
         \x20   step_size: 10000\n\
         \x20 - module: methods\n\
         \x20   inputs:\n\
         \x20     publication_info: [{publication}]\n\
         \x20     tool_versions: [{versions}]\n",
        out = out.display(),
        times = times.display(),
        empty = empty.display(),
        coords = coords.display(),
        publication = publication.display(),
        versions = versions.display(),
    );
    let config_path = write(dir.path(), "run.yaml", &config);

    ab_report()
        .args(["report", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("syntenyplot"))
        .stdout(predicate::str::contains("methods"));

    // nucmer had nothing to show and was skipped
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
    let anchors: Vec<&str> = report["sections"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["anchor"].as_str())
        .collect();
    assert_eq!(anchors, vec!["syntenyplot", "methods"]);
    assert!(out.join("ab_methods.yaml").exists());
}

#[test]
fn test_report_rejects_unknown_role() {
    let dir = TempDir::new().unwrap();
    let config_path = write(
        dir.path(),
        "run.yaml",
        "modules:\n  - module: synteny\n    inputs:\n      histogram: [a.histo]\n",
    );

    ab_report()
        .args(["report", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input role 'histogram'"));
}
