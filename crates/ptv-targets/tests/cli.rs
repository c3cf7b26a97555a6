#![cfg(feature = "cli")]

use std::path::Path;

use approx::assert_abs_diff_eq;
use assert_cmd::Command;
use predicates::prelude::*;
use ptv_targets::io::{read_targets, DetectConfig, DetectionReport};
use ptv_targets::{DetectionConfig, Roi};

fn write_scenario_png(path: &Path) {
    let mut img = image::GrayImage::new(20, 20);
    for y in 5..=7 {
        for x in 5..=7 {
            img.put_pixel(x, y, image::Luma([50]));
        }
    }
    img.save(path).expect("save png");
}

fn scenario_config() -> DetectConfig {
    DetectConfig {
        detection: DetectionConfig {
            threshold: 10,
            discontinuity: 5,
            min_pixels: 1,
            max_pixels: 100,
            min_width: 1,
            max_width: 10,
            min_height: 1,
            max_height: 10,
            min_sum_intensity: 0,
            roi: Some(Roi::new(1, 18, 1, 18)),
        },
        ..DetectConfig::default()
    }
}

#[test]
fn detect_writes_report_and_target_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("cam1.10001.png");
    let config_path = dir.path().join("config.json");
    let report_path = dir.path().join("report.json");
    let targets_path = dir.path().join("cam1.10001_targets");
    write_scenario_png(&image_path);
    scenario_config().write_json(&config_path).expect("config");

    Command::cargo_bin("ptv-targets")
        .expect("binary")
        .arg("detect")
        .arg(&image_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--targets")
        .arg(&targets_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote detection report"));

    let report = DetectionReport::load_json(&report_path).expect("report");
    assert_eq!((report.width, report.height), (20, 20));
    assert_eq!(report.stats.accepted, 1);
    assert_eq!(report.targets.len(), 1);
    assert_eq!(report.targets[0].sum_intensity, 360);
    assert_abs_diff_eq!(report.targets[0].x(), 6.5, epsilon = 1e-12);

    let targets = read_targets(&targets_path).expect("target file");
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].pixel_count, 9);
    assert_abs_diff_eq!(targets[0].y(), 6.5, epsilon = 1e-4);
}

#[test]
fn threshold_override_can_suppress_targets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("frame.png");
    let config_path = dir.path().join("config.json");
    write_scenario_png(&image_path);
    scenario_config().write_json(&config_path).expect("config");

    Command::cargo_bin("ptv-targets")
        .expect("binary")
        .args(["detect", "--stdout", "--threshold", "50"])
        .arg(&image_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image_path = dir.path().join("frame.png");
    let config_path = dir.path().join("config.json");
    write_scenario_png(&image_path);
    let mut cfg = scenario_config();
    cfg.detection.min_pixels = 50;
    cfg.detection.max_pixels = 10;
    cfg.write_json(&config_path).expect("config");

    Command::cargo_bin("ptv-targets")
        .expect("binary")
        .arg("detect")
        .arg(&image_path)
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("minimum 50 exceeds maximum 10"));
}

#[test]
fn init_config_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("default.json");

    Command::cargo_bin("ptv-targets")
        .expect("binary")
        .arg("init-config")
        .arg(&config_path)
        .assert()
        .success();

    let cfg = DetectConfig::load_json(&config_path).expect("load");
    assert_eq!(cfg.detection, DetectionConfig::default());
}

#[test]
fn missing_image_fails() {
    Command::cargo_bin("ptv-targets")
        .expect("binary")
        .arg("detect")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input image"));
}
