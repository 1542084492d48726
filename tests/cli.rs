use assert_cmd::Command;
use predicates::prelude::*;

mod common;

fn adlens() -> Command {
    let mut cmd = Command::cargo_bin("adlens").unwrap();
    // Keep runs offline even if the developer's shell configures a service.
    cmd.env_remove("ADLENS_VISION_ENDPOINT");
    cmd.env_remove("ADLENS_VISION_API_KEY");
    cmd
}

#[test]
fn runs() {
    adlens().assert().success();
}

#[test]
fn outputs_tool_name() {
    adlens()
        .arg("-V")
        .assert()
        .success()
        .stdout("adlens 0.1.0\n");
}

// Analyse subcommand tests

#[test]
fn analyse_emits_raster_then_psd_batch() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("hero.bmp");
    let layout = dir.path().join("layout.psd");
    common::write_bmp(&image, 8, 8, [255, 0, 0]);
    common::write_tree(&layout, common::BANNER_TREE);

    let output = adlens()
        .arg("analyse")
        .arg(&image)
        .arg(&layout)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["type"], "image");
    assert_eq!(json[0]["processed_count"], 1);
    assert_eq!(json[0]["results"][0]["analysis"]["image_specs"]["format"], "bmp");
    assert_eq!(
        json[0]["results"][0]["analysis"]["content"]["color_scheme"]["dominant"],
        "#f80808"
    );
    assert_eq!(json[1]["type"], "psd");
    assert_eq!(json[1]["results"][0]["text_extraction"]["headline"], "Save 20%");
    assert_eq!(
        json[1]["results"][0]["analysis"]["image_specs"]["resolution"],
        "144 dpi"
    );
}

#[test]
fn analyse_walks_directories() {
    let dir = tempfile::tempdir().unwrap();
    common::write_bmp(&dir.path().join("a.bmp"), 4, 4, [0, 0, 0]);
    common::write_bmp(&dir.path().join("nested/b.bmp"), 4, 4, [0, 0, 0]);
    std::fs::write(dir.path().join("readme.txt"), "ignored").unwrap();

    adlens()
        .args(["analyse", "--output", "csv"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("image,a.bmp,success"))
        .stdout(predicate::str::contains("image,b.bmp,success"))
        .stdout(predicate::str::contains("readme").not());
}

#[test]
fn analyse_reports_missing_file_per_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("ok.bmp");
    common::write_bmp(&image, 4, 4, [0, 0, 255]);

    adlens()
        .args(["analyse", "--output", "text"])
        .arg(&image)
        .arg(dir.path().join("gone.png"))
        .assert()
        .success()
        .stdout(predicate::str::contains("2 processed, 1 successful, 1 failed"))
        .stdout(predicate::str::contains("gone.png [INVALID_FILE]"));
}

#[test]
fn analyse_rejects_unsupported_type() {
    let dir = tempfile::tempdir().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();

    adlens()
        .arg("analyse")
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown file type"));
}

#[test]
fn analyse_rejects_oversized_file() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("big.bmp");
    common::write_bmp(&image, 64, 64, [0, 0, 0]);

    adlens()
        .args(["analyse", "--max-file-size", "100"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("larger than the 100 byte limit"));
}

#[test]
fn analyse_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("adlens.yaml");
    std::fs::write(&config, "concurrency: 0\n").unwrap();
    let image = dir.path().join("a.bmp");
    common::write_bmp(&image, 4, 4, [0, 0, 0]);

    adlens()
        .arg("analyse")
        .arg("--config")
        .arg(&config)
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("concurrency must be at least 1"));
}

// Inspect subcommand tests

#[test]
fn inspect_prints_tree_and_copy() {
    let dir = tempfile::tempdir().unwrap();
    let layout = dir.path().join("layout.psd");
    common::write_tree(&layout, common::BANNER_TREE);

    adlens()
        .arg("inspect")
        .arg(&layout)
        .assert()
        .success()
        .stdout(predicate::str::contains("Canvas:        1200 x 628 px"))
        .stdout(predicate::str::contains("▸ Hero [group]"))
        .stdout(predicate::str::contains("headline"))
        .stdout(predicate::str::contains("Save 20%"));
}

#[test]
fn inspect_rejects_malformed_tree() {
    let dir = tempfile::tempdir().unwrap();
    let layout = dir.path().join("broken.psd");
    std::fs::write(&layout, "{ nope").unwrap();

    adlens()
        .arg("inspect")
        .arg(&layout)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse layer tree JSON"));
}

// Contrast subcommand tests

#[test]
fn contrast_black_on_white() {
    adlens()
        .args(["contrast", "#ffffff", "#000000"])
        .assert()
        .success()
        .stdout("21.00:1\n");
}

#[test]
fn contrast_rejects_bad_hex() {
    adlens()
        .args(["contrast", "#ffffff", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid color 'blue'"));
}
