use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::io::Cursor;
use std::process::Command;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn replay_zone_at_half_scale() {
    let script = assert_fs::NamedTempFile::new("zone.json").unwrap();
    script
        .write_str(
            r#"{
                "tool": "zone",
                "display": {"left": 0, "top": 0, "width": 320, "height": 240},
                "events": [
                    {"type": "pointerDown", "x": 50, "y": 50},
                    {"type": "pointerMove", "x": 100, "y": 75},
                    {"type": "pointerUp", "x": 150, "y": 100},
                    {"type": "confirm"}
                ]
            }"#,
        )
        .unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["replay", script.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "rectangle""#))
        .stdout(predicate::str::contains("300.0"));
}

#[test]
fn replay_line_with_entrance() {
    let script = assert_fs::NamedTempFile::new("line.json").unwrap();
    script
        .write_str(
            r#"{
                "tool": "line",
                "requireEntranceSide": true,
                "events": [
                    {"type": "pointerDown", "x": 10, "y": 10},
                    {"type": "pointerUp", "x": 200, "y": 10},
                    {"type": "confirm"},
                    {"type": "pointerDown", "x": 100, "y": 50},
                    {"type": "complete"}
                ]
            }"#,
        )
        .unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["replay", script.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("entranceSide"));
}

#[test]
fn replay_cancel_emits_null() {
    let script = assert_fs::NamedTempFile::new("cancel.json").unwrap();
    script
        .write_str(
            r#"{"tool": "line", "events": [
                {"type": "pointerDown", "x": 10, "y": 10},
                {"type": "pointerUp", "x": 90, "y": 90},
                {"type": "cancel"},
                {"type": "confirm"}
            ]}"#,
        )
        .unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["replay", script.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""result": null"#));
}

#[test]
fn replay_writes_frames_over_snapshot() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("front-door.png").write_binary(&png_bytes(8, 6)).unwrap();
    let script = dir.child("script.json");
    script
        .write_str(
            r#"{"tool": "zone", "shape": "pentagon", "events": [
                {"type": "pointerDown", "x": 100, "y": 100},
                {"type": "pointerUp", "x": 300, "y": 300},
                {"type": "confirm"}
            ]}"#,
        )
        .unwrap();
    let frames = dir.child("frames.json");

    Command::cargo_bin("zonemark")
        .unwrap()
        .args([
            "replay",
            script.path().to_str().unwrap(),
            "--camera",
            "front-door",
            "--snapshot-dir",
            dir.path().to_str().unwrap(),
            "--frames",
            frames.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("pentagon"));

    frames.assert(predicate::str::contains(r#""op": "image""#));
    frames.assert(predicate::str::contains(r#""op": "polygon""#));
    dir.close().unwrap();
}

#[test]
fn replay_rejects_malformed_script() {
    let script = assert_fs::NamedTempFile::new("bad.json").unwrap();
    script.write_str(r#"{"tool": "circle", "events": []}"#).unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["replay", script.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));
}

#[test]
fn check_reports_warnings_and_errors() {
    let dir = assert_fs::TempDir::new().unwrap();
    let outside = dir.child("outside.json");
    outside
        .write_str(
            r#"{"type": "rectangle", "points": [
                {"x": 600, "y": 400}, {"x": 700, "y": 400},
                {"x": 700, "y": 450}, {"x": 600, "y": 450}
            ]}"#,
        )
        .unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["check", outside.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("warning: OutOfBounds"));

    let line = dir.child("line.json");
    line.write_str(r#"{"line": {"x1": 10, "y1": 10, "x2": 200, "y2": 10}}"#)
        .unwrap();

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["check", line.path().to_str().unwrap(), "--require-entrance"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("error: MissingEntrance"));

    Command::cargo_bin("zonemark")
        .unwrap()
        .args(["check", line.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));
    dir.close().unwrap();
}

#[test]
fn snapshot_from_directory() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("cam-1.png").write_binary(&png_bytes(4, 3)).unwrap();
    let out = dir.child("saved.png");

    Command::cargo_bin("zonemark")
        .unwrap()
        .args([
            "snapshot",
            "--camera",
            "cam-1",
            "--snapshot-dir",
            dir.path().to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved 4x3 snapshot"));

    out.assert(predicate::path::exists());
    dir.close().unwrap();
}

#[test]
fn snapshot_for_inactive_camera() {
    let dir = assert_fs::TempDir::new().unwrap();
    let out = dir.child("saved.png");

    Command::cargo_bin("zonemark")
        .unwrap()
        .args([
            "snapshot",
            "--camera",
            "cam-9",
            "--snapshot-dir",
            dir.path().to_str().unwrap(),
            "--out",
            out.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("camera must be active"));

    out.assert(predicate::path::missing());
    dir.close().unwrap();
}
