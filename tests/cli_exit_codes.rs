use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const TOKENS: &str = r##"[
    {"type": "color", "path": "color.brand", "handle": "--color-brand", "value": "#FF0000"},
    {"type": "color", "path": "color.surface", "value": "#FFFFFF"}
]"##;

fn write_image(path: &Path, color: [u8; 4]) {
    let img = RgbaImage::from_pixel(4, 4, image::Rgba(color));
    img.save(path).expect("write image");
}

/// Solid image of `color` plus the shared token file.
fn fixture(dir: &TempDir, color: [u8; 4]) -> (PathBuf, PathBuf) {
    let image_path = dir.path().join("screen.png");
    let tokens_path = dir.path().join("tokens.json");
    write_image(&image_path, color);
    std::fs::write(&tokens_path, TOKENS).expect("write tokens");
    (image_path, tokens_path)
}

fn run_dtc(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_dtc"))
        .args(args)
        .output()
        .expect("run dtc")
}

fn parse_json(stdout: &[u8]) -> serde_json::Value {
    serde_json::from_slice(stdout).expect("output should be JSON")
}

#[test]
fn analyze_exit_code_passes_for_token_colors() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [255, 0, 0, 255]);

    let status = Command::new(env!("CARGO_BIN_EXE_dtc"))
        .args([
            "analyze",
            "--image",
            image_path.to_str().unwrap(),
            "--tokens",
            tokens_path.to_str().unwrap(),
            "--format",
            "json",
        ])
        .status()
        .expect("run dtc");
    assert_eq!(status.code(), Some(0));
}

#[test]
fn analyze_exit_code_fails_for_off_token_color() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [0, 0, 255, 255]);

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));

    let json = parse_json(&output.stdout);
    assert_eq!(json["mode"], "analyze");
    assert_eq!(json["passed"], false);
    assert_eq!(json["issues"]["standalone"][0]["status"], "fail");
}

#[test]
fn analyze_accepts_config_flag_and_still_passes() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [0, 0, 255, 255]);
    let cfg_path = dir.path().join("dtc.toml");
    // a warn ceiling above any possible distance turns the failure into a warning
    std::fs::write(&cfg_path, "[matching]\nwarn_threshold = 200.0\n").expect("write config");

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--config",
        cfg_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let json = parse_json(&output.stdout);
    assert_eq!(json["passed"], true);
    assert_eq!(json["summary"]["warnings"], 1);
}

#[test]
fn cli_flags_override_config() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [0, 0, 255, 255]);
    let cfg_path = dir.path().join("dtc.toml");
    std::fs::write(&cfg_path, "[matching]\nwarn_threshold = 200.0\n").expect("write config");

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--config",
        cfg_path.to_str().unwrap(),
        "--warn-threshold",
        "10",
    ]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn analyze_exit_code_returns_fatal_for_missing_image() {
    let dir = TempDir::new().expect("tempdir");
    let tokens_path = dir.path().join("tokens.json");
    std::fs::write(&tokens_path, TOKENS).expect("write tokens");

    let output = run_dtc(&[
        "analyze",
        "--image",
        "missing.png",
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let json = parse_json(&output.stdout);
    assert_eq!(json["mode"], "error");
    assert_eq!(json["error"]["category"], "config");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("File not found"));
}

#[test]
fn analyze_exit_code_returns_fatal_for_invalid_tokens() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [255, 0, 0, 255]);
    std::fs::write(&tokens_path, r##"[{"type": "color", "value": "#FF0000"}]"##)
        .expect("overwrite tokens");

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(2));
    let json = parse_json(&output.stdout);
    assert_eq!(json["error"]["category"], "input");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap_or_default()
        .contains("missing `path`"));
}

#[test]
fn invalid_threshold_flags_are_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [255, 0, 0, 255]);

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--pass-threshold",
        "20",
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn analyze_pretty_exits_zero_for_token_colors() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [255, 255, 255, 255]);

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--format",
        "pretty",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        output.stderr.is_empty(),
        "stderr should be empty on success"
    );
    // stdout is not a tty under test, so pretty falls back to indented JSON
    let pretty = parse_json(&output.stdout);
    assert_eq!(pretty.get("mode").and_then(|v| v.as_str()), Some("analyze"));
    assert_eq!(
        pretty.get("passed").and_then(|v| v.as_bool()),
        Some(true),
        "pretty output should show pass status, got {pretty}"
    );
}

#[test]
fn analyze_pretty_exits_two_for_missing_inputs() {
    let output = run_dtc(&[
        "analyze",
        "--image",
        "missing.png",
        "--tokens",
        "missing.json",
        "--format",
        "pretty",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let pretty = parse_json(&output.stdout);
    assert_eq!(pretty.get("mode").and_then(|v| v.as_str()), Some("error"));
}

#[test]
fn analyze_writes_output_file() {
    let dir = TempDir::new().expect("tempdir");
    let (image_path, tokens_path) = fixture(&dir, [0, 0, 255, 255]);
    let report_path = dir.path().join("report.json");

    let output = run_dtc(&[
        "analyze",
        "--image",
        image_path.to_str().unwrap(),
        "--tokens",
        tokens_path.to_str().unwrap(),
        "--include-matches",
        "--output",
        report_path.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("report is JSON");
    assert_eq!(json["colorMatches"][0]["source"]["color"], "#0000FF");
}

#[test]
fn palette_prints_sampled_colors() {
    let dir = TempDir::new().expect("tempdir");
    let image_path = dir.path().join("shot.png");
    write_image(&image_path, [12, 34, 56, 255]);

    let output = run_dtc(&["palette", "--image", image_path.to_str().unwrap(), "--stride", "1"]);
    assert_eq!(output.status.code(), Some(0));
    let json = parse_json(&output.stdout);
    assert_eq!(json["mode"], "palette");
    assert_eq!(json["image"]["width"], 4);
    assert_eq!(json["colors"][0]["color"], "#0C2238");
    assert_eq!(json["colors"][0]["coveragePercentage"], 100.0);
}

#[test]
fn palette_missing_image_is_fatal() {
    let output = run_dtc(&["palette", "--image", "nope.png"]);
    assert_eq!(output.status.code(), Some(2));
}
