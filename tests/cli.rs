use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn neural_field() -> Command {
    Command::new(env!("CARGO_BIN_EXE_neural-field"))
}

fn succeeds(command: &mut Command) -> bool {
    command
        .status()
        .expect("Failed to execute neural-field")
        .success()
}

fn stdout_of(command: &mut Command) -> String {
    let output = command.output().expect("Failed to execute neural-field");
    assert!(
        output.status.success(),
        "neural-field exited with error: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be UTF-8")
}

#[test]
fn simulate_reports_statistics() {
    let stdout = stdout_of(neural_field().args(["simulate", "-n", "50", "--seed", "3"]));

    assert!(stdout.contains("frames: 50"), "{stdout}");
    assert!(stdout.contains("particles: 60"), "{stdout}");
    assert!(stdout.contains("connections:"), "{stdout}");
}

#[test]
fn simulate_reads_yaml_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("field.yaml");
    fs::write(&config, "particle_count: 12\ncursor_mode: repel\n").unwrap();

    let stdout = stdout_of(neural_field().args([
        "simulate",
        "-n",
        "10",
        "--seed",
        "3",
        "--config",
        config.to_str().unwrap(),
    ]));

    assert!(stdout.contains("particles: 12"), "{stdout}");
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("field.json");
    fs::write(&config, r#"{"line_opacity": 4.0}"#).unwrap();

    let mut command = neural_field();
    command.args(["simulate", "-n", "1", "--config"]).arg(&config);
    assert!(!succeeds(&mut command));
}

#[test]
fn empty_viewport_fails() {
    let mut command = neural_field();
    command.args(["simulate", "-n", "1", "--width", "0"]);
    assert!(!succeeds(&mut command));
}

#[test]
fn snapshot_writes_svg_frame() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("frame.svg");

    let stdout = stdout_of(neural_field().args([
        "snapshot",
        "--seed",
        "1",
        "-n",
        "5",
        "-o",
        output.to_str().unwrap(),
    ]));
    assert!(stdout.contains("Wrote frame 5"), "{stdout}");

    let svg = fs::read_to_string(&output).expect("Failed to read frame.svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="800""#));
    assert_eq!(svg.matches("<circle").count(), 60);
}

#[test]
fn snapshot_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a.svg");
    let second = dir.path().join("b.svg");

    for path in [&first, &second] {
        let mut command = neural_field();
        command
            .args(["snapshot", "--seed", "42", "-n", "30", "--cursor", "400,300", "-o"])
            .arg(path);
        assert!(succeeds(&mut command));
    }

    assert_eq!(
        fs::read_to_string(first).unwrap(),
        fs::read_to_string(second).unwrap()
    );
}

#[test]
fn preview_writes_page() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site");

    let mut command = neural_field();
    command
        .args(["preview", "--title", "Particles", "-o"])
        .arg(&output);
    assert!(succeeds(&mut command));

    let html =
        fs::read_to_string(output.join("index.html")).expect("index.html was not generated");
    assert!(html.contains("<title>Particles</title>"));
    assert!(html.contains("neural_field_web.js"));
    assert!(html.contains("unmount"));
}

#[test]
fn preview_copies_wasm_package() {
    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("pkg");
    let output = dir.path().join("site");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("neural_field_web.js"), "export default function init() {}").unwrap();
    fs::write(pkg.join("neural_field_web_bg.wasm"), [0u8, 97, 115, 109]).unwrap();

    let mut command = neural_field();
    command
        .args(["preview", "-o"])
        .arg(&output)
        .arg("--pkg")
        .arg(&pkg);
    assert!(succeeds(&mut command));

    assert!(output.join("neural_field_web.js").exists());
    assert!(output.join("neural_field_web_bg.wasm").exists());
}

#[test]
fn preview_rejects_missing_package() {
    let dir = TempDir::new().unwrap();

    let mut command = neural_field();
    command
        .args(["preview", "-o"])
        .arg(dir.path().join("site"))
        .arg("--pkg")
        .arg(dir.path().join("missing"));
    assert!(!succeeds(&mut command));
}
