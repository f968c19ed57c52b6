//! End-to-end tests for the `twirl` binary.
//!
//! Every test runs the compiled binary in a scratch directory with `HOME`
//! redirected there, so no registry outside the test is read or written.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;
use twirl_ir::{Circuit, QubitId};

/// Helper: a `twirl` command isolated from the user's environment.
fn twirl(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_twirl"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("TWIRL_CONFIG")
        .env_remove("TWIRL_TOLERANCE")
        .env_remove("TWIRL_UNITARITY_TOLERANCE")
        .env_remove("TWIRL_PARALLEL")
        .env_remove("TWIRL_SEED")
        .env_remove("TWIRL_REGISTRY");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run twirl binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Helper: generate a cx/cz registry in `dir` and return its path.
fn small_registry(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("registry.json");
    let output = run(twirl(dir.path()).args(["generate", "--gates", "cx,cz", "-o"]).arg(&path));
    assert!(output.status.success(), "{}", stderr(&output));
    path
}

#[test]
fn test_generate_writes_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = small_registry(&dir);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let sets = value.as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0]["gate"], "cx");
    assert_eq!(sets[0]["entries"].as_array().unwrap().len(), 16);
    assert_eq!(sets[1]["gate"], "cz");
}

#[test]
fn test_generate_unknown_gate_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(twirl(dir.path()).args(["generate", "--gates", "cx,nope", "-o", "r.json"]));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope"));
    assert!(!dir.path().join("r.json").exists());
}

#[test]
fn test_generate_defaults_to_home_registry() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(twirl(dir.path()).args(["generate", "--gates", "swap"]));
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(dir.path().join(".twirl").join("registry.json").exists());
}

#[test]
fn test_show_json_with_and_without_phase() {
    let dir = tempfile::tempdir().unwrap();
    let registry = small_registry(&dir);

    let output = run(twirl(dir.path())
        .args(["show", "cx", "-f", "json", "--registry"])
        .arg(&registry));
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["gate"], "cx");
    let entries = value["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 16);
    assert!(entries.iter().any(|e| e["phase"] == "pi"));

    let output = run(twirl(dir.path())
        .args(["show", "cx", "-f", "json", "--no-phase", "--registry"])
        .arg(&registry));
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let assignments = value["assignments"].as_array().unwrap();
    assert_eq!(assignments.len(), 16);
    assert_eq!(assignments[0], "IIII");
}

#[test]
fn test_show_table_without_registry_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(twirl(dir.path()).args(["show", "cs"]));
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("(4 twirls)"));
}

#[test]
fn test_show_unknown_gate_fails() {
    let dir = tempfile::tempdir().unwrap();
    let registry = small_registry(&dir);
    let output = run(twirl(dir.path())
        .args(["show", "not_a_real_gate", "--registry"])
        .arg(&registry));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not_a_real_gate"));
}

#[test]
fn test_show_missing_registry_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(twirl(dir.path()).args(["show", "cx", "--registry", "absent.json"]));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Registry not found"));
}

#[test]
fn test_apply_demo_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let registry = small_registry(&dir);

    for out in ["a.json", "b.json"] {
        let output = run(twirl(dir.path())
            .args(["apply", "-g", "cx", "--demo", "ghz", "-q", "4", "-s", "7", "-o", out])
            .arg("--registry")
            .arg(&registry));
        assert!(output.status.success(), "{}", stderr(&output));
    }

    let a = std::fs::read_to_string(dir.path().join("a.json")).unwrap();
    let b = std::fs::read_to_string(dir.path().join("b.json")).unwrap();
    assert_eq!(a, b);

    let value: serde_json::Value = serde_json::from_str(&a).unwrap();
    assert_eq!(value["name"], "ghz_twirled");
    // h, three sandwiched cx, four measurements.
    assert_eq!(value["instructions"].as_array().unwrap().len(), 1 + 3 * 5 + 4);
}

#[test]
fn test_apply_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let registry = small_registry(&dir);

    let mut circuit = Circuit::with_size("pair", 2, 0);
    circuit
        .cz(QubitId(0), QubitId(1))
        .unwrap()
        .cx(QubitId(1), QubitId(0))
        .unwrap();
    let input = dir.path().join("pair.json");
    std::fs::write(&input, serde_json::to_string(&circuit.snapshot()).unwrap()).unwrap();

    let output = run(twirl(dir.path())
        .args(["apply", "-g", "cz,cx", "-s", "1", "-i"])
        .arg(&input)
        .arg("--registry")
        .arg(&registry));
    assert!(output.status.success(), "{}", stderr(&output));

    let twirled = std::fs::read_to_string(dir.path().join("pair_twirled.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&twirled).unwrap();
    assert_eq!(value["instructions"].as_array().unwrap().len(), 10);
}

#[test]
fn test_apply_without_circuit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(twirl(dir.path()).args(["apply", "-g", "cx"]));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("--input or --demo"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("twirl.yaml");
    std::fs::write(&config, "tolerance: -1.0\n").unwrap();

    let output = run(twirl(dir.path()).arg("--config").arg(&config).arg("gates"));
    assert!(!output.status.success());
}

#[test]
fn test_gates_and_version() {
    let dir = tempfile::tempdir().unwrap();

    let output = run(twirl(dir.path()).arg("gates"));
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    for gate in ["cx", "ecr", "iswap"] {
        assert!(text.contains(gate), "{gate}");
    }

    let output = run(twirl(dir.path()).arg("version"));
    assert!(output.status.success());
    assert!(stdout(&output).contains("Twirl"));
}
