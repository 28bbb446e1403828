use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "streetwise-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_output() {
    let exe = env!("CARGO_BIN_EXE_streetwise-tester");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    assert!(content.contains("Available strategies"));
    for key in ["cautious", "hustler", "random"] {
        assert!(content.contains(key), "missing {key}");
    }
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_json_report_with_determinism_check() {
    let exe = env!("CARGO_BIN_EXE_streetwise-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--modes",
            "normal,chaos",
            "--strategies",
            "cautious,random",
            "--seeds",
            "1,2",
            "--iterations",
            "2",
            "--max-days",
            "15",
            "--report",
            "json",
            "--verify-determinism",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let content = std::fs::read_to_string(&output_path).expect("read output");
    let report: serde_json::Value = serde_json::from_str(&content).expect("json report");
    assert_eq!(report["runs"].as_array().map(Vec::len), Some(2 * 2 * 2 * 2));
    assert_eq!(report["aggregates"].as_array().map(Vec::len), Some(4));
    assert_eq!(report["determinismVerified"], true);
    assert_eq!(report["maxDays"], 15);
    for run in report["runs"].as_array().into_iter().flatten() {
        assert!(run["daysSurvived"].as_u64().is_some_and(|days| days <= 15));
    }
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_markdown_report() {
    let exe = env!("CARGO_BIN_EXE_streetwise-tester");
    let output = Command::new(exe)
        .args([
            "--modes",
            "chaos",
            "--strategies",
            "hustler",
            "--iterations",
            "3",
            "--max-days",
            "10",
            "--report",
            "markdown",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Streetwise Playthrough Results"));
    assert!(stdout.contains("| chaos | hustler | 3 |"));
}

#[test]
fn cli_rejects_unknown_strategy() {
    let exe = env!("CARGO_BIN_EXE_streetwise-tester");
    let output = Command::new(exe)
        .args(["--strategies", "reckless", "--iterations", "1"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown strategy: reckless"));
}
