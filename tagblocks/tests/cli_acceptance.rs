use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const CONFIG: &str = r#"
[blocks]
definitions = '[{"html":"<p>rust block</p>","tags":["rust"],"placementID":"p-rust","campaignID":"c-1"},{"html":"<p>go block</p>","tags":["go"],"placementID":"p-go"}]'

[reporting]
category_id = 7
"#;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(xdg_config.join("tagblocks"))
            .expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn with_config(self) -> Self {
        fs::write(self.xdg_config.join("tagblocks/config.toml"), CONFIG)
            .expect("failed to write config");
        self
    }
}

fn run_bin(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("tagblocks"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute tagblocks: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "tagblocks {} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        output.status,
        stdout,
        stderr
    );
}

#[test]
fn status_without_config_reports_unconfigured() {
    let env = CliTestEnv::new();

    let output = run_bin(&env, &["status"]);
    assert_success(&["status"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tagblocks Configuration"));
    assert!(stdout.contains("Blocks:          0"));
    assert!(stdout.contains("Endpoint:      (not set)"));
}

#[test]
fn status_reads_config_file() {
    let env = CliTestEnv::new().with_config();

    let output = run_bin(&env, &["status"]);
    assert_success(&["status"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Blocks:          2"));
    assert!(stdout.contains("Category ID:   7"));
}

#[test]
fn select_lists_matching_blocks() {
    let env = CliTestEnv::new().with_config();
    let args = ["select", "--tags", "rust,python"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[0] placement=p-rust campaign=c-1"));
    assert!(stdout.contains("<p>rust block</p>"));
    assert!(!stdout.contains("p-go"));
}

#[test]
fn select_json_output() {
    let env = CliTestEnv::new().with_config();
    let args = ["select", "--tags", "go", "--json"];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let blocks: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(blocks.as_array().map(Vec::len), Some(1));
    assert_eq!(blocks[0]["placementID"], "p-go");
    assert!(blocks[0]["campaignID"].is_null());
}

#[test]
fn click_without_endpoint_sends_nothing() {
    let env = CliTestEnv::new().with_config();
    let args = [
        "click",
        "--tags",
        "rust",
        "--page-url",
        "https://forum.test/t/topic/1",
        "--href",
        "/t/other/2",
    ];

    let output = run_bin(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tracking endpoint is not configured"));
    assert!(!stdout.contains("Navigate to:"));
}

#[test]
fn click_out_of_range_fails() {
    let env = CliTestEnv::new().with_config();

    let output = run_bin(
        &env,
        &[
            "click",
            "--tags",
            "rust",
            "--index",
            "3",
            "--page-url",
            "https://forum.test/",
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no block at index 3"));
}
