use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

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
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        seed_claude_fixture(&home);

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
        }
    }

    fn log_dir(&self) -> PathBuf {
        self.xdg_state.join("tally")
    }
}

fn seed_claude_fixture(home: &Path) {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tally-core/tests/fixtures/claude-code/dedup-edit-session.jsonl");
    let target = home
        .join(".claude/projects/-home-u-p")
        .join("5f1e9a2c-0b7d-4e3a-8c6f-1d2e3f4a5b6c.jsonl");

    fs::create_dir_all(target.parent().expect("missing fixture parent"))
        .expect("failed to create claude fixture directories");
    fs::copy(source, target).expect("failed to copy claude fixture");
}

fn run_tally(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("tally"));

    Command::new(bin_path)
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to execute tally: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "tally {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn scan_lists_claude_project() {
    let env = CliTestEnv::new();

    let output = run_tally(&env, &["scan"]);
    assert_success(&["scan"], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Found 1 project(s)"),
        "expected one project, got:\n{stdout}"
    );
    assert!(stdout.contains("/home/u/p"));
    assert!(stdout.contains("Claude Code"));

    assert!(
        env.log_dir().exists(),
        "log directory should exist at {}",
        env.log_dir().display()
    );
}

#[test]
fn scan_json_is_machine_readable() {
    let env = CliTestEnv::new();

    let output = run_tally(&env, &["scan", "--json"]);
    assert_success(&["scan", "--json"], &output);

    let projects: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("scan --json should print JSON");
    let projects = projects.as_array().expect("expected a JSON array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["path"], "/home/u/p");
    assert_eq!(projects[0]["sources"][0], "claude_code");
    assert_eq!(projects[0]["session_files"].as_array().map(Vec::len), Some(1));
}

#[test]
fn stats_reports_deduplicated_totals() {
    let env = CliTestEnv::new();

    let output = run_tally(&env, &["stats", "--json"]);
    assert_success(&["stats", "--json"], &output);

    let stats: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stats --json should print JSON");
    assert_eq!(stats["total_projects"], 1);
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["message_count"], 4);
    assert_eq!(stats["tokens"]["output"], 22);
    assert_eq!(stats["tool_usage"]["Edit"], 1);
    assert_eq!(stats["lines_added"], 5);
    assert_eq!(stats["lines_removed"], 3);
    assert_eq!(stats["timeline"][0]["date"], "2025-03-01");

    let text = run_tally(&env, &["stats", "--project", "p"]);
    assert_success(&["stats", "--project", "p"], &text);
    let stdout = String::from_utf8_lossy(&text.stdout);
    assert!(stdout.contains("Project: /home/u/p"));
    assert!(stdout.contains("Lines:     +5 -3"));
}

#[test]
fn session_lookup_and_missing_session() {
    let env = CliTestEnv::new();
    let id = "5f1e9a2c-0b7d-4e3a-8c6f-1d2e3f4a5b6c";

    let output = run_tally(&env, &["session", id]);
    assert_success(&["session", id], &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tool uses: 1"));
    assert!(stdout.contains("(Claude Code)"));

    let missing = run_tally(&env, &["session", "nope"]);
    assert!(!missing.status.success());
    let stderr = String::from_utf8_lossy(&missing.stderr);
    assert!(
        stderr.contains("session not found: nope"),
        "expected not-found error, got:\n{stderr}"
    );
}

#[test]
fn claude_dir_flag_overrides_default() {
    let env = CliTestEnv::new();
    let empty = env.home.join("empty-projects");
    fs::create_dir_all(&empty).expect("failed to create empty projects dir");
    let empty = empty.to_string_lossy().into_owned();

    let args = ["--claude-dir", empty.as_str(), "scan"];
    let output = run_tally(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 0 project(s)"));
}
