use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn murmur() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_murmur"));
    cmd.env_remove("RUST_LOG")
        .env_remove("MURMUR_LOG_LEVEL")
        .env_remove("TON_PRIVATE_KEY")
        .env_remove("TON_RPC_URL")
        .env("MURMUR_LOGGING__LEVEL", "warn");
    cmd
}

fn run_murmur(args: &[&str]) -> Output {
    murmur()
        .args(args)
        .output()
        .expect("Failed to execute murmur command")
}

fn run_murmur_with_env(args: &[&str], env_vars: Vec<(&str, &str)>) -> Output {
    let mut cmd = murmur();
    cmd.args(args);
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute murmur command")
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let output = run_murmur(&["version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("murmur"));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_version_command_detailed() {
        let output = run_murmur(&["version", "--detailed"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("Version:"));
        assert!(stdout.contains("License:"));
        assert!(stdout.contains("ton"));
    }

    #[test]
    fn test_help_command() {
        let output = run_murmur(&["--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("run"));
        assert!(stdout.contains("validate-ton"));
        assert!(stdout.contains("version"));
    }
}

mod run_command_tests {
    use super::*;

    #[test]
    fn test_run_default_conversation() {
        let output = run_murmur(&["run"]);
        let stdout = output_to_string(&output);

        assert!(
            output.status.success(),
            "run failed: {}",
            stderr_to_string(&output)
        );
        assert!(stdout.contains("Alice's perspective"));
        assert!(stdout.contains("Bob's perspective"));
        assert!(stdout.contains("Hello everyone!"));
        assert!(stdout.contains("Previous reply in history..."));
    }

    #[test]
    fn test_run_json_output() {
        let output = run_murmur(&["run", "--format", "json", "--agents", "Carol,Dave"]);
        assert!(output.status.success(), "{}", stderr_to_string(&output));

        let outcome: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
        assert_eq!(outcome["scenario"], "default-conversation");
        assert_eq!(outcome["messages_sent"], 2);

        let perspectives = outcome["logs"][0]["perspectives"].as_array().unwrap();
        assert_eq!(perspectives.len(), 2);
        assert_eq!(perspectives[1]["agent_name"], "Dave");
        assert_eq!(perspectives[1]["lines"][2]["text"], "Hello everyone!");
        assert_eq!(perspectives[1]["lines"][2]["sender"], "Carol");
    }

    #[test]
    fn test_run_single_agent_rejected() {
        let output = run_murmur(&["run", "--agents", "Solo"]);

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("E4001"));
    }

    #[test]
    fn test_run_script_file() {
        let mut script = NamedTempFile::new().unwrap();
        script
            .write_all(
                br#"
name = "echo-chamber"

[[steps]]
action = "create_rooms"

[[steps]]
action = "send"
sender = 1
text = "Is anyone there?"

[[steps]]
action = "collect"
"#,
            )
            .unwrap();

        let path = script.path().to_str().unwrap();
        let output = run_murmur(&["run", "--script", path, "--format", "json"]);
        assert!(output.status.success(), "{}", stderr_to_string(&output));

        let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(outcome["scenario"], "echo-chamber");
        assert_eq!(outcome["messages_saved"], 0);
        assert_eq!(
            outcome["logs"][0]["perspectives"][0]["lines"][0]["text"],
            "Is anyone there?"
        );
    }

    #[test]
    fn test_run_demo_script() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../demos/standup.toml");
        let output = run_murmur(&["run", "--script", path, "--agents", "Alice,Bob,Carol"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "{}", stderr_to_string(&output));
        assert!(stdout.contains("standup"));
        assert!(stdout.contains("Carol's perspective"));
        assert!(stdout.contains("Anything blocking today?"));
    }

    #[test]
    fn test_run_missing_script() {
        let output = run_murmur(&["run", "--script", "/nonexistent/scenario.toml"]);

        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("Failed to load scenario"));
    }
}

mod validate_ton_tests {
    use super::*;

    #[test]
    fn test_validate_ton_from_flags() {
        let output = run_murmur(&[
            "validate-ton",
            "--private-key",
            "abcdef123456",
            "--rpc-url",
            "http://x",
        ]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "{}", stderr_to_string(&output));
        assert!(stdout.contains("********3456"));
        assert!(!stdout.contains("abcdef123456"));
        assert!(stdout.contains("http://x"));
    }

    #[test]
    fn test_validate_ton_env_fallback() {
        let output = run_murmur_with_env(
            &["validate-ton", "--private-key", ""],
            vec![("TON_PRIVATE_KEY", "from-env-key"), ("TON_RPC_URL", "")],
        );

        assert!(output.status.success(), "{}", stderr_to_string(&output));
        assert!(output_to_string(&output).contains("(empty)"));
    }

    #[test]
    fn test_validate_ton_missing() {
        let output = run_murmur(&["validate-ton"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("Ton configuration validation failed:"));
        assert!(stderr.contains("TON_PRIVATE_KEY: Required"));
        assert!(stderr.contains("TON_RPC_URL: Required"));
    }
}
