//! Hand-off to the external program.
//!
//! The program runs with inherited stdio and the parent's environment plus
//! the overrides computed by [`build_env`]. The caller waits for it to exit.

use std::collections::BTreeMap;
use std::io::ErrorKind;

use thiserror::Error;
use tokio::process::Command;

use crate::config::{Config, Slot, Toggle};
use crate::errors::mask_secret;

pub const DEFAULT_PROGRAM: &str = "claude";
pub const BASE_URL_VAR: &str = "ANTHROPIC_BASE_URL";
pub const AUTH_TOKEN_VAR: &str = "ANTHROPIC_AUTH_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Success,
    NotFound,
    ExitedWithCode(i32),
    /// The program exists but could not be started.
    Failed(String),
}

/// Why a launch did not happen or did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Base URL and API key are required.")]
    MissingCredentials,
    #[error("OPUS, SONNET, and HAIKU selections are required.")]
    UnresolvedModels,
    #[error("Could not find '{0}' on PATH.")]
    NotFound(String),
    #[error("{program} exited with code {code}.")]
    Exited { program: String, code: i32 },
    #[error("Failed to start {program}: {message}")]
    Spawn { program: String, message: String },
}

pub trait Launcher {
    fn program(&self) -> &str;

    /// Runs the program to completion.
    async fn run(&self, env: &BTreeMap<String, String>, args: &[String]) -> LaunchOutcome;
}

#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    program: String,
}

impl ProcessLauncher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Launcher for ProcessLauncher {
    fn program(&self) -> &str {
        &self.program
    }

    async fn run(&self, env: &BTreeMap<String, String>, args: &[String]) -> LaunchOutcome {
        let status = Command::new(&self.program)
            .args(args)
            .envs(env)
            .status()
            .await;

        match status {
            Ok(status) if status.success() => LaunchOutcome::Success,
            // No exit code means the child was killed by a signal.
            Ok(status) => LaunchOutcome::ExitedWithCode(status.code().unwrap_or(-1)),
            Err(err) if err.kind() == ErrorKind::NotFound => LaunchOutcome::NotFound,
            Err(err) => LaunchOutcome::Failed(err.to_string()),
        }
    }
}

impl LaunchOutcome {
    pub fn into_result(self, program: &str) -> Result<(), LaunchError> {
        match self {
            LaunchOutcome::Success => Ok(()),
            LaunchOutcome::NotFound => Err(LaunchError::NotFound(program.to_string())),
            LaunchOutcome::ExitedWithCode(code) => Err(LaunchError::Exited {
                program: program.to_string(),
                code,
            }),
            LaunchOutcome::Failed(message) => Err(LaunchError::Spawn {
                program: program.to_string(),
                message,
            }),
        }
    }
}

/// Environment overrides for the launched program. With `masked` the auth
/// token is shortened for display.
pub fn build_env(config: &Config, masked: bool) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    let api_key = config.api_key.trim();
    env.insert(BASE_URL_VAR.to_string(), config.base_url.trim().to_string());
    env.insert(
        AUTH_TOKEN_VAR.to_string(),
        if masked {
            mask_secret(api_key)
        } else {
            api_key.to_string()
        },
    );
    for slot in Slot::ALL {
        let binding = config.models.get(slot);
        if let (true, Some(id)) = (binding.is_resolved(), binding.id.as_deref()) {
            env.insert(slot.env_var().to_string(), id.trim().to_string());
        }
    }
    for toggle in Toggle::ALL {
        let value = if config.toggle(toggle) { "1" } else { "0" };
        env.insert(toggle.key().to_string(), value.to_string());
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelBinding;

    fn configured() -> Config {
        let mut config = Config::default();
        config.base_url = " http://proxy:8317 ".to_string();
        config.api_key = "sk-0123456789".to_string();
        config.models.opus = ModelBinding::new("anthropic", "opus-x");
        config.models.haiku = ModelBinding::new("anthropic", "haiku-x");
        config
    }

    #[test]
    fn env_projection_covers_resolved_slots_and_toggles() {
        let env = build_env(&configured(), false);
        assert_eq!(env[BASE_URL_VAR], "http://proxy:8317");
        assert_eq!(env[AUTH_TOKEN_VAR], "sk-0123456789");
        assert_eq!(env["ANTHROPIC_DEFAULT_OPUS_MODEL"], "opus-x");
        assert_eq!(env["ANTHROPIC_DEFAULT_HAIKU_MODEL"], "haiku-x");
        assert!(!env.contains_key("ANTHROPIC_DEFAULT_SONNET_MODEL"));
        assert_eq!(env["CLAUDE_CODE_ENABLE_TELEMETRY"], "0");
        assert_eq!(env["DISABLE_COST_WARNINGS"], "1");
        assert_eq!(env["CLAUDE_CODE_DISABLE_NONESSENTIAL_TRAFFIC"], "1");
    }

    #[test]
    fn masked_env_hides_token() {
        let env = build_env(&configured(), true);
        assert_eq!(env[AUTH_TOKEN_VAR], "sk-0...6789");
    }

    #[test]
    fn outcomes_map_to_messages() {
        assert_eq!(LaunchOutcome::Success.into_result("claude"), Ok(()));
        assert_eq!(
            LaunchOutcome::NotFound.into_result("claude").unwrap_err().to_string(),
            "Could not find 'claude' on PATH."
        );
        assert_eq!(
            LaunchOutcome::ExitedWithCode(2)
                .into_result("claude")
                .unwrap_err()
                .to_string(),
            "claude exited with code 2."
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_launcher_reports_exit_codes() {
        let env = BTreeMap::new();
        let ok = ProcessLauncher::new("true").run(&env, &[]).await;
        assert_eq!(ok, LaunchOutcome::Success);

        let failed = ProcessLauncher::new("sh")
            .run(&env, &["-c".to_string(), "exit 7".to_string()])
            .await;
        assert_eq!(failed, LaunchOutcome::ExitedWithCode(7));

        let missing = ProcessLauncher::new("ccode-no-such-program-xyz").run(&env, &[]).await;
        assert_eq!(missing, LaunchOutcome::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_launcher_passes_environment() {
        let mut env = BTreeMap::new();
        env.insert("CCODE_MARKER".to_string(), "42".to_string());
        let outcome = ProcessLauncher::new("sh")
            .run(&env, &["-c".to_string(), "test \"$CCODE_MARKER\" = 42".to_string()])
            .await;
        assert_eq!(outcome, LaunchOutcome::Success);
    }
}
