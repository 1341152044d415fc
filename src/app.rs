use std::path::PathBuf;

use crate::api::ApiClient;
use crate::config::FileStore;
use crate::errors::CliError;
use crate::launcher::ProcessLauncher;
use crate::output::OutputMode;

/// Process-wide settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub output: OutputMode,
    pub config_path: PathBuf,
    pub program: String,
    pub timeout_ms: u64,
}

impl Runtime {
    pub fn store(&self) -> FileStore {
        FileStore::new(self.config_path.clone())
    }

    pub fn api_client(&self) -> Result<ApiClient, CliError> {
        ApiClient::new(self.timeout_ms)
    }

    pub fn launcher(&self) -> ProcessLauncher {
        ProcessLauncher::new(self.program.clone())
    }
}
