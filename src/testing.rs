// In-memory collaborators shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::api::{CatalogError, CatalogSource};
use crate::catalog::CatalogEntry;
use crate::config::{Config, ConfigStore, ModelBinding};
use crate::errors::CliError;
use crate::launcher::{LaunchOutcome, Launcher};
use crate::tui::Suspend;

pub fn resolved_config() -> Config {
    let mut config = Config::default();
    config.api_key = "sk-test-key".to_string();
    config.models.opus = ModelBinding::new("anthropic", "opus-x");
    config.models.sonnet = ModelBinding::new("anthropic", "sonnet-x");
    config.models.haiku = ModelBinding::new("anthropic", "haiku-x");
    config
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    initial: Config,
    saved: Vec<Config>,
}

impl MemoryStore {
    pub fn with(config: Config) -> Self {
        Self {
            initial: config,
            saved: Vec::new(),
        }
    }

    pub fn saves(&self) -> usize {
        self.saved.len()
    }

    pub fn last(&self) -> Option<Config> {
        self.saved.last().cloned()
    }
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Config {
        self.initial.clone()
    }

    fn save(&mut self, config: &Config) -> Result<(), CliError> {
        self.saved.push(config.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub struct StaticCatalog {
    result: Result<Vec<CatalogEntry>, CatalogError>,
    calls: Cell<usize>,
}

impl StaticCatalog {
    pub fn ok(entries: Vec<CatalogEntry>) -> Self {
        Self {
            result: Ok(entries),
            calls: Cell::new(0),
        }
    }

    pub fn err(error: CatalogError) -> Self {
        Self {
            result: Err(error),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CatalogSource for StaticCatalog {
    async fn fetch(&self, _base_url: &str, _api_key: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

type Run = (BTreeMap<String, String>, Vec<String>);

#[derive(Debug)]
pub struct RecordingLauncher {
    outcome: LaunchOutcome,
    runs: RefCell<Vec<Run>>,
}

impl RecordingLauncher {
    pub fn new(outcome: LaunchOutcome) -> Self {
        Self {
            outcome,
            runs: RefCell::new(Vec::new()),
        }
    }

    pub fn runs(&self) -> Vec<Run> {
        self.runs.borrow().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn program(&self) -> &str {
        "claude"
    }

    async fn run(&self, env: &BTreeMap<String, String>, args: &[String]) -> LaunchOutcome {
        self.runs.borrow_mut().push((env.clone(), args.to_vec()));
        self.outcome.clone()
    }
}

/// Stands in for the terminal and records suspend/resume calls.
#[derive(Debug, Default)]
pub struct RecordingTerminal {
    pub events: Vec<&'static str>,
    pub fail_suspend: bool,
}

impl Suspend for RecordingTerminal {
    fn suspend(&mut self) -> Result<(), CliError> {
        self.events.push("suspend");
        if self.fail_suspend {
            return Err(CliError::Terminal("Failed to disable raw mode".to_string()));
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), CliError> {
        self.events.push("resume");
        Ok(())
    }
}
