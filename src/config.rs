use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::errors::CliError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8317";

// ============================================================================
// Model slots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Opus,
    Sonnet,
    Haiku,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Opus, Slot::Sonnet, Slot::Haiku];

    pub fn key(self) -> &'static str {
        match self {
            Slot::Opus => "opus",
            Slot::Sonnet => "sonnet",
            Slot::Haiku => "haiku",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Opus => "OPUS",
            Slot::Sonnet => "SONNET",
            Slot::Haiku => "HAIKU",
        }
    }

    /// Variable that carries this slot's model id to the launched program.
    pub fn env_var(self) -> &'static str {
        match self {
            Slot::Opus => "ANTHROPIC_DEFAULT_OPUS_MODEL",
            Slot::Sonnet => "ANTHROPIC_DEFAULT_SONNET_MODEL",
            Slot::Haiku => "ANTHROPIC_DEFAULT_HAIKU_MODEL",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelBinding {
    pub owner: Option<String>,
    pub id: Option<String>,
}

impl ModelBinding {
    #[cfg(test)]
    pub fn new(owner: &str, id: &str) -> Self {
        Self {
            owner: Some(owner.to_string()),
            id: Some(id.to_string()),
        }
    }

    /// Both owner and id are set to non-empty values.
    pub fn is_resolved(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.owner) && filled(&self.id)
    }

    pub fn is_unset(&self) -> bool {
        self.owner.is_none() && self.id.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Models {
    pub opus: ModelBinding,
    pub sonnet: ModelBinding,
    pub haiku: ModelBinding,
}

impl Models {
    pub fn get(&self, slot: Slot) -> &ModelBinding {
        match slot {
            Slot::Opus => &self.opus,
            Slot::Sonnet => &self.sonnet,
            Slot::Haiku => &self.haiku,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut ModelBinding {
        match slot {
            Slot::Opus => &mut self.opus,
            Slot::Sonnet => &mut self.sonnet,
            Slot::Haiku => &mut self.haiku,
        }
    }
}

// ============================================================================
// Feature toggles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toggle {
    EnableTelemetry,
    DisableCostWarnings,
    DisableNonessentialTraffic,
}

impl Toggle {
    pub const ALL: [Toggle; 3] = [
        Toggle::EnableTelemetry,
        Toggle::DisableCostWarnings,
        Toggle::DisableNonessentialTraffic,
    ];

    /// Storage key, also the environment variable name.
    pub fn key(self) -> &'static str {
        match self {
            Toggle::EnableTelemetry => "CLAUDE_CODE_ENABLE_TELEMETRY",
            Toggle::DisableCostWarnings => "DISABLE_COST_WARNINGS",
            Toggle::DisableNonessentialTraffic => "CLAUDE_CODE_DISABLE_NONESSENTIAL_TRAFFIC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Toggle::EnableTelemetry => "ENABLE TELEMETRY",
            Toggle::DisableCostWarnings => "DISABLE COST WARNINGS",
            Toggle::DisableNonessentialTraffic => "DISABLE NONESSENTIAL TRAFFIC",
        }
    }

    pub fn default_value(self) -> bool {
        match self {
            Toggle::EnableTelemetry => false,
            Toggle::DisableCostWarnings => true,
            Toggle::DisableNonessentialTraffic => true,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub models: Models,
    pub toggles: BTreeMap<Toggle, bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            models: Models::default(),
            toggles: Toggle::ALL
                .iter()
                .map(|t| (*t, t.default_value()))
                .collect(),
        }
    }
}

impl Config {
    pub fn toggle(&self, toggle: Toggle) -> bool {
        self.toggles
            .get(&toggle)
            .copied()
            .unwrap_or_else(|| toggle.default_value())
    }

    pub fn set_toggle(&mut self, toggle: Toggle, value: bool) {
        self.toggles.insert(toggle, value);
    }

    /// Builds a config from stored JSON, keeping defaults for anything
    /// missing or of the wrong type.
    pub fn from_json(payload: &Value) -> Self {
        let mut config = Config::default();
        let Some(root) = payload.as_object() else {
            return config;
        };

        if let Some(url) = root.get("base_url").and_then(|v| v.as_str()) {
            config.base_url = url.to_string();
        }
        if let Some(key) = root.get("api_key").and_then(|v| v.as_str()) {
            config.api_key = key.to_string();
        }

        if let Some(models) = root.get("models").and_then(|v| v.as_object()) {
            for slot in Slot::ALL {
                let Some(entry) = models.get(slot.key()).and_then(|v| v.as_object()) else {
                    continue;
                };
                let text = |name: &str| entry.get(name).and_then(|v| v.as_str()).map(str::to_string);
                *config.models.get_mut(slot) = ModelBinding {
                    owner: text("owned_by"),
                    id: text("id"),
                };
            }
        }

        if let Some(toggles) = root.get("toggles").and_then(|v| v.as_object()) {
            for toggle in Toggle::ALL {
                match toggles.get(toggle.key()) {
                    Some(Value::Bool(b)) => config.set_toggle(toggle, *b),
                    Some(Value::Number(n)) => match n.as_u64() {
                        Some(0) => config.set_toggle(toggle, false),
                        Some(1) => config.set_toggle(toggle, true),
                        _ => {}
                    },
                    _ => {}
                }
            }
        }

        config
    }

    pub fn to_json(&self) -> Value {
        let mut models = Map::new();
        for slot in Slot::ALL {
            let binding = self.models.get(slot);
            models.insert(
                slot.key().to_string(),
                json!({ "owned_by": binding.owner, "id": binding.id }),
            );
        }

        let mut toggles = Map::new();
        for toggle in Toggle::ALL {
            toggles.insert(toggle.key().to_string(), json!(u8::from(self.toggle(toggle))));
        }

        json!({
            "base_url": self.base_url,
            "api_key": self.api_key,
            "models": models,
            "toggles": toggles,
        })
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Where configuration lives between runs.
pub trait ConfigStore {
    /// Never fails; unreadable or malformed storage yields defaults.
    fn load(&self) -> Config;
    fn save(&mut self, config: &Config) -> Result<(), CliError>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Config {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %err, "config unreadable, using defaults");
                }
                return Config::default();
            }
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(payload) => Config::from_json(&payload),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "config is not valid JSON, using defaults");
                Config::default()
            }
        }
    }

    fn save(&mut self, config: &Config) -> Result<(), CliError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| CliError::Generic("Invalid config path.".to_string()))?;
        fs::create_dir_all(parent)?;
        fs::write(&self.path, serde_json::to_string_pretty(&config.to_json())?)?;
        Ok(())
    }
}

pub fn config_dir() -> Result<PathBuf, CliError> {
    let home = dirs::home_dir().ok_or_else(|| {
        CliError::Generic("Could not resolve home directory for this OS.".to_string())
    })?;
    Ok(home.join(".ccode"))
}

pub fn config_path() -> Result<PathBuf, CliError> {
    Ok(config_dir()?.join("config.json"))
}
