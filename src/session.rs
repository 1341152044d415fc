use crate::api::CatalogSource;
use crate::catalog::{self, CatalogEntry, OwnerIndex, Step};
use crate::config::{Config, ConfigStore, ModelBinding, Slot, Toggle};
use crate::launcher::{LaunchError, Launcher, build_env};

pub const MISSING_CREDENTIALS_HINT: &str = "Base URL and API key are required. Open config with c.";
pub const REFRESHED_STATUS: &str = "Models refreshed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    BaseUrl,
    ApiKey,
}

/// Owns the configuration, the fetched catalog and the status line, and
/// talks to the storage, catalog and launcher collaborators.
pub struct Session<S, C, L> {
    config: Config,
    store: S,
    source: C,
    launcher: L,
    catalog: Option<Vec<CatalogEntry>>,
    index: OwnerIndex,
    status: String,
    args: Vec<String>,
}

impl<S: ConfigStore, C: CatalogSource, L: Launcher> Session<S, C, L> {
    pub fn new(store: S, source: C, launcher: L, args: Vec<String>) -> Self {
        let config = store.load();
        Self {
            config,
            store,
            source,
            launcher,
            catalog: None,
            index: OwnerIndex::new(),
            status: String::new(),
            args,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[cfg(test)]
    pub fn index(&self) -> &OwnerIndex {
        &self.index
    }

    #[cfg(test)]
    pub fn catalog(&self) -> Option<&[CatalogEntry]> {
        self.catalog.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.config) {
            tracing::warn!(error = %err, "failed to save config");
        }
    }

    pub async fn refresh(&mut self) {
        self.clear_status();
        let base_url = self.config.base_url.trim().to_string();
        let api_key = self.config.api_key.trim().to_string();
        if base_url.is_empty() || api_key.is_empty() {
            self.status = MISSING_CREDENTIALS_HINT.to_string();
            return;
        }

        tracing::info!(%base_url, "refreshing model catalog");
        match self.source.fetch(&base_url, &api_key).await {
            Ok(entries) => {
                tracing::info!(count = entries.len(), "catalog refreshed");
                self.index = catalog::group_by_owner(&entries);
                let changed = catalog::reconcile(&mut self.config.models, &entries);
                self.catalog = Some(entries);
                if changed {
                    tracing::info!("cleared model selections missing from catalog");
                    self.persist();
                }
                self.status = REFRESHED_STATUS.to_string();
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog refresh failed");
                self.status = err.to_string();
            }
        }
    }

    pub fn validate_launch(&self) -> Result<(), LaunchError> {
        if self.config.base_url.trim().is_empty() || self.config.api_key.trim().is_empty() {
            return Err(LaunchError::MissingCredentials);
        }
        if Slot::ALL
            .iter()
            .any(|slot| !self.config.models.get(*slot).is_resolved())
        {
            return Err(LaunchError::UnresolvedModels);
        }
        Ok(())
    }

    pub async fn launch(&self) -> Result<(), LaunchError> {
        self.validate_launch()?;
        let env = build_env(&self.config, false);
        let program = self.launcher.program().to_string();
        tracing::info!(%program, args = ?self.args, "launching program");
        let outcome = self.launcher.run(&env, &self.args).await;
        tracing::info!(?outcome, "program finished");
        outcome.into_result(&program)
    }

    // ------------------------------------------------------------------------
    // Edits from the screens. Each one persists immediately.
    // ------------------------------------------------------------------------

    pub fn cycle_owner(&mut self, slot: Slot, step: Step) {
        let owners = catalog::owners(&self.index);
        if owners.is_empty() {
            return;
        }
        let current = self.config.models.get(slot).owner.clone();
        let owner = catalog::advance(&owners, current.as_deref(), step);
        *self.config.models.get_mut(slot) = ModelBinding { owner, id: None };
        self.persist();
    }

    pub fn cycle_model(&mut self, slot: Slot, step: Step) {
        let binding = self.config.models.get(slot);
        let Some(owner) = binding.owner.clone().filter(|o| !o.is_empty()) else {
            return;
        };
        let ids = catalog::ids_for(&self.index, &owner);
        if ids.is_empty() {
            return;
        }
        let id = catalog::advance(ids, binding.id.as_deref(), step);
        *self.config.models.get_mut(slot) = ModelBinding {
            owner: Some(owner),
            id,
        };
        self.persist();
    }

    pub fn flip_toggle(&mut self, toggle: Toggle) {
        let value = self.config.toggle(toggle);
        self.config.set_toggle(toggle, !value);
        self.persist();
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::BaseUrl => &self.config.base_url,
            TextField::ApiKey => &self.config.api_key,
        }
    }

    pub fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::BaseUrl => self.config.base_url = value,
            TextField::ApiKey => self.config.api_key = value,
        }
        self.persist();
    }
}
