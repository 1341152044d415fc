use serde_json::json;

use crate::api::CatalogSource;
use crate::app::Runtime;
use crate::catalog::{self, CatalogEntry};
use crate::config::{Config, ConfigStore, Slot};
use crate::errors::CliError;
use crate::output::format_rows;

pub async fn handle(runtime: &Runtime) -> Result<(), CliError> {
    let config = runtime.store().load();
    let base_url = config.base_url.trim();
    let api_key = config.api_key.trim();
    if base_url.is_empty() || api_key.is_empty() {
        return Err(CliError::Usage(
            "Base URL and API key are required. Run `ccode` and open config with c.".to_string(),
        ));
    }

    runtime
        .output
        .print_verbose(&format!("Fetching models from {base_url}"));
    let client = runtime.api_client()?;
    let entries = client
        .fetch(base_url, api_key)
        .await
        .map_err(|err| CliError::Network(err.to_string()))?;

    if runtime.output.json {
        return runtime.output.print_json(&json!({ "data": entries }));
    }

    if entries.is_empty() {
        runtime.output.print_human("No models available.");
        return Ok(());
    }
    runtime.output.print_human(&listing(&config, &entries));
    Ok(())
}

/// Catalog grouped by owner, marking the ids bound to a slot.
fn listing(config: &Config, entries: &[CatalogEntry]) -> String {
    let index = catalog::group_by_owner(entries);
    let mut sections = Vec::new();
    for (owner, ids) in &index {
        let rows: Vec<(String, String)> = ids
            .iter()
            .map(|id| {
                let slots: Vec<&str> = Slot::ALL
                    .iter()
                    .filter(|slot| {
                        let binding = config.models.get(**slot);
                        binding.owner.as_deref() == Some(owner.as_str())
                            && binding.id.as_deref() == Some(id.as_str())
                    })
                    .map(|slot| slot.label())
                    .collect();
                (format!("  {id}"), slots.join(", "))
            })
            .collect();
        sections.push(format!("{owner}\n{}", format_rows(&rows, "  ")));
    }
    sections.join("\n\n")
}
