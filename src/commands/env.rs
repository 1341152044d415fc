use std::collections::BTreeMap;

use crate::app::Runtime;
use crate::config::ConfigStore;
use crate::errors::CliError;
use crate::launcher::build_env;

pub fn handle(runtime: &Runtime) -> Result<(), CliError> {
    let config = runtime.store().load();
    runtime.output.print_verbose(&format!(
        "Config: {}",
        runtime.config_path.display()
    ));
    let env = build_env(&config, true);

    if runtime.output.json {
        return runtime.output.print_json(&env);
    }
    runtime.output.print_human(&render(&env));
    Ok(())
}

fn render(env: &BTreeMap<String, String>) -> String {
    env.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ModelBinding};

    #[test]
    fn token_is_masked_and_unresolved_slots_are_skipped() {
        let mut config = Config::default();
        config.api_key = "sk-1234567890".to_string();
        config.models.sonnet = ModelBinding::new("anthropic", "sonnet-x");

        let text = render(&build_env(&config, true));

        assert!(text.contains("ANTHROPIC_AUTH_TOKEN=sk-1...7890"));
        assert!(text.contains("ANTHROPIC_BASE_URL=http://127.0.0.1:8317"));
        assert!(text.contains("ANTHROPIC_DEFAULT_SONNET_MODEL=sonnet-x"));
        assert!(!text.contains("ANTHROPIC_DEFAULT_OPUS_MODEL"));
        assert!(text.contains("CLAUDE_CODE_ENABLE_TELEMETRY=0"));
        assert!(text.contains("DISABLE_COST_WARNINGS=1"));
    }
}
