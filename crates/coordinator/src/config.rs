//! Configuration for the coordinator.
//!
//! One TOML file with three sections: `[llm]`, `[routing]` and `[agents]`.
//! Every field has a default, so an empty file is a valid configuration.
//!
//! On Unix, [`CoordinatorConfig::from_file`] refuses world-writable files and
//! warns about API keys stored in readable files.

use crate::capabilities::CapabilitySet;
use crate::registry::HandlerRegistry;
use crate::routing::DEFAULT_CONFIDENCE;
use alchemy_agents::AgentsConfig;
use alchemy_common::{AgentConfig, IntentLabel, Result};
use alchemy_llm::{LlmClient, LlmConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Main coordinator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Generative text collaborator
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    /// Content generators
    #[serde(default)]
    pub agents: AgentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Confidence reported on every decision
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    #[serde(default)]
    pub tie_break_temperature: f32,

    /// Labels to register handlers for. All labels when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handlers: Option<Vec<IntentLabel>>,

    /// Replacement trigger phrases, per label
    #[serde(default)]
    pub triggers: BTreeMap<IntentLabel, Vec<String>>,
}

fn default_confidence() -> f32 {
    DEFAULT_CONFIDENCE
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            tie_break_temperature: 0.0,
            handlers: None,
            triggers: BTreeMap::new(),
        }
    }
}

impl CoordinatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        #[cfg(unix)]
        validate_config_file_permissions(path)?;

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e))?;

        let keyed_sections: Vec<&str> = [
            ("llm", config.llm.api_key.is_some()),
            ("agents.research", config.agents.research.serp_api_key.is_some()),
            ("agents.image", config.agents.image.api_key.is_some()),
        ]
        .into_iter()
        .filter_map(|(section, has_key)| has_key.then_some(section))
        .collect();

        if !keyed_sections.is_empty() {
            warn!(
                sections = ?keyed_sections,
                "API keys found in config file '{}'. Keep this file out of version control.",
                path.display()
            );
        }

        info!(path = %path.display(), provider = %config.llm.provider, "Loaded configuration");
        Ok(config)
    }

    /// Default trigger phrases with any per-label overrides applied.
    pub fn capability_set(&self) -> CapabilitySet {
        self.routing
            .triggers
            .iter()
            .fold(CapabilitySet::default(), |caps, (label, phrases)| {
                caps.with_triggers(*label, phrases)
            })
    }

    /// Build the generators selected by `routing.handlers`, or all of them.
    pub fn build_registry(&self, llm: Arc<dyn LlmClient>, base: &AgentConfig) -> Result<HandlerRegistry> {
        let selected = self.routing.handlers.as_deref().unwrap_or(IntentLabel::ALL.as_slice());
        let handlers = self.agents.build_handlers(llm, base, selected)?;
        Ok(handlers.into_iter().collect())
    }
}

/// Reject config files other users could rewrite.
#[cfg(unix)]
fn validate_config_file_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

    if !metadata.is_file() {
        anyhow::bail!("Config path '{}' is not a regular file.", path.display());
    }

    let permission_bits = metadata.permissions().mode() & 0o777;

    if permission_bits & 0o002 != 0 {
        anyhow::bail!(
            "Config file '{}' is world-writable (mode {:04o}). Fix with: chmod o-w {}",
            path.display(),
            permission_bits,
            path.display()
        );
    }

    if permission_bits & 0o044 != 0 {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.contains("api_key") {
            warn!(
                "Config file '{}' may contain an API key and is readable by others (mode {:04o}). \
                 Consider: chmod 600 {}",
                path.display(),
                permission_bits,
                path.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_valid() {
        let config: CoordinatorConfig = toml::from_str("").unwrap();
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.routing.confidence, 0.85);
        assert_eq!(config.routing.tie_break_temperature, 0.0);
        assert!(config.routing.handlers.is_none());
        assert_eq!(config.agents.format_type, "markdown");
    }

    #[test]
    fn routing_section_parses_labels() {
        let config: CoordinatorConfig = toml::from_str(
            r#"
            [llm]
            provider = "anthropic"
            model = "claude-sonnet"
            api_key = "test"

            [routing]
            confidence = 0.5
            handlers = ["research", "article"]

            [routing.triggers]
            image = ["diagram", "Chart"]
        "#,
        )
        .unwrap();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.routing.confidence, 0.5);
        assert_eq!(
            config.routing.handlers,
            Some(vec![IntentLabel::Research, IntentLabel::Article])
        );

        let caps = config.capability_set();
        assert_eq!(caps.triggers(IntentLabel::Image), ["diagram", "chart"]);
        assert_eq!(caps.triggers(IntentLabel::Format).len(), 4);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let result: std::result::Result<CoordinatorConfig, _> =
            toml::from_str("[routing]\nhandlers = [\"podcast\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agents]\nsocial_tone = \"playful\"").unwrap();

        let config = CoordinatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.agents.social_tone, "playful");
    }

    #[test]
    fn from_file_reports_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[llm\nmodel = ").unwrap();

        let err = CoordinatorConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[cfg(unix)]
    #[test]
    fn world_writable_file_is_refused() {
        use std::os::unix::fs::PermissionsExt;

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o666)).unwrap();

        let err = CoordinatorConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("world-writable"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CoordinatorConfig::from_file("/nonexistent/alchemy.toml").is_err());
    }
}
