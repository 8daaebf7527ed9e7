use crate::errors::EditorError;
use crate::undo_stack::DEFAULT_MAX_LEVELS;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "commonplace.config.json";

/// How text pushed by the host is turned into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeMode {
    /// One tagged paragraph holding the text verbatim; edits are never reported
    Paragraph,

    /// One block per line; every edit is reported to the host
    #[default]
    Lines,
}

impl BridgeMode {
    /// Whether local edits are forwarded to the host
    pub fn reports_changes(self) -> bool {
        matches!(self, BridgeMode::Lines)
    }
}

/// Editor shim configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShimConfig {
    /// Id of the element the editor mounts into
    #[serde(default = "default_container_id")]
    pub container_id: String,

    #[serde(default)]
    pub mode: BridgeMode,

    /// Global function the host calls to push text in
    #[serde(default = "default_inbound_hook")]
    pub inbound_hook: String,

    /// Global function called with the text after every edit
    #[serde(default = "default_outbound_hook")]
    pub outbound_hook: String,

    /// Undo levels kept (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_container_id() -> String {
    "editor".to_string()
}

fn default_inbound_hook() -> String {
    "update_slate".to_string()
}

fn default_outbound_hook() -> String {
    "update_content".to_string()
}

fn default_history_depth() -> usize {
    DEFAULT_MAX_LEVELS
}

impl ShimConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: ShimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        if self.container_id.trim().is_empty() {
            return Err(EditorError::Config("containerId must not be empty".to_string()));
        }
        if self.inbound_hook.trim().is_empty() || self.outbound_hook.trim().is_empty() {
            return Err(EditorError::Config("hook names must not be empty".to_string()));
        }
        if self.inbound_hook == self.outbound_hook {
            return Err(EditorError::Config(format!(
                "inbound and outbound hooks are both named {}",
                self.inbound_hook
            )));
        }
        Ok(())
    }
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            container_id: default_container_id(),
            mode: BridgeMode::default(),
            inbound_hook: default_inbound_hook(),
            outbound_hook: default_outbound_hook(),
            history_depth: default_history_depth(),
        }
    }
}
