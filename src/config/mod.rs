//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::error::ConfigError;
use crate::core::sizes::{STANDARD_SIZES, SizeLabel};
use crate::core::snapshot::DEFAULT_SLOT_NAME;
use crate::tally::DEFAULT_PLAYER_NAME_MAX_LEN;

/// Which durable slot backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Memory,
    JsonFile,
    Lmdb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Directory holding the slot (json_file, lmdb)
    pub path: PathBuf,

    pub slot_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("data"),
            slot_name: DEFAULT_SLOT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// How far below its anchor an undragged content box sits, in percent
    pub content_offset_percent: f64,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            content_offset_percent: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Size chart, in display order
    pub sizes: Vec<String>,
    pub player_name_max_len: usize,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            sizes: STANDARD_SIZES.iter().map(|s| s.to_string()).collect(),
            player_name_max_len: DEFAULT_PLAYER_NAME_MAX_LEN,
        }
    }
}

/// Credentials and target list for the Trello export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrelloConfig {
    pub api_key: String,
    pub token: String,
    pub board_id: String,
    pub list_id: String,
}

impl TrelloConfig {
    pub fn is_configured(&self) -> bool {
        [&self.api_key, &self.token, &self.board_id, &self.list_id]
            .iter()
            .all(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Complete configuration of the order wizard
///
/// Every section has defaults, so an empty document is a valid config.
///
/// ```yaml
/// storage:
///   backend: json_file
///   path: ./data
/// tally:
///   sizes: [XS, S, M, L, XL, XXL]
/// trello:
///   apiKey: ...
///   token: ...
///   boardId: ...
///   listId: ...
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub storage: StorageConfig,
    pub annotation: AnnotationConfig,
    pub tally: TallyConfig,
    pub event_bus_capacity: usize,
    pub trello: Option<TrelloConfig>,
    pub server: ServerConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            annotation: AnnotationConfig::default(),
            tally: TallyConfig::default(),
            event_bus_capacity: 1024,
            trello: None,
            server: ServerConfig::default(),
        }
    }
}

impl WizardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from variables found through `lookup`.
    ///
    /// Recognized keys: `WIZARD_BIND`, `WIZARD_STORAGE_PATH`, `TRELLO_API_KEY`,
    /// `TRELLO_TOKEN`, `TRELLO_BOARD_ID`, `TRELLO_LIST_ID`.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(bind) = lookup("WIZARD_BIND") {
            self.server.bind = bind;
        }
        if let Some(path) = lookup("WIZARD_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        let trello_keys = [
            "TRELLO_API_KEY",
            "TRELLO_TOKEN",
            "TRELLO_BOARD_ID",
            "TRELLO_LIST_ID",
        ];
        let values: Vec<Option<String>> = trello_keys.iter().map(|k| lookup(k)).collect();
        if values.iter().any(Option::is_some) {
            let trello = self.trello.get_or_insert_with(TrelloConfig::default);
            let fields = [
                &mut trello.api_key,
                &mut trello.token,
                &mut trello.board_id,
                &mut trello.list_id,
            ];
            for (field, value) in fields.into_iter().zip(values) {
                if let Some(value) = value {
                    *field = value;
                }
            }
        }
        self
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tally.sizes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tally.sizes".to_string(),
                value: "[]".to_string(),
                message: "at least one size is required".to_string(),
            });
        }
        if let Some(blank) = self.tally.sizes.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "tally.sizes".to_string(),
                value: blank.clone(),
                message: "size labels must not be blank".to_string(),
            });
        }
        let offset = self.annotation.content_offset_percent;
        if !(0.0..=100.0).contains(&offset) {
            return Err(ConfigError::InvalidValue {
                field: "annotation.content_offset_percent".to_string(),
                value: offset.to_string(),
                message: "must be between 0 and 100".to_string(),
            });
        }
        if self.event_bus_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "event_bus_capacity".to_string(),
                value: "0".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.storage.slot_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.slot_name".to_string(),
                value: self.storage.slot_name.clone(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// The size chart as labels
    pub fn size_chart(&self) -> Vec<SizeLabel> {
        self.tally.sizes.iter().map(|s| SizeLabel::new(s.trim())).collect()
    }

    /// Trello settings when complete
    pub fn trello_if_configured(&self) -> Option<&TrelloConfig> {
        self.trello.as_ref().filter(|t| t.is_configured())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WizardConfig::default();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.slot_name, "purchase-order-storage");
        assert_eq!(config.annotation.content_offset_percent, 10.0);
        assert_eq!(config.tally.player_name_max_len, 14);
        assert_eq!(config.size_chart(), SizeLabel::standard());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = WizardConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, WizardConfig::default());
    }

    #[test]
    fn test_yaml_serialization() {
        let config = WizardConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = WizardConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_trello_needs_all_fields() {
        let mut trello = TrelloConfig {
            api_key: "k".into(),
            token: "t".into(),
            board_id: "b".into(),
            list_id: String::new(),
        };
        assert!(!trello.is_configured());
        trello.list_id = "l".into();
        assert!(trello.is_configured());
    }

    #[test]
    fn test_overrides() {
        let config = WizardConfig::default().apply_overrides(|key| match key {
            "WIZARD_BIND" => Some("0.0.0.0:8080".to_string()),
            "TRELLO_TOKEN" => Some("secret".to_string()),
            _ => None,
        });
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        let trello = config.trello.as_ref().unwrap();
        assert_eq!(trello.token, "secret");
        assert!(config.trello_if_configured().is_none());
    }
}
