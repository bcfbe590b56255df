//! Engine configuration
//!
//! Every field has a default, so a YAML document only needs to name what it
//! overrides:
//!
//! ```yaml
//! name: social
//! quotas:
//!   max_nodes: 50000
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Limits enforced by the engine on element creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotas {
    /// Maximum number of nodes
    pub max_nodes: Option<usize>,
    /// Maximum number of edges
    pub max_edges: Option<usize>,
}

impl Default for ResourceQuotas {
    fn default() -> Self {
        Self {
            max_nodes: Some(1_000_000),  // 1M nodes
            max_edges: Some(10_000_000), // 10M edges
        }
    }
}

impl ResourceQuotas {
    /// Create unlimited quotas
    pub fn unlimited() -> Self {
        Self {
            max_nodes: None,
            max_edges: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name reported in logs
    pub name: String,
    /// Initial arena capacity for nodes
    pub initial_capacity: usize,
    pub quotas: ResourceQuotas,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            initial_capacity: 1024,
            quotas: ResourceQuotas::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.quotas.max_nodes, Some(1_000_000));
        assert_eq!(ResourceQuotas::unlimited().max_edges, None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = EngineConfig::from_yaml_str("name: social\nquotas:\n  max_nodes: 5\n").unwrap();
        assert_eq!(config.name, "social");
        assert_eq!(config.quotas.max_nodes, Some(5));
        assert_eq!(config.quotas.max_edges, Some(10_000_000));
        assert_eq!(config.initial_capacity, 1024);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = EngineConfig::from_yaml_str("quotas: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: from-disk").unwrap();
        writeln!(file, "quotas:").unwrap();
        writeln!(file, "  max_edges: ~").unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.name, "from-disk");
        assert_eq!(config.quotas.max_edges, None);
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
