use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::papers::resolver::DEFAULT_MAX_DISTANCE;
use crate::papers::store::DEFAULT_SCAN_PAGE_SIZE;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PapermindConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub papers: PapersConfig,
    pub embedding: EmbeddingConfig,
    pub memory: MemoryConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// `"stdio"` or `"http"`.
    pub transport: String,
    pub host: String,
    pub papers_port: u16,
    pub memory_port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PapersConfig {
    /// Inclusive edit-distance bound for fuzzy title matches.
    pub max_distance: usize,
    pub scan_page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"local"` (ONNX) or `"hash"`.
    pub provider: String,
    pub model: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MemoryConfig {
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            host: "127.0.0.1".into(),
            papers_port: 8080,
            memory_port: 9090,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_papermind_dir()
            .join("papermind.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for PapersConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        let cache_dir = default_papermind_dir()
            .join("models")
            .to_string_lossy()
            .into_owned();
        Self {
            provider: "local".into(),
            model: "all-MiniLM-L6-v2".into(),
            cache_dir,
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            max_top_k: 100,
        }
    }
}

/// Returns `~/.papermind/`, or `./.papermind/` when no home directory is known.
pub fn default_papermind_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".papermind")
}

/// Returns the default config file path: `~/.papermind/config.toml`
pub fn default_config_path() -> PathBuf {
    default_papermind_dir().join("config.toml")
}

impl PapermindConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            PapermindConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// PAPERMIND_DB, PAPERMIND_LOG_LEVEL, PAPERMIND_TRANSPORT, PAPERMIND_EMBEDDING_PROVIDER.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PAPERMIND_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("PAPERMIND_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("PAPERMIND_TRANSPORT") {
            self.server.transport = val;
        }
        if let Ok(val) = std::env::var("PAPERMIND_EMBEDDING_PROVIDER") {
            self.embedding.provider = val;
        }
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PapermindConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.papers_port, 8080);
        assert_eq!(config.server.memory_port, 9090);
        assert_eq!(config.papers.max_distance, 3);
        assert_eq!(config.memory.default_top_k, 5);
        assert!(config.storage.db_path.ends_with("papermind.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
transport = "http"
log_level = "debug"

[storage]
db_path = "/tmp/papers.db"

[papers]
max_distance = 2
"#;
        let config: PapermindConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.storage.db_path, "/tmp/papers.db");
        assert_eq!(config.papers.max_distance, 2);
        // defaults still apply for unset fields
        assert_eq!(config.papers.scan_page_size, DEFAULT_SCAN_PAGE_SIZE);
        assert_eq!(config.server.papers_port, 8080);
        assert_eq!(config.embedding.provider, "local");
    }

    #[test]
    fn load_from_missing_file_uses_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config = PapermindConfig::load_from(tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.papers.max_distance, 3);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = PapermindConfig::default();
        std::env::set_var("PAPERMIND_DB", "/tmp/override.db");
        std::env::set_var("PAPERMIND_TRANSPORT", "http");
        std::env::set_var("PAPERMIND_EMBEDDING_PROVIDER", "hash");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.embedding.provider, "hash");

        std::env::remove_var("PAPERMIND_DB");
        std::env::remove_var("PAPERMIND_TRANSPORT");
        std::env::remove_var("PAPERMIND_EMBEDDING_PROVIDER");
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/db.sqlite"), PathBuf::from("/var/db.sqlite"));
    }
}
