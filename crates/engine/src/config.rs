//! Vector database configuration via `promrag.toml`
//!
//! Settings are read from a TOML file and can be overridden by the
//! `PRAG_VECTORDB_*` environment variables. Missing fields fall back to
//! defaults that open a local SQLite database.

use std::path::{Path, PathBuf};

use promrag_core::{VectorDbError, VectorDbResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "promrag.toml";

/// Environment variable overriding [`VectorDbConfig::provider`].
pub const ENV_PROVIDER: &str = "PRAG_VECTORDB_PROVIDER";
/// Environment variable overriding [`VectorDbConfig::collection`].
pub const ENV_COLLECTION: &str = "PRAG_VECTORDB_COLLECTION";
/// Environment variable overriding [`SqliteSection::db_path`].
pub const ENV_SQLITE3_DB_PATH: &str = "PRAG_VECTORDB_SQLITE3_DB_PATH";
/// Environment variable overriding [`QdrantSection::host`].
pub const ENV_QDRANT_HOST: &str = "PRAG_VECTORDB_QDRANT_HOST";
/// Environment variable overriding [`QdrantSection::port`].
pub const ENV_QDRANT_PORT: &str = "PRAG_VECTORDB_QDRANT_PORT";
/// Environment variable overriding [`EncoderSection::dimension`].
pub const ENV_ENCODER_DIMENSION: &str = "PRAG_VECTORDB_ENCODER_DIMENSION";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("failed to access config file '{path}': {message}")]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O message
        message: String,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config file '{path}': {message}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A field holds an unusable value
    #[error("invalid configuration: {field} {reason}")]
    Invalid {
        /// The offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Which backend serves the vector database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Embedded SQLite file with brute-force ranking
    Sqlite3,
    /// Remote Qdrant service
    Qdrant,
}

impl ProviderKind {
    /// Parse a provider tag, case-insensitively.
    ///
    /// `sqlite3`/`embedded` and `qdrant`/`remote` are accepted.
    pub fn parse(tag: &str) -> VectorDbResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sqlite3" | "embedded" => Ok(ProviderKind::Sqlite3),
            "qdrant" | "remote" => Ok(ProviderKind::Qdrant),
            _ => Err(VectorDbError::UnsupportedProvider {
                provider: tag.to_string(),
            }),
        }
    }

    /// Canonical tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Sqlite3 => "sqlite3",
            ProviderKind::Qdrant => "qdrant",
        }
    }
}

/// `[sqlite3]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SqliteSection {
    /// Database file; parent directories are created on open
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for SqliteSection {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// `[qdrant]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QdrantSection {
    /// Host name of the Qdrant service
    #[serde(default = "default_qdrant_host")]
    pub host: String,
    /// REST port of the Qdrant service
    #[serde(default = "default_qdrant_port")]
    pub port: u16,
    /// Optional API key sent as the `api-key` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for QdrantSection {
    fn default() -> Self {
        Self {
            host: default_qdrant_host(),
            port: default_qdrant_port(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// `[encoder]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncoderSection {
    /// Length of the embeddings produced by the encoder
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for EncoderSection {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
        }
    }
}

/// Vector database configuration loaded from `promrag.toml`.
///
/// # Example
///
/// ```toml
/// provider = "sqlite3"
/// collection = "prag-metrics"
///
/// [sqlite3]
/// db_path = "./_data/metrics.db"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorDbConfig {
    /// Backend tag: `"sqlite3"` or `"qdrant"`
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Collection (table) holding the metric catalog
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Embedded backend settings
    #[serde(default)]
    pub sqlite3: SqliteSection,
    /// Remote backend settings
    #[serde(default)]
    pub qdrant: QdrantSection,
    /// Encoder settings
    #[serde(default)]
    pub encoder: EncoderSection,
}

fn default_provider() -> String {
    "sqlite3".to_string()
}

fn default_collection() -> String {
    "prag-metrics".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./_data/metrics.db")
}

fn default_qdrant_host() -> String {
    "localhost".to_string()
}

fn default_qdrant_port() -> u16 {
    6333
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_dimension() -> usize {
    384
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            collection: default_collection(),
            sqlite3: SqliteSection::default(),
            qdrant: QdrantSection::default(),
            encoder: EncoderSection::default(),
        }
    }
}

impl VectorDbConfig {
    /// Parse the provider tag
    pub fn provider_kind(&self) -> VectorDbResult<ProviderKind> {
        ProviderKind::parse(&self.provider)
    }

    /// Check the configuration is usable for the selected provider.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.is_empty() {
            return Err(ConfigError::Invalid {
                field: "collection",
                reason: "cannot be empty".to_string(),
            });
        }

        if self.encoder.dimension == 0 {
            return Err(ConfigError::Invalid {
                field: "encoder.dimension",
                reason: "must be greater than 0".to_string(),
            });
        }

        let kind = self.provider_kind().map_err(|e| ConfigError::Invalid {
            field: "provider",
            reason: e.to_string(),
        })?;

        match kind {
            ProviderKind::Sqlite3 => {
                if self.sqlite3.db_path.as_os_str().is_empty() {
                    return Err(ConfigError::Invalid {
                        field: "sqlite3.db_path",
                        reason: "cannot be empty when using the sqlite3 provider".to_string(),
                    });
                }
            }
            ProviderKind::Qdrant => {
                if self.qdrant.host.is_empty() {
                    return Err(ConfigError::Invalid {
                        field: "qdrant.host",
                        reason: "cannot be empty when using the qdrant provider".to_string(),
                    });
                }
                if self.qdrant.port == 0 {
                    return Err(ConfigError::Invalid {
                        field: "qdrant.port",
                        reason: "must be greater than 0".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply `PRAG_VECTORDB_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(provider) = get(ENV_PROVIDER) {
            self.provider = provider;
        }
        if let Some(collection) = get(ENV_COLLECTION) {
            self.collection = collection;
        }
        if let Some(path) = get(ENV_SQLITE3_DB_PATH) {
            self.sqlite3.db_path = PathBuf::from(path);
        }
        if let Some(host) = get(ENV_QDRANT_HOST) {
            self.qdrant.host = host;
        }
        if let Some(port) = get(ENV_QDRANT_PORT) {
            self.qdrant.port = port.parse().map_err(|_| ConfigError::Invalid {
                field: "qdrant.port",
                reason: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(dimension) = get(ENV_ENCODER_DIMENSION) {
            self.encoder.dimension = dimension.parse().map_err(|_| ConfigError::Invalid {
                field: "encoder.dimension",
                reason: format!("'{}' is not a valid dimension", dimension),
            })?;
        }
        Ok(())
    }

    /// Base URL of the Qdrant REST API
    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant.host, self.qdrant.port)
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# promrag vector database configuration
#
# Provider: "sqlite3" (default, embedded) or "qdrant" (remote service)
provider = "sqlite3"

# Collection holding the metric catalog. Letters, digits, '_' and '-' only.
collection = "prag-metrics"

[sqlite3]
db_path = "./_data/metrics.db"

[qdrant]
host = "localhost"
port = 6333
# api_key = "your-api-key"   # optional
timeout_ms = 5000

[encoder]
dimension = 384
"#
    }

    /// Read and parse config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}
