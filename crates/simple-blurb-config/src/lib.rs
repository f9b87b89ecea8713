use serde::{Deserialize, Serialize};
use simple_blurb_engine::{MediaCatalog, SchemaVersion, media::FULL_SIZE};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read media catalog at {catalog_path}: {source}")]
    CatalogReadError {
        catalog_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse media catalog at {catalog_path}: {source}")]
    CatalogParseError {
        catalog_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unsupported schema version {0}")]
    UnsupportedSchemaVersion(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TOML file with a `[[media]]` list standing in for the media library.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_catalog: Option<PathBuf>,
    /// Size variant picked when selecting media without an explicit size.
    pub default_size_slug: String,
    pub schema_version: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_catalog: None,
            default_size_slug: FULL_SIZE.to_string(),
            schema_version: SchemaVersion::LATEST.number(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the catalog path
        config.media_catalog = config
            .media_catalog
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The stored config, or defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/simple-blurb");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn schema_version(&self) -> Result<SchemaVersion, ConfigError> {
        SchemaVersion::from_number(self.schema_version)
            .ok_or(ConfigError::UnsupportedSchemaVersion(self.schema_version))
    }

    /// The configured catalog, or an empty one when none is set.
    pub fn media_catalog(&self) -> Result<MediaCatalog, ConfigError> {
        match &self.media_catalog {
            Some(path) => load_media_catalog(path),
            None => Ok(MediaCatalog::default()),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

pub fn load_media_catalog<P: AsRef<Path>>(catalog_path: P) -> Result<MediaCatalog, ConfigError> {
    let catalog_path = catalog_path.as_ref();
    let content =
        std::fs::read_to_string(catalog_path).map_err(|source| ConfigError::CatalogReadError {
            catalog_path: catalog_path.to_path_buf(),
            source,
        })?;
    toml::from_str(&content).map_err(|source| ConfigError::CatalogParseError {
        catalog_path: catalog_path.to_path_buf(),
        source,
    })
}
