use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = ".versiongate";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DATABASE_FILE: &str = "graph.db";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and the default database - not serialized
    #[serde(skip)]
    pub home_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub passport: PassportConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ── Gate ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    /// Accept a valid passport key in place of a matching version key
    #[serde(default)]
    pub passport_fallback_enabled: bool,
}

// ── Passport keys ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassportConfig {
    /// SHA-256 hex digests of accepted passport keys (never plaintext)
    #[serde(default)]
    pub key_hashes: Vec<String>,
}

// ── Store ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database file (default: `<home>/graph.db`)
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

// ── Observability ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home_dir = UserDirs::new().map_or_else(
            || PathBuf::from(CONFIG_DIR_NAME),
            |u| u.home_dir().join(CONFIG_DIR_NAME),
        );
        Self {
            config_path: home_dir.join(CONFIG_FILE_NAME),
            home_dir,
            gate: GateConfig::default(),
            passport: PassportConfig::default(),
            store: StoreConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or(ConfigError::NoHomeDir)?;
        let home_dir = home.join(CONFIG_DIR_NAME);
        let config_path = home_dir.join(CONFIG_FILE_NAME);

        if !home_dir.exists() {
            fs::create_dir_all(&home_dir)?;
        }

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            let config = Self {
                config_path,
                home_dir,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Read and validate the config file at `path`.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = path.to_path_buf();
        config.home_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, hash) in self.passport.key_hashes.iter().enumerate() {
            let hash = hash.trim();
            if hash.len() != 64 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ConfigError::Validation(format!(
                    "passport.key_hashes[{index}] must be a 64-character SHA-256 hex digest"
                )));
            }
        }

        let level = self.observability.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "observability.log_level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.store
            .database_path
            .clone()
            .unwrap_or_else(|| self.home_dir.join(DEFAULT_DATABASE_FILE))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(flag) = std::env::var("VERSIONGATE_PASSPORT_FALLBACK") {
            match flag.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.gate.passport_fallback_enabled = true,
                "0" | "false" | "no" | "off" => self.gate.passport_fallback_enabled = false,
                _ => {}
            }
        }

        if let Ok(path) = std::env::var("VERSIONGATE_DATABASE") {
            if !path.is_empty() {
                self.store.database_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(level) = std::env::var("VERSIONGATE_LOG_LEVEL") {
            if !level.is_empty() {
                self.observability.log_level = level;
            }
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&self.config_path, toml_str)?;
        Ok(())
    }
}
