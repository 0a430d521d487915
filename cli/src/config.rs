use std::path::{Path, PathBuf};

use preflight::installation::require_non_blank;
use preflight::{Installation, InstallationRegistry, PreflightError};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "MBRUN_CONFIG";
/// Configuration file looked for in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "mbrun.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: PreflightError,
    },
}

/// ```toml
/// [[installation]]
/// name = "mrbayes-3.2"
/// executable = "/usr/local/bin/mb"
///
/// [defaults]
/// installation = "mrbayes-3.2"
/// check_block = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "installation")]
    pub installations: Vec<InstallationEntry>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationEntry {
    pub name: String,
    pub executable: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Installation used when `run` is not given one.
    #[serde(default)]
    pub installation: Option<String>,

    /// Check the mrbayes block before launching.
    #[serde(default = "default_check_block")]
    pub check_block: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            installation: None,
            check_block: default_check_block(),
        }
    }
}

fn default_check_block() -> bool {
    true
}

impl Config {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate().map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            installations = config.installations.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Load from `explicit` if given, else from `$MBRUN_CONFIG`, else from
    /// `./mbrun.toml`. Only the last one may be missing, which gives an empty config.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from_path(Path::new(&path));
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            Self::load_from_path(fallback)
        } else {
            Ok(Config::default())
        }
    }

    pub fn registry(&self) -> InstallationRegistry {
        InstallationRegistry::new(
            self.installations
                .iter()
                .map(|entry| Installation::new(entry.name.clone(), entry.executable.clone()))
                .collect(),
        )
    }

    fn validate(&self) -> Result<(), PreflightError> {
        for entry in &self.installations {
            require_non_blank(&entry.name, "installation name")?;
            let executable = entry.executable.to_string_lossy();
            require_non_blank(&executable, &format!("executable of installation '{}'", entry.name))?;
        }
        if let Some(name) = &self.defaults.installation {
            require_non_blank(name, "defaults.installation")?;
        }
        Ok(())
    }
}
