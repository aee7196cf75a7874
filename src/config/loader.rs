use super::Config;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::{Path, PathBuf};

impl Config {
    /// `~/.qcdt-monitor/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".qcdt-monitor").join("config.toml"))
    }

    /// Load from `path` (or the default location), then apply environment
    /// overrides.
    ///
    /// An explicitly given path must exist; a missing default file just means
    /// "all defaults".
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path()?, false),
        };

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            Self::from_toml_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?
        } else if explicit {
            return Err(ConfigError::Load(format!(
                "config file not found: {}",
                config_path.display()
            ))
            .into());
        } else {
            tracing::info!(
                "No config file at {}; using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.config_path = config_path;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Load(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_env::{EnvVarGuard, env_lock};
    use tempfile::TempDir;

    #[test]
    fn load_reads_explicit_file() {
        let _lock = env_lock();
        let _token = EnvVarGuard::unset("QCDT_BOT_TOKEN");
        let _legacy = EnvVarGuard::unset("BOT_TOKEN");

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "[telegram]\nbot_token = \"file-token\"\nchat_id = -100\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.telegram.bot_token, "file-token");
        assert_eq!(config.telegram.chat_id, -100);
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn load_rejects_missing_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let err = Config::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        fs::write(&path, "[telegram\nbot_token = ").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}
