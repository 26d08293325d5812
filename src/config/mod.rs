use crate::config::cli::Args;
use crate::error::Result;
use crate::utils::ASSET_ORIGIN;
use clap::Parser;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod cli;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub asset_origin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            asset_origin: ASSET_ORIGIN.to_string(),
        }
    }
}

impl Settings {
    /// Reads the settings file; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

pub struct Config {
    pub args: Args,
    pub settings: Settings,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let mut settings = Settings::load(&args.config_file)?;
        if let Some(user_agent) = &args.user_agent {
            settings.user_agent = user_agent.clone();
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            args,
            settings,
            http_client,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        if let Some(data_dir) = &self.args.data_dir {
            if !data_dir.exists() {
                std::fs::create_dir_all(data_dir)?;
            }
            info!("Data dir {} exists", data_dir.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::Command;

    #[test]
    fn missing_settings_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(settings.timeout_secs, 30);
        assert_eq!(settings.asset_origin, ASSET_ORIGIN);
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kolbot.json");
        std::fs::write(&path, r#"{ "timeout_secs": 5, "unknown": true }"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn args_override_user_agent() {
        let dir = tempfile::tempdir().unwrap();
        let config_file = dir.path().join("kolbot.json");
        let args = Args::try_parse_from([
            "kolbot",
            "--config-file",
            config_file.to_str().unwrap(),
            "--user-agent",
            "kolbot-test",
            "leaderboard",
            "page.html",
        ])
        .unwrap();

        let config = Config::from_args(args).unwrap();
        assert_eq!(config.settings.user_agent, "kolbot-test");
        assert!(matches!(config.args.command, Command::Leaderboard { .. }));
    }
}
