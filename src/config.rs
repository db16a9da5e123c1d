use serde::Deserialize;
use std::{
    env::VarError,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::error::Error;

pub const WEBHOOK_URL_VAR: &str = "DISCORD_WEBHOOK_URL";

const APP_DIR: &str = "discord-alert";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
    pub mention: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
            mention: "@everyone".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration, falling back to the environment for anything the file leaves unset.
    ///
    /// With `path = None` the default location is used and a missing file is not an error.
    /// An explicit path must point to an existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the environment lookup fails
    /// for any reason other than the variable being absent.
    pub fn load(path: Option<&Path>) -> Result<Config, Error> {
        Self::load_with(path, default_path().as_deref(), dotenvy::var)
    }

    fn load_with<F>(
        path: Option<&Path>,
        default: Option<&Path>,
        var: F,
    ) -> Result<Config, Error>
    where
        F: FnOnce(&'static str) -> Result<String, dotenvy::Error>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default {
                Some(path) => Self::from_file(path).or_else(|e| match e {
                    Error::Io(ref io) if io.kind() == ErrorKind::NotFound => Ok(Config::default()),
                    e => Err(e),
                })?,
                None => Config::default(),
            },
        };

        // if webhook_url is not set use env with dotenvy
        if config.webhook_url.is_none() {
            config.webhook_url = match var(WEBHOOK_URL_VAR) {
                Ok(url) => Some(url),
                Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => None,
                Err(e) => return Err(e.into()),
            };
        }

        Ok(config)
    }

    /// Reads a TOML configuration file; keys it leaves out keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration TOML.
    pub fn from_file(path: &Path) -> Result<Config, Error> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The configured webhook URL, or the fatal configuration error when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWebhookUrl`] when the URL is unset or blank.
    pub fn webhook_url(&self) -> Result<&str, Error> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(Error::MissingWebhookUrl)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
