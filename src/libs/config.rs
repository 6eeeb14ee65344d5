//! Application configuration.
//!
//! A single JSON file in the platform data directory remembers which user
//! row the CLI acts as (set during `acadmate init`) and a couple of display
//! preferences. Reading an absent file yields the defaults so every command
//! can call [`Config::read`] unconditionally.

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Id of the user row all commands operate on.
    pub user_id: Option<i64>,
    /// Symbol prefixed to money amounts in list output.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "₱".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: None,
            currency: default_currency(),
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it is absent.
    pub fn read() -> Result<Self> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        serde_json::from_str(&contents).map_err(|_| msg_error_anyhow!(Message::ConfigParseError))
    }

    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// The active user id, or an error telling the user to run `init`.
    pub fn require_user(&self) -> Result<i64> {
        self.user_id.ok_or_else(|| msg_error_anyhow!(Message::NotInitialized))
    }
}
