//! Client and relay settings.

use crate::error::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Room joined when none is given on the command line.
    room: String,

    /// Delay between relay polls, in milliseconds.
    poll_interval_ms: u64,

    /// Delay between replay frames, in milliseconds.
    replay_delay_ms: u64,

    /// File receiving log output while the terminal is in raw mode.
    log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room: "default".to_string(),
            poll_interval_ms: 200,
            replay_delay_ms: 500,
            log_file: PathBuf::from("star_checkers.log"),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the defaults; keys absent from the file keep
    /// their default values.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;

        info!(room = %config.room, "Config loaded successfully");
        Ok(config)
    }

    /// Replaces the room when one was given explicitly.
    pub fn with_room(mut self, room: Option<String>) -> Self {
        if let Some(room) = room {
            self.room = room;
        }
        self
    }

    /// Poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Replay frame delay as a duration.
    pub fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.replay_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.room.is_empty() || self.room.contains('\n') {
            return Err(ConfigError::new("Room name must be non-empty and single-line"));
        }
        if self.room.len() > crate::protocol::MAX_ROOM_NAME {
            return Err(ConfigError::new(format!(
                "Room name exceeds {} bytes",
                crate::protocol::MAX_ROOM_NAME
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::new("poll_interval_ms must be positive"));
        }
        Ok(())
    }
}

/// Address the relay server binds to.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Interface to bind.
    host: String,
    /// TCP port. Zero picks a free port.
    port: u16,
}

impl RelayConfig {
    /// Creates a relay configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port` form accepted by [`tokio::net::TcpListener::bind`].
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
