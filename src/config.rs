use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const ENV_BIND_ADDR: &str = "REQMON_BIND_ADDR";
const ENV_TICK_SECS: &str = "REQMON_TICK_SECS";
const ENV_STREAM_MS: &str = "REQMON_STREAM_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}: {reason}")]
    Parse {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{key} must be at least {min}, got {value}")]
    TooSmall {
        key: &'static str,
        min: u64,
        value: u64,
    },
}

/// Runtime settings for the monitor.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// How often counters reset and latency windows are summarized (seconds)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,

    /// SSE push interval for `/api/stats/stream` (milliseconds)
    #[serde(default = "default_stream_interval")]
    pub stream_interval_ms: u64,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
fn default_tick_interval() -> u64 {
    60
}
fn default_stream_interval() -> u64 {
    1000
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            tick_interval_secs: default_tick_interval(),
            stream_interval_ms: default_stream_interval(),
        }
    }
}

impl MonitorConfig {
    /// Read settings from `REQMON_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = parse(ENV_BIND_ADDR, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TICK_SECS) {
            config.tick_interval_secs = parse(ENV_TICK_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STREAM_MS) {
            config.stream_interval_ms = parse(ENV_STREAM_MS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_secs < 1 {
            return Err(ConfigError::TooSmall {
                key: ENV_TICK_SECS,
                min: 1,
                value: self.tick_interval_secs,
            });
        }
        if self.stream_interval_ms < 100 {
            return Err(ConfigError::TooSmall {
                key: ENV_STREAM_MS,
                min: 100,
                value: self.stream_interval_ms,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
        key,
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}
