use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::responder::rules::{self, Action, Rule};

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("failed to read config file '{}': {}", .path.display(), .source)]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse JSON.
    #[error("failed to parse config file '{}': {}", .path.display(), .source)]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Validation error.
    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Deserialize)]
struct ConfigFile {
    /// Discord bot token. The DISCORD_TOKEN environment variable wins
    /// over this field, so the file can omit it entirely.
    #[serde(default)]
    discord_token: String,
    /// Trigger rules, most specific first. Empty means the built-in table.
    #[serde(default)]
    rules: Vec<Rule>,
    /// Body of the `!help` reply (rendered inside a code block).
    help_text: Option<String>,
    /// Reply used when a voice command comes from outside a voice channel.
    not_in_voice_reply: Option<String>,
    /// Directory holding the audio clips. Defaults to current directory.
    sound_dir: Option<String>,
    #[serde(default = "default_playback_volume")]
    playback_volume: f32,
    #[serde(default)]
    rate_limit: RateLimitConfig,
    /// Keep-alive HTTP port. Explicit null disables the server.
    #[serde(default = "default_health_port")]
    health_port: Option<u16>,
    /// Directory for state files (logs). Defaults to current directory.
    data_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Responses allowed per window.
    #[serde(default = "default_max_responses")]
    pub max_responses: usize,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_responses: default_max_responses(),
            window_secs: default_window_secs(),
        }
    }
}

fn default_playback_volume() -> f32 {
    0.1
}

fn default_health_port() -> Option<u16> {
    Some(3000)
}

fn default_max_responses() -> usize {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_not_in_voice_reply() -> String {
    "そんなことはない".to_string()
}

pub struct Config {
    pub discord_token: String,
    /// Trigger rules in evaluation order.
    pub rules: Vec<Rule>,
    pub help_text: String,
    pub not_in_voice_reply: String,
    /// Directory holding the audio clips.
    pub sound_dir: PathBuf,
    /// Playback volume in (0.0, 1.0].
    pub playback_volume: f32,
    pub rate_limit: RateLimitConfig,
    /// Keep-alive HTTP port, if enabled.
    pub health_port: Option<u16>,
    /// Directory for state files (logs).
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadFile {
            path: config_path.clone(),
            source: e,
        })?;
        let file: ConfigFile = serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
            path: config_path.clone(),
            source: e,
        })?;

        let discord_token = resolve_token(file.discord_token, std::env::var("DISCORD_TOKEN").ok())?;

        let rules = if file.rules.is_empty() {
            rules::default_rules()
        } else {
            file.rules
        };
        validate_rules(&rules)?;

        if !(file.playback_volume > 0.0 && file.playback_volume <= 1.0) {
            return Err(ConfigError::Validation(format!(
                "playback_volume must be in (0.0, 1.0], got {}",
                file.playback_volume
            )));
        }
        if file.rate_limit.max_responses == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.max_responses must be at least 1".into(),
            ));
        }
        if file.rate_limit.window_secs == 0 {
            return Err(ConfigError::Validation(
                "rate_limit.window_secs must be at least 1".into(),
            ));
        }

        let sound_dir = file
            .sound_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            discord_token,
            rules,
            help_text: file.help_text.unwrap_or_else(rules::default_help_text),
            not_in_voice_reply: file
                .not_in_voice_reply
                .unwrap_or_else(default_not_in_voice_reply),
            sound_dir,
            playback_volume: file.playback_volume,
            rate_limit: file.rate_limit,
            health_port: file.health_port,
            data_dir,
        })
    }
}

/// Environment token wins over the file so deployments can keep the
/// secret out of the config entirely.
fn resolve_token(file_token: String, env_token: Option<String>) -> Result<String, ConfigError> {
    let token = match env_token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => file_token,
    };
    if token.is_empty() {
        return Err(ConfigError::Validation(
            "discord_token is required (config field or DISCORD_TOKEN env var)".into(),
        ));
    }
    Ok(token)
}

fn validate_rules(rules: &[Rule]) -> Result<(), ConfigError> {
    for (index, rule) in rules.iter().enumerate() {
        if rule.trigger.pattern().is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule {index}: trigger pattern must not be empty"
            )));
        }
        match &rule.action {
            Action::Help => {}
            Action::Reply { text } => {
                if text.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: reply text must not be empty"
                    )));
                }
            }
            Action::React { emoji } => {
                if emoji.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: react emoji must not be empty"
                    )));
                }
            }
            Action::WeightedReply { choices } => {
                if choices.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: weighted_reply needs at least one choice"
                    )));
                }
                if choices.iter().any(|c| c.text.is_empty()) {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: weighted_reply choice text must not be empty"
                    )));
                }
            }
            Action::Play { file, reply } => {
                if file.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: play file must not be empty"
                    )));
                }
                if reply.is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "rule {index}: play reply must not be empty"
                    )));
                }
            }
        }
    }
    Ok(())
}
