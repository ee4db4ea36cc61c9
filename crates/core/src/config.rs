use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub admin: AdminConfig,
    pub analytics: AnalyticsConfig,
    /// JSON file holding the event snapshot for the CLI.
    pub events_path: PathBuf,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ORGPULSE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ORGPULSE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            admin: AdminConfig::from_env_profiled(p),
            analytics: AnalyticsConfig::from_env_profiled(p),
            events_path: PathBuf::from(profiled_env_or(p, "EVENTS_PATH", "data/events.json")),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  events:      path={}", self.events_path.display());
        tracing::info!(
            "  admin:       ignored_channels={}, anonymize_users={}, retention_days={}",
            self.admin.ignored_channels.len(),
            self.admin.anonymize_users,
            self.admin
                .retention_days
                .map_or_else(|| "(none)".to_string(), |d| d.to_string())
        );
        tracing::info!(
            "  analytics:   seed={}, max_lp_iterations={}",
            self.analytics
                .community_seed
                .map_or_else(|| "(entropy)".to_string(), |s| s.to_string()),
            self.analytics.max_lp_iterations
        );
    }
}

// ── Admin ─────────────────────────────────────────────────────

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config payload: {0}")]
    Payload(String),

    #[error("Invalid config: retentionDays must be null or a positive number, got {0}")]
    RetentionDays(i64),
}

/// Operator-controlled analysis settings.
///
/// Immutable: changes go through [`AdminConfig::apply`], which returns a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfig {
    /// Channel ids excluded from analysis.
    pub ignored_channels: Vec<String>,
    /// Replace user ids with `user_N` labels in every output.
    pub anonymize_users: bool,
    /// Drop events older than this many days. `None` keeps everything.
    pub retention_days: Option<u32>,
}

impl AdminConfig {
    fn from_env_profiled(p: &str) -> Self {
        let ignored_channels = profiled_env_opt(p, "IGNORED_CHANNELS")
            .map(|raw| parse_channel_list(&raw))
            .unwrap_or_default();
        let anonymize_users = profiled_env_opt(p, "ANONYMIZE_USERS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        let retention_days = profiled_env_opt(p, "RETENTION_DAYS").and_then(|v| {
            match v.parse::<u32>() {
                Ok(days) if days >= 1 => Some(days),
                _ => {
                    tracing::warn!(value = %v, "ignoring invalid RETENTION_DAYS");
                    None
                }
            }
        });
        Self {
            ignored_channels,
            anonymize_users,
            retention_days,
        }
    }

    /// Merge a validated patch, returning the updated config.
    pub fn apply(&self, patch: AdminConfigPatch) -> Result<AdminConfig, ConfigError> {
        let mut updated = self.clone();

        if let Some(channels) = patch.ignored_channels {
            tracing::info!(count = channels.len(), "admin config: updated ignoredChannels");
            updated.ignored_channels = channels;
        }

        if let Some(anonymize) = patch.anonymize_users {
            tracing::info!(value = anonymize, "admin config: updated anonymizeUsers");
            updated.anonymize_users = anonymize;
        }

        if let Some(retention) = patch.retention_days {
            updated.retention_days = match retention {
                None => None,
                Some(days) if days >= 1 => {
                    Some(u32::try_from(days).map_err(|_| ConfigError::RetentionDays(days))?)
                }
                Some(days) => return Err(ConfigError::RetentionDays(days)),
            };
            tracing::info!(value = ?updated.retention_days, "admin config: updated retentionDays");
        }

        Ok(updated)
    }
}

/// Partial update to [`AdminConfig`]. Absent fields are left unchanged;
/// `retentionDays: null` clears the retention policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdminConfigPatch {
    #[serde(default)]
    pub ignored_channels: Option<Vec<String>>,
    #[serde(default)]
    pub anonymize_users: Option<bool>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub retention_days: Option<Option<i64>>,
}

impl AdminConfigPatch {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Payload(e.to_string()))
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_channel_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

// ── Analytics ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Fixed seed for community detection. `None` seeds from entropy.
    pub community_seed: Option<u64>,
    pub max_lp_iterations: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            community_seed: None,
            max_lp_iterations: 10,
        }
    }
}

impl AnalyticsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            community_seed: profiled_env_opt(p, "COMMUNITY_SEED").and_then(|v| v.parse().ok()),
            max_lp_iterations: profiled_env_usize(p, "MAX_LP_ITERATIONS", 10),
        }
    }
}
