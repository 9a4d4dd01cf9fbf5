use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChunkConfigError;

/// Characters per chunk window.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Characters shared by consecutive windows.
pub const DEFAULT_CHUNK_OVERLAP: isize = 200;
/// Documents fetched from the read cursor per round trip.
pub const DEFAULT_FETCH_SIZE: usize = 50;
/// Upper bound on rows in a single `INSERT ... VALUES` statement.
pub const DEFAULT_INSERT_ROWS: usize = 1000;

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

fn profiled_env_parse<T: FromStr + Copy>(profile: &str, key: &str, default: T) -> T {
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unparseable config value, using default");
            default
        }),
        None => default,
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Process-wide settings. Built once at startup, never reloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub postgres: PostgresConfig,
    pub chunking: ChunkingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `RAGCHUNK_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("RAGCHUNK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            postgres: PostgresConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  postgres:  host={}:{}, db={}, user={}",
            self.postgres.host,
            self.postgres.port,
            self.postgres.database,
            self.postgres.username.as_deref().unwrap_or("(default)")
        );
        tracing::info!(
            "  chunking:  chunk_size={}, overlap={}, fetch_size={}, insert_rows={}",
            self.chunking.chunk_size,
            self.chunking.overlap,
            self.chunking.fetch_size,
            self.chunking.insert_rows
        );
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl PostgresConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "PG_HOST", "localhost"),
            port: profiled_env_parse(p, "PG_PORT", 5432),
            database: profiled_env_or(p, "PG_DB", "rag"),
            username: profiled_env_opt(p, "PG_USER"),
            password: profiled_env_opt(p, "PG_PASSWORD"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.username.is_some()
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive windows. Negative leaves gaps.
    pub overlap: isize,
    /// Documents per cursor fetch.
    pub fetch_size: usize,
    /// Maximum rows per multi-row INSERT.
    pub insert_rows: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
            fetch_size: DEFAULT_FETCH_SIZE,
            insert_rows: DEFAULT_INSERT_ROWS,
        }
    }
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            chunk_size: profiled_env_parse(p, "CHUNK_SIZE", DEFAULT_CHUNK_SIZE),
            overlap: profiled_env_parse(p, "CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP),
            fetch_size: profiled_env_parse(p, "CHUNK_FETCH_SIZE", DEFAULT_FETCH_SIZE),
            insert_rows: profiled_env_parse(p, "CHUNK_INSERT_ROWS", DEFAULT_INSERT_ROWS),
        }
    }

    /// Window parameters only; batch sizes stay at their defaults.
    pub fn with_window(chunk_size: usize, overlap: isize) -> Self {
        Self {
            chunk_size,
            overlap,
            ..Self::default()
        }
    }

    /// Offset advance between windows. Fails when `overlap >= chunk_size`.
    pub fn step(&self) -> Result<usize, ChunkConfigError> {
        window_step(self.chunk_size, self.overlap)
    }

    /// Check every field before any I/O is attempted.
    pub fn validate(&self) -> Result<(), ChunkConfigError> {
        self.step()?;
        if self.fetch_size == 0 {
            return Err(ChunkConfigError::ZeroBatchSize("fetch_size"));
        }
        if self.insert_rows == 0 {
            return Err(ChunkConfigError::ZeroBatchSize("insert_rows"));
        }
        Ok(())
    }
}

/// `chunk_size - overlap`, which must be strictly positive.
pub fn window_step(chunk_size: usize, overlap: isize) -> Result<usize, ChunkConfigError> {
    let step = chunk_size as i128 - overlap as i128;
    if step <= 0 {
        return Err(ChunkConfigError::InvalidConfiguration { chunk_size, overlap });
    }
    Ok(usize::try_from(step).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_1000_by_200() {
        let cfg = ChunkingConfig::default();
        assert_eq!(cfg.chunk_size, 1000);
        assert_eq!(cfg.overlap, 200);
        assert_eq!(cfg.fetch_size, 50);
        assert_eq!(cfg.step(), Ok(800));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overlap_equal_to_size_is_rejected() {
        let cfg = ChunkingConfig::with_window(100, 100);
        assert_eq!(
            cfg.validate(),
            Err(ChunkConfigError::InvalidConfiguration {
                chunk_size: 100,
                overlap: 100
            })
        );
    }

    #[test]
    fn negative_overlap_widens_step() {
        assert_eq!(window_step(10, -5), Ok(15));
    }

    #[test]
    fn zero_batch_sizes_are_rejected() {
        let mut cfg = ChunkingConfig::default();
        cfg.fetch_size = 0;
        assert_eq!(cfg.validate(), Err(ChunkConfigError::ZeroBatchSize("fetch_size")));

        let mut cfg = ChunkingConfig::default();
        cfg.insert_rows = 0;
        assert_eq!(cfg.validate(), Err(ChunkConfigError::ZeroBatchSize("insert_rows")));
    }
}
