use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::matching::MatchMode;

/// Where job postings are read from.
#[derive(Debug, Clone, PartialEq)]
pub enum PostingBackend {
    Postgres { url: String, max_connections: u32 },
    JsonFile(PathBuf),
}

/// Application configuration loaded from environment variables.
/// Startup fails if neither `DATABASE_URL` nor `JOBS_FILE` is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub posting_backend: PostingBackend,
    pub skill_catalog_path: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub default_top_n: usize,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            posting_backend: PostingBackend::JsonFile(PathBuf::from("jobs.json")),
            skill_catalog_path: None,
            match_mode: MatchMode::Substring,
            default_top_n: 10,
            max_upload_bytes: 5 * 1024 * 1024,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let posting_backend = match (var("JOBS_FILE"), var("DATABASE_URL")) {
            (Some(path), _) => PostingBackend::JsonFile(PathBuf::from(path)),
            (None, Some(url)) => PostingBackend::Postgres {
                url,
                max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 5)?,
            },
            (None, None) => {
                bail!("Required environment variable 'DATABASE_URL' is not set (or set 'JOBS_FILE')")
            }
        };

        let match_mode = match var("SKILL_MATCH_MODE") {
            Some(raw) => raw
                .parse::<MatchMode>()
                .with_context(|| format!("SKILL_MATCH_MODE '{raw}' is invalid"))?,
            None => defaults.match_mode,
        };

        let default_top_n = parse_or(&var, "DEFAULT_TOP_N", defaults.default_top_n)?;
        if default_top_n == 0 {
            bail!("DEFAULT_TOP_N must be at least 1");
        }

        Ok(Config {
            posting_backend,
            skill_catalog_path: var("SKILL_CATALOG_PATH").map(PathBuf::from),
            match_mode,
            default_top_n,
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            port: parse_or(&var, "PORT", defaults.port)?,
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
