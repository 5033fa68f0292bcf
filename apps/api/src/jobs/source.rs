//! Posting sources. Pluggable, read-only access to the job catalog.
//!
//! `AppState` holds an `Arc<dyn PostingSource>`, chosen at startup from config.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::posting::Posting;

/// The job catalog trait. The matcher only ever reads through it.
#[async_trait]
pub trait PostingSource: Send + Sync {
    async fn list_postings(&self) -> Result<Vec<Posting>, AppError>;

    /// Short backend label for health output ("postgres" | "static").
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// PgPostingSource: the `jobs` table
// ────────────────────────────────────────────────────────────────────────────

/// `category` is optional in the `jobs` schema, so it is read through the row's
/// JSON form and comes back NULL when the column does not exist.
const LIST_POSTINGS_SQL: &str = r#"
    SELECT j.id::BIGINT AS id, j.title, j.company, j.location,
           to_jsonb(j) ->> 'category' AS category,
           j.is_applied
    FROM jobs j
    ORDER BY j.id
"#;

pub struct PgPostingSource {
    pool: PgPool,
}

impl PgPostingSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostingSource for PgPostingSource {
    async fn list_postings(&self) -> Result<Vec<Posting>, AppError> {
        let postings = sqlx::query_as::<_, Posting>(LIST_POSTINGS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(postings)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StaticPostingSource: fixed list, loaded once
// ────────────────────────────────────────────────────────────────────────────

pub struct StaticPostingSource {
    postings: Vec<Posting>,
}

impl StaticPostingSource {
    /// Fails if two postings share an id.
    pub fn new(postings: Vec<Posting>) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(postings.len());
        for posting in &postings {
            if !seen.insert(posting.id) {
                bail!("duplicate posting id {}", posting.id);
            }
        }
        Ok(Self { postings })
    }

    /// Loads a JSON array of postings.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read jobs file {}", path.display()))?;
        let postings: Vec<Posting> = serde_json::from_str(&raw)
            .with_context(|| format!("Jobs file {} is not a JSON array of postings", path.display()))?;
        let source = Self::new(postings)
            .with_context(|| format!("Jobs file {} is invalid", path.display()))?;
        info!(path = %path.display(), count = source.postings.len(), "Loaded static job postings");
        Ok(source)
    }
}

#[async_trait]
impl PostingSource for StaticPostingSource {
    async fn list_postings(&self) -> Result<Vec<Posting>, AppError> {
        Ok(self.postings.clone())
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}
