use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One job listing from the external catalog. Read only for this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Posting {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub is_applied: bool,
}

impl Posting {
    /// Explicit category when present and non-blank.
    pub fn explicit_category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
