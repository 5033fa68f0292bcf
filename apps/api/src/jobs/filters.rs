use serde::{Deserialize, Serialize};

use crate::matching::requirements::RoleRequirementRules;
use crate::models::posting::Posting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliedStatus {
    #[default]
    All,
    Applied,
    Pending,
}

/// Dashboard filters. Every supplied filter must match; blank values are ignored.
/// Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobFilter {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Compared against the category label (explicit or title-derived).
    pub category: Option<String>,
    #[serde(default)]
    pub status: AppliedStatus,
}

impl JobFilter {
    pub fn matches(&self, posting: &Posting, rules: &RoleRequirementRules) -> bool {
        let status_ok = match self.status {
            AppliedStatus::All => true,
            AppliedStatus::Applied => posting.is_applied,
            AppliedStatus::Pending => !posting.is_applied,
        };

        status_ok
            && text_matches(self.title.as_deref(), Some(&posting.title))
            && text_matches(self.company.as_deref(), Some(&posting.company))
            && text_matches(self.location.as_deref(), posting.location.as_deref())
            && text_matches(self.category.as_deref(), Some(rules.category_label(posting)))
    }

    /// Keeps matching postings in their original order.
    pub fn apply(&self, postings: Vec<Posting>, rules: &RoleRequirementRules) -> Vec<Posting> {
        postings
            .into_iter()
            .filter(|p| self.matches(p, rules))
            .collect()
    }
}

fn text_matches(needle: Option<&str>, haystack: Option<&str>) -> bool {
    let needle = match needle.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_lowercase(),
        None => return true,
    };
    haystack
        .map(|h| h.to_lowercase().contains(&needle))
        .unwrap_or(false)
}
