//! Skill extraction: keyword containment of catalog triggers against
//! lowercased résumé text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::catalog::{SkillCatalog, SkillEntry};
use crate::matching::SkillSet;

/// How a trigger is located in the text.
///
/// `Substring` is plain containment, so `"java"` also fires inside
/// `"javascript"`. `Token` requires a non-alphanumeric character (or the text
/// edge) on both sides of the occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    #[default]
    Substring,
    Token,
}

#[derive(Debug, Error)]
#[error("unknown match mode '{0}', expected 'substring' or 'token'")]
pub struct ParseMatchModeError(String);

impl FromStr for MatchMode {
    type Err = ParseMatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(MatchMode::Substring),
            "token" => Ok(MatchMode::Token),
            other => Err(ParseMatchModeError(other.to_string())),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Substring => f.write_str("substring"),
            MatchMode::Token => f.write_str("token"),
        }
    }
}

/// Whether `trigger` occurs in `haystack`. Both must already be lowercase.
///
/// In token mode a boundary is only required on a side where the trigger
/// itself ends in an alphanumeric character, so `"+ years"` matches
/// `"5+ years"`.
pub fn contains_trigger(haystack: &str, trigger: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => haystack.contains(trigger),
        MatchMode::Token => {
            let open_start = !trigger.chars().next().is_some_and(char::is_alphanumeric);
            let open_end = !trigger.chars().next_back().is_some_and(char::is_alphanumeric);
            haystack.match_indices(trigger).any(|(start, found)| {
                let before = haystack[..start].chars().next_back();
                let after = haystack[start + found.len()..].chars().next();
                (open_start || !before.is_some_and(char::is_alphanumeric))
                    && (open_end || !after.is_some_and(char::is_alphanumeric))
            })
        }
    }
}

fn entry_matches(entry: &SkillEntry, haystack: &str, mode: MatchMode) -> bool {
    entry
        .triggers
        .iter()
        .any(|trigger| contains_trigger(haystack, trigger, mode))
}

/// Extracts canonical skill labels from free text.
///
/// Each label is added on its first trigger hit. When fewer than the catalog's
/// `min_skills` labels are found, the coarse fallback signals (education,
/// years of experience, spoken languages) are probed as well.
pub fn extract_skills(catalog: &SkillCatalog, text: &str, mode: MatchMode) -> SkillSet {
    let haystack = text.to_lowercase();

    let mut found: SkillSet = catalog
        .skills()
        .iter()
        .filter(|entry| entry_matches(entry, &haystack, mode))
        .map(|entry| entry.label.clone())
        .collect();

    let fallback = catalog.fallback();
    if found.len() < fallback.min_skills {
        let before = found.len();
        found.extend(
            fallback
                .signals
                .iter()
                .filter(|signal| entry_matches(signal, &haystack, mode))
                .map(|signal| signal.label.clone()),
        );
        debug!(
            added = found.len() - before,
            "Fallback signals probed for sparse résumé"
        );
    }

    debug!(
        text_chars = text.chars().count(),
        skills = found.len(),
        %mode,
        "Extracted skills from text"
    );

    found
}
