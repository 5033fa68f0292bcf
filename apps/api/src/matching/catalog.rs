//! Skill catalog: the versioned vocabulary shared by résumé extraction and
//! role requirement rules.
//!
//! The catalog ships embedded in the binary (`data/skill_catalog.json`) and can
//! be replaced at startup via `SKILL_CATALOG_PATH`. Loading validates that every
//! label a rule requires is one extraction can actually produce.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::matching::requirements::{RoleRequirementRules, RoleRule};
use crate::matching::SkillSet;

const EMBEDDED_CATALOG: &str = include_str!("../../data/skill_catalog.json");

const DEFAULT_MIN_SKILLS: usize = 3;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read skill catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("skill catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skill catalog version must not be empty")]
    MissingVersion,

    #[error("skill '{0}' has a blank label or no triggers")]
    EmptySkill(String),

    #[error("skill '{0}' has a blank trigger")]
    BlankTrigger(String),

    #[error("role rule '{0}' needs at least one title predicate and one required skill")]
    IncompleteRule(String),

    #[error("default role requirements must not be empty")]
    EmptyDefault,

    #[error("'{rule}' requires unknown skill label '{label}'")]
    UnknownLabel { rule: String, label: String },
}

// ────────────────────────────────────────────────────────────────────────────
// On-disk shape
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: String,
    skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    fallback: FallbackFile,
    roles: RolesFile,
}

#[derive(Debug, Deserialize)]
struct FallbackFile {
    #[serde(default = "default_min_skills")]
    min_skills: usize,
    #[serde(default)]
    signals: Vec<SignalFile>,
}

impl Default for FallbackFile {
    fn default() -> Self {
        Self {
            min_skills: DEFAULT_MIN_SKILLS,
            signals: Vec::new(),
        }
    }
}

fn default_min_skills() -> usize {
    DEFAULT_MIN_SKILLS
}

#[derive(Debug, Deserialize)]
struct SignalFile {
    label: String,
    triggers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RolesFile {
    rules: Vec<RuleFile>,
    default: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    name: String,
    title_contains: Vec<String>,
    requires: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validated catalog
// ────────────────────────────────────────────────────────────────────────────

/// A canonical label and the lowercase phrases that imply it.
#[derive(Debug, Clone)]
pub struct SkillEntry {
    pub label: String,
    pub triggers: Vec<String>,
}

/// Coarse signals probed only when the main pass finds too few skills.
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    pub min_skills: usize,
    pub signals: Vec<SkillEntry>,
}

#[derive(Debug, Clone)]
pub struct SkillCatalog {
    version: String,
    skills: Vec<SkillEntry>,
    fallback: FallbackPolicy,
    roles: RoleRequirementRules,
}

impl SkillCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::validate(file)
    }

    fn validate(file: CatalogFile) -> Result<Self, CatalogError> {
        let version = file.version.trim().to_string();
        if version.is_empty() {
            return Err(CatalogError::MissingVersion);
        }

        let skills = file
            .skills
            .into_iter()
            .map(|(label, triggers)| normalize_entry(label, triggers))
            .collect::<Result<Vec<_>, _>>()?;

        let signals = file
            .fallback
            .signals
            .into_iter()
            .map(|s| normalize_entry(s.label, s.triggers))
            .collect::<Result<Vec<_>, _>>()?;

        let vocabulary: BTreeSet<&str> = skills
            .iter()
            .chain(signals.iter())
            .map(|e| e.label.as_str())
            .collect();

        let mut rules = Vec::with_capacity(file.roles.rules.len());
        for rule in file.roles.rules {
            let predicates = normalize_triggers(&rule.title_contains);
            if predicates.is_empty() || rule.requires.is_empty() {
                return Err(CatalogError::IncompleteRule(rule.name));
            }
            let requires = check_labels(&rule.name, rule.requires, &vocabulary)?;
            rules.push(RoleRule {
                name: rule.name.trim().to_lowercase(),
                title_contains: predicates,
                requires,
            });
        }

        if file.roles.default.is_empty() {
            return Err(CatalogError::EmptyDefault);
        }
        let default = check_labels("default", file.roles.default, &vocabulary)?;

        Ok(SkillCatalog {
            version,
            skills,
            fallback: FallbackPolicy {
                min_skills: file.fallback.min_skills,
                signals,
            },
            roles: RoleRequirementRules::new(rules, default),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn skills(&self) -> &[SkillEntry] {
        &self.skills
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    pub fn roles(&self) -> &RoleRequirementRules {
        &self.roles
    }

    /// Every label extraction can emit: skill keys plus fallback signal labels.
    pub fn vocabulary(&self) -> SkillSet {
        self.skills
            .iter()
            .chain(self.fallback.signals.iter())
            .map(|e| e.label.clone())
            .collect()
    }

    pub fn trigger_count(&self) -> usize {
        self.skills.iter().map(|e| e.triggers.len()).sum()
    }
}

fn normalize_entry(label: String, triggers: Vec<String>) -> Result<SkillEntry, CatalogError> {
    let label = label.trim().to_string();
    if label.is_empty() || triggers.is_empty() {
        return Err(CatalogError::EmptySkill(label));
    }
    if triggers.iter().any(|t| t.trim().is_empty()) {
        return Err(CatalogError::BlankTrigger(label));
    }
    Ok(SkillEntry {
        triggers: normalize_triggers(&triggers),
        label,
    })
}

fn normalize_triggers(raw: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

fn check_labels(
    rule: &str,
    labels: Vec<String>,
    vocabulary: &BTreeSet<&str>,
) -> Result<SkillSet, CatalogError> {
    labels
        .into_iter()
        .map(|label| {
            let label = label.trim().to_string();
            if vocabulary.contains(label.as_str()) {
                Ok(label)
            } else {
                Err(CatalogError::UnknownLabel {
                    rule: rule.to_string(),
                    label,
                })
            }
        })
        .collect()
}
