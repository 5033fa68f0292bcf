// Résumé-to-posting matching: catalog loading, skill extraction, requirement
// rules, scoring and ranking. Pure and synchronous; handlers wrap it for HTTP.

pub mod catalog;
pub mod handlers;
pub mod requirements;
pub mod scoring;
pub mod skills;

use std::collections::BTreeSet;

use crate::matching::catalog::SkillCatalog;
use crate::matching::scoring::{rank, MatchResult};
use crate::models::posting::Posting;

pub use skills::MatchMode;

/// A set of canonical skill labels. Ordered so responses are stable.
pub type SkillSet = BTreeSet<String>;

/// The catalog plus the match mode chosen at startup.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    catalog: SkillCatalog,
    mode: MatchMode,
}

impl SkillMatcher {
    pub fn new(catalog: SkillCatalog, mode: MatchMode) -> Self {
        Self { catalog, mode }
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn extract_skills(&self, text: &str) -> SkillSet {
        skills::extract_skills(&self.catalog, text, self.mode)
    }

    pub fn required_skills<'a>(&'a self, posting: &Posting) -> &'a SkillSet {
        self.catalog.roles().required_skills(posting)
    }

    pub fn category_label<'a>(&'a self, posting: &'a Posting) -> &'a str {
        self.catalog.roles().category_label(posting)
    }

    /// Scores every posting against `extracted` and returns them best first.
    pub fn match_postings<'p>(
        &self,
        extracted: &SkillSet,
        postings: &'p [Posting],
    ) -> Vec<(&'p Posting, MatchResult)> {
        let scored = postings.iter().map(|posting| {
            let result = MatchResult::evaluate(posting.id, extracted, self.required_skills(posting));
            let score = result.score;
            ((posting, result), score)
        });
        rank(scored).into_iter().map(|(pair, _)| pair).collect()
    }
}
