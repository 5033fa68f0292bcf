//! Role requirement rules: an ordered table of title predicates mapped to the
//! skills a posting of that shape asks for.
//!
//! First match wins. A posting that matches nothing falls through to the
//! default set, so `required_skills` is total.

use crate::matching::SkillSet;
use crate::models::posting::Posting;

/// Category label for postings with no explicit category and no matching rule.
pub const GENERAL_CATEGORY: &str = "general";

#[derive(Debug, Clone)]
pub struct RoleRule {
    /// Lowercase rule name, doubles as the title-derived category label.
    pub name: String,
    /// Lowercase substrings; any one occurring in the subject selects the rule.
    pub title_contains: Vec<String>,
    pub requires: SkillSet,
}

impl RoleRule {
    fn matches(&self, subject_lower: &str) -> bool {
        self.title_contains
            .iter()
            .any(|needle| subject_lower.contains(needle.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct RoleRequirementRules {
    rules: Vec<RoleRule>,
    default: SkillSet,
}

impl RoleRequirementRules {
    pub fn new(rules: Vec<RoleRule>, default: SkillSet) -> Self {
        Self { rules, default }
    }

    pub fn rules(&self) -> &[RoleRule] {
        &self.rules
    }

    pub fn default_requirements(&self) -> &SkillSet {
        &self.default
    }

    /// First rule whose predicate occurs in `subject` (case-insensitive).
    pub fn first_match(&self, subject: &str) -> Option<&RoleRule> {
        let subject = subject.to_lowercase();
        self.rules.iter().find(|rule| rule.matches(&subject))
    }

    /// Rule for a posting: title first, then its explicit category.
    pub fn rule_for(&self, posting: &Posting) -> Option<&RoleRule> {
        self.first_match(&posting.title)
            .or_else(|| posting.explicit_category().and_then(|c| self.first_match(c)))
    }

    /// Required skill set for a posting. Never empty.
    pub fn required_skills(&self, posting: &Posting) -> &SkillSet {
        self.rule_for(posting)
            .map(|rule| &rule.requires)
            .unwrap_or(&self.default)
    }

    /// Display category: explicit category, else the title's rule name, else `general`.
    pub fn category_label<'a>(&'a self, posting: &'a Posting) -> &'a str {
        posting
            .explicit_category()
            .or_else(|| self.first_match(&posting.title).map(|r| r.name.as_str()))
            .unwrap_or(GENERAL_CATEGORY)
    }
}
