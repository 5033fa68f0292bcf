//! Match scoring and ranking.
//!
//! score = |extracted ∩ required| / |required| × 100, rounded to one decimal.
//! This is recall against the posting: extra résumé skills cost nothing.

use serde::Serialize;

use crate::matching::SkillSet;

/// Outcome of scoring one posting against one extracted skill set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub posting_id: i64,
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl MatchResult {
    pub fn evaluate(posting_id: i64, extracted: &SkillSet, required: &SkillSet) -> Self {
        let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = required
            .iter()
            .cloned()
            .partition(|label| extracted.contains(label));
        Self {
            posting_id,
            score: score(extracted, required),
            matched_skills,
            missing_skills,
        }
    }
}

/// Percentage of `required` present in `extracted`. Zero when either is empty.
pub fn score(extracted: &SkillSet, required: &SkillSet) -> f64 {
    if extracted.is_empty() || required.is_empty() {
        return 0.0;
    }
    let hits = required.intersection(extracted).count();
    round_one_decimal(hits as f64 / required.len() as f64 * 100.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sorts by score descending. The sort is stable, so equal scores keep their
/// input order.
pub fn rank<T>(scored: impl IntoIterator<Item = (T, f64)>) -> Vec<(T, f64)> {
    let mut ranked: Vec<(T, f64)> = scored.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(labels: &[&str]) -> SkillSet {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn sales() -> SkillSet {
        set(&["Communication", "Sales", "Negotiation", "CRM", "Lead Generation"])
    }

    #[test]
    fn test_partial_overlap_example() {
        assert_eq!(score(&set(&["Python", "Communication"]), &sales()), 20.0);
    }

    #[test]
    fn test_superset_scores_hundred() {
        let mut extracted = sales();
        extracted.insert("Python".to_string());
        assert_eq!(score(&extracted, &sales()), 100.0);
    }

    #[test]
    fn test_single_requirement_met_scores_hundred() {
        assert_eq!(score(&set(&["SQL", "Rust", "Go"]), &set(&["SQL"])), 100.0);
    }

    #[test]
    fn test_empty_sets_score_zero() {
        assert_eq!(score(&set(&["Python"]), &SkillSet::new()), 0.0);
        assert_eq!(score(&SkillSet::new(), &sales()), 0.0);
        assert_eq!(score(&SkillSet::new(), &SkillSet::new()), 0.0);
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        let required = set(&["A", "B", "C"]);
        assert_eq!(score(&set(&["A"]), &required), 33.3);
        assert_eq!(score(&set(&["A", "B"]), &required), 66.7);
    }

    #[test]
    fn test_score_is_bounded() {
        let required = set(&["A", "B", "C", "D", "E", "F", "G"]);
        let pool = ["A", "B", "C", "D", "E", "F", "G", "X", "Y"];
        for n in 0..=pool.len() {
            let s = score(&set(&pool[..n]), &required);
            assert!((0.0..=100.0).contains(&s), "{s}");
        }
    }

    #[test]
    fn test_evaluate_partitions_required_skills() {
        let result = MatchResult::evaluate(9, &set(&["Sales", "CRM", "Python"]), &sales());
        assert_eq!(result.posting_id, 9);
        assert_eq!(result.score, 40.0);
        assert_eq!(result.matched_skills, vec!["CRM", "Sales"]);
        assert_eq!(
            result.missing_skills,
            vec!["Communication", "Lead Generation", "Negotiation"]
        );
    }

    #[test]
    fn test_rank_sorts_descending_and_is_stable() {
        let ranked = rank(vec![("a", 20.0), ("b", 80.0), ("c", 20.0), ("d", 100.0), ("e", 80.0)]);
        let order: Vec<&str> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, vec!["d", "b", "e", "a", "c"]);
    }

    #[test]
    fn test_rank_is_a_permutation() {
        let input = vec![(1, 10.0), (2, 50.0), (3, 0.0), (4, 50.0)];
        let ranked = rank(input.clone());
        assert_eq!(ranked.len(), input.len());
        for item in &input {
            assert!(ranked.contains(item));
        }
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(Vec::<(u8, f64)>::new()).is_empty());
    }
}
