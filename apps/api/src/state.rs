use std::sync::Arc;

use crate::config::Config;
use crate::jobs::source::PostingSource;
use crate::matching::SkillMatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only job catalog. Postgres in production, a JSON fixture otherwise.
    pub postings: Arc<dyn PostingSource>,
    /// Skill matcher built from the validated catalog; immutable for the process lifetime.
    pub matcher: Arc<SkillMatcher>,
    pub config: Config,
}

/// State over a small fixed job catalog and the embedded skill catalog.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    use crate::jobs::source::StaticPostingSource;
    use crate::matching::catalog::SkillCatalog;
    use crate::matching::MatchMode;
    use crate::models::posting::Posting;

    let posting = |id: i64, title: &str, company: &str, is_applied: bool| Posting {
        id,
        title: title.to_string(),
        company: company.to_string(),
        location: Some("Remote".to_string()),
        category: None,
        is_applied,
    };

    let postings = StaticPostingSource::new(vec![
        posting(1, "Senior Account Executive", "Acme", true),
        posting(2, "Backend Engineer", "Globex", false),
        posting(3, "Barista", "Bean There", false),
        posting(4, "Machine Learning Engineer", "Initech", false),
    ])
    .unwrap();

    AppState {
        postings: Arc::new(postings),
        matcher: Arc::new(SkillMatcher::new(
            SkillCatalog::embedded().unwrap(),
            MatchMode::Substring,
        )),
        config: Config::default(),
    }
}
