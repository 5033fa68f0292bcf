use serde::Serialize;

use crate::models::posting::Posting;

/// Dashboard counters: total jobs, pending applications, applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub total: usize,
    pub pending: usize,
    pub applied: usize,
}

impl JobStats {
    pub fn from_postings(postings: &[Posting]) -> Self {
        let applied = postings.iter().filter(|p| p.is_applied).count();
        Self {
            total: postings.len(),
            pending: postings.len() - applied,
            applied,
        }
    }
}
