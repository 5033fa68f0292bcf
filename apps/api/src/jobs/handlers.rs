//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::filters::JobFilter;
use crate::jobs::stats::JobStats;
use crate::models::posting::Posting;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// A posting as shown on the dashboard, with its resolved category label.
#[derive(Debug, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub posting: Posting,
    pub category_label: String,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobView>,
    pub count: usize,
    pub stats: JobStats,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobView,
    pub required_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// Filtered posting list. `stats` always covers the unfiltered catalog.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<JobListResponse>, AppError> {
    let postings = state.postings.list_postings().await?;
    let stats = JobStats::from_postings(&postings);
    let rules = state.matcher.catalog().roles();

    let jobs: Vec<JobView> = filter
        .apply(postings, rules)
        .into_iter()
        .map(|posting| {
            let category_label = rules.category_label(&posting).to_string();
            JobView {
                posting,
                category_label,
            }
        })
        .collect();

    Ok(Json(JobListResponse {
        count: jobs.len(),
        jobs,
        stats,
    }))
}

/// GET /api/v1/jobs/stats
pub async fn handle_job_stats(State(state): State<AppState>) -> Result<Json<JobStats>, AppError> {
    let postings = state.postings.list_postings().await?;
    Ok(Json(JobStats::from_postings(&postings)))
}

/// GET /api/v1/jobs/:id
///
/// One posting with the skills its title/category requires.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<JobDetailResponse>, AppError> {
    let posting = state
        .postings
        .list_postings()
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

    let required_skills = state
        .matcher
        .required_skills(&posting)
        .iter()
        .cloned()
        .collect();
    let category_label = state.matcher.category_label(&posting).to_string();

    Ok(Json(JobDetailResponse {
        job: JobView {
            posting,
            category_label,
        },
        required_skills,
    }))
}
