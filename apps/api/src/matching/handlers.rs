//! Axum route handlers for the Matching API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::{extract_text, ResumeFormat};
use crate::jobs::filters::JobFilter;
use crate::matching::MatchMode;
use crate::models::posting::Posting;
use crate::state::AppState;

/// Multipart field carrying the résumé file.
pub const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct MatchOptions {
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct MatchTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct RankedJob {
    pub posting: Posting,
    pub category_label: String,
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub extracted_skills: Vec<String>,
    /// Lets the presentation layer say "no skills detected" instead of showing zeros.
    pub no_skills_detected: bool,
    pub matches: Vec<RankedJob>,
    /// Postings scored after filtering, before `top_n` truncation.
    pub total_postings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_format: Option<ResumeFormat>,
    pub match_mode: MatchMode,
    pub catalog_version: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub format: ResumeFormat,
    pub text_chars: usize,
    pub skills: Vec<String>,
    pub no_skills_detected: bool,
}

#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub name: String,
    pub title_contains: Vec<String>,
    pub requires: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub version: String,
    pub match_mode: MatchMode,
    pub skills: Vec<String>,
    pub fallback_labels: Vec<String>,
    pub fallback_min_skills: usize,
    pub rules: Vec<RuleSummary>,
    pub default_requires: Vec<String>,
}

struct ResumeUpload {
    format: ResumeFormat,
    bytes: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/match
///
/// Multipart résumé upload → extracted skills and postings ranked by match
/// score. Accepts the same filters as `GET /api/v1/jobs` plus `top_n`.
pub async fn handle_match(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
    Query(options): Query<MatchOptions>,
    multipart: Multipart,
) -> Result<Json<MatchReport>, AppError> {
    let top_n = resolve_top_n(&options, state.config.default_top_n)?;
    let upload = read_resume(multipart).await?;
    let format = upload.format;
    let text = extract_upload(upload).await?;

    let report = build_report(&state, &text, &filter, top_n, Some(format)).await?;
    Ok(Json(report))
}

/// POST /api/v1/match/text
///
/// Same as `/api/v1/match` for callers that already hold the résumé text.
pub async fn handle_match_text(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
    Query(options): Query<MatchOptions>,
    Json(request): Json<MatchTextRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let top_n = resolve_top_n(&options, state.config.default_top_n)?;
    let report = build_report(&state, &request.text, &filter, top_n, None).await?;
    Ok(Json(report))
}

/// POST /api/v1/skills/extract
///
/// Multipart résumé upload → extracted skill labels only.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let upload = read_resume(multipart).await?;
    let format = upload.format;
    let text = extract_upload(upload).await?;
    let skills: Vec<String> = state.matcher.extract_skills(&text).into_iter().collect();

    Ok(Json(ExtractSkillsResponse {
        format,
        text_chars: text.chars().count(),
        no_skills_detected: skills.is_empty(),
        skills,
    }))
}

/// GET /api/v1/skills/catalog
pub async fn handle_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let catalog = state.matcher.catalog();
    let roles = catalog.roles();

    Json(CatalogResponse {
        version: catalog.version().to_string(),
        match_mode: state.matcher.mode(),
        skills: catalog.skills().iter().map(|e| e.label.clone()).collect(),
        fallback_labels: catalog
            .fallback()
            .signals
            .iter()
            .map(|s| s.label.clone())
            .collect(),
        fallback_min_skills: catalog.fallback().min_skills,
        rules: roles
            .rules()
            .iter()
            .map(|rule| RuleSummary {
                name: rule.name.clone(),
                title_contains: rule.title_contains.clone(),
                requires: rule.requires.iter().cloned().collect(),
            })
            .collect(),
        default_requires: roles.default_requirements().iter().cloned().collect(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline helpers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_top_n(options: &MatchOptions, default_top_n: usize) -> Result<usize, AppError> {
    match options.top_n {
        Some(0) => Err(AppError::Validation("top_n must be at least 1".to_string())),
        Some(n) => Ok(n),
        None => Ok(default_top_n),
    }
}

async fn read_resume(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let file_name = field.file_name().map(str::to_owned);
        let format = ResumeFormat::detect(content_type.as_deref(), file_name.as_deref())
            .ok_or_else(|| {
                AppError::UnsupportedMediaType(format!(
                    "résumé must be a PDF or DOCX file (got content type '{}', file name '{}')",
                    content_type.as_deref().unwrap_or("none"),
                    file_name.as_deref().unwrap_or("none"),
                ))
            })?;

        let bytes = field.bytes().await.map_err(multipart_error)?;
        debug!(format = format.as_str(), bytes = bytes.len(), "Received résumé upload");
        return Ok(ResumeUpload { format, bytes });
    }

    Err(AppError::Validation(format!(
        "multipart field '{RESUME_FIELD}' is required"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
    }
}

/// Document parsing is CPU bound, so it runs on the blocking pool.
async fn extract_upload(upload: ResumeUpload) -> Result<String, AppError> {
    let ResumeUpload { format, bytes } = upload;
    tokio::task::spawn_blocking(move || extract_text(&bytes, format))
        .await
        .map_err(|e| AppError::Internal(e.into()))
}

async fn build_report(
    state: &AppState,
    text: &str,
    filter: &JobFilter,
    top_n: usize,
    resume_format: Option<ResumeFormat>,
) -> Result<MatchReport, AppError> {
    let matcher = &state.matcher;
    let postings = filter.apply(
        state.postings.list_postings().await?,
        matcher.catalog().roles(),
    );

    let extracted = matcher.extract_skills(text);
    let ranked = matcher.match_postings(&extracted, &postings);

    info!(
        skills = extracted.len(),
        postings = postings.len(),
        top_score = ranked.first().map(|(_, r)| r.score).unwrap_or(0.0),
        top_n,
        "Match pass complete"
    );

    let matches = ranked
        .into_iter()
        .take(top_n)
        .map(|(posting, result)| RankedJob {
            category_label: matcher.category_label(posting).to_string(),
            posting: posting.clone(),
            score: result.score,
            matched_skills: result.matched_skills,
            missing_skills: result.missing_skills,
        })
        .collect();

    Ok(MatchReport {
        no_skills_detected: extracted.is_empty(),
        extracted_skills: extracted.into_iter().collect(),
        matches,
        total_postings: postings.len(),
        resume_format,
        match_mode: matcher.mode(),
        catalog_version: matcher.catalog().version().to_string(),
        generated_at: Utc::now(),
    })
}
