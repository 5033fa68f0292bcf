pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs API
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/stats", get(jobs::handle_job_stats))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        // Skills API
        .route("/api/v1/skills/catalog", get(matching::handle_catalog))
        .route("/api/v1/skills/extract", post(matching::handle_extract_skills))
        // Matching API
        .route("/api/v1/match", post(matching::handle_match))
        .route("/api/v1/match/text", post(matching::handle_match_text))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::extraction::{build_docx, build_pdf};
    use crate::state::test_state;

    const BOUNDARY: &str = "chronos-test-boundary";
    const DOCX_MIME: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn upload_request(
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn backend_resume() -> Vec<u8> {
        build_docx(&[
            "Jane Doe",
            "Backend engineer: Python, SQL, REST API design, Docker and Git.",
            "Excellent communication with stakeholders.",
        ])
    }

    fn ids(matches: &Value) -> Vec<i64> {
        matches
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["posting"]["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(build_router(test_state()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["postings_backend"], "static");
        assert_eq!(body["match_mode"], "substring");
        assert!(!body["catalog_version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_jobs_with_status_filter() {
        let (status, body) = send(
            build_router(test_state()),
            get_request("/api/v1/jobs?status=pending"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body["jobs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(body["count"], 3);
        assert_eq!(body["stats"], json!({"total": 4, "pending": 3, "applied": 1}));
        assert_eq!(body["jobs"][0]["category_label"], "backend");
    }

    #[tokio::test]
    async fn test_list_jobs_with_category_filter() {
        let (_, body) = send(
            build_router(test_state()),
            get_request("/api/v1/jobs?category=sales"),
        )
        .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["jobs"][0]["title"], "Senior Account Executive");
    }

    #[tokio::test]
    async fn test_job_stats() {
        let (status, body) = send(build_router(test_state()), get_request("/api/v1/jobs/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"total": 4, "pending": 3, "applied": 1}));
    }

    #[tokio::test]
    async fn test_get_job_lists_required_skills() {
        let (status, body) = send(build_router(test_state()), get_request("/api/v1/jobs/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category_label"], "sales");
        assert_eq!(
            body["required_skills"],
            json!(["CRM", "Communication", "Lead Generation", "Negotiation", "Sales"])
        );
    }

    #[tokio::test]
    async fn test_get_missing_job_is_404() {
        let (status, body) = send(build_router(test_state()), get_request("/api/v1/jobs/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_catalog_lists_rules_in_order() {
        let (status, body) = send(
            build_router(test_state()),
            get_request("/api/v1/skills/catalog"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rules"][0]["name"], "sales");
        assert_eq!(body["fallback_min_skills"], 3);
        assert_eq!(
            body["default_requires"],
            json!(["Adaptability", "Communication", "Problem Solving", "Teamwork"])
        );
    }

    #[tokio::test]
    async fn test_match_text_ranks_postings() {
        let (status, body) = send(
            build_router(test_state()),
            json_request(
                "/api/v1/match/text?top_n=2",
                json!({"text": "Python and SQL backend work with REST API design, Docker and Git. Strong communication."}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_postings"], 4);
        assert_eq!(body["no_skills_detected"], false);
        assert!(body.get("resume_format").is_none());

        let matches = &body["matches"];
        assert_eq!(matches.as_array().unwrap().len(), 2);
        assert_eq!(matches[0]["posting"]["id"], 2);
        assert_eq!(matches[0]["score"], 100.0);
        assert_eq!(matches[0]["missing_skills"], json!([]));
        // Barista falls back to the default rule: 1 of 4 met.
        assert_eq!(matches[1]["posting"]["id"], 3);
        assert_eq!(matches[1]["score"], 25.0);
        assert_eq!(matches[1]["category_label"], "general");
    }

    #[tokio::test]
    async fn test_match_text_with_no_skills() {
        let (status, body) = send(
            build_router(test_state()),
            json_request("/api/v1/match/text", json!({"text": "The quick brown fox"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["no_skills_detected"], true);
        assert_eq!(body["extracted_skills"], json!([]));
        assert_eq!(ids(&body["matches"]), vec![1, 2, 3, 4]);
        assert!(body["matches"]
            .as_array()
            .unwrap()
            .iter()
            .all(|m| m["score"] == 0.0));
    }

    #[tokio::test]
    async fn test_match_text_applies_filters() {
        let (_, body) = send(
            build_router(test_state()),
            json_request(
                "/api/v1/match/text?status=pending&company=init",
                json!({"text": "PyTorch and LLM work with the OpenAI API in Python"}),
            ),
        )
        .await;
        assert_eq!(body["total_postings"], 1);
        assert_eq!(body["matches"][0]["posting"]["id"], 4);
        assert_eq!(body["matches"][0]["score"], 80.0);
        assert_eq!(body["matches"][0]["missing_skills"], json!(["Machine Learning"]));
    }

    #[tokio::test]
    async fn test_match_upload_docx() {
        let request = upload_request(
            "/api/v1/match?top_n=1",
            "resume",
            "jane.docx",
            DOCX_MIME,
            &backend_resume(),
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_format"], "docx");
        assert_eq!(ids(&body["matches"]), vec![2]);
        assert_eq!(body["matches"][0]["score"], 100.0);
        let skills = body["extracted_skills"].as_array().unwrap();
        assert!(skills.contains(&json!("Python")));
        assert!(skills.contains(&json!("Communication")));
    }

    #[tokio::test]
    async fn test_match_upload_pdf() {
        let pdf = build_pdf(&[
            "Jane Doe - Backend engineer: Python, SQL and Docker",
            "REST API design and Git. Strong communication.",
        ]);
        let request = upload_request("/api/v1/match", "resume", "jane.pdf", "application/pdf", &pdf);
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_format"], "pdf");
        assert_eq!(body["no_skills_detected"], false);
        let skills = body["extracted_skills"].as_array().unwrap();
        for label in ["Python", "SQL", "Docker", "Git", "Communication"] {
            assert!(skills.contains(&json!(label)), "missing {label} in {skills:?}");
        }
        assert_eq!(body["matches"][0]["posting"]["id"], 2);
    }

    #[tokio::test]
    async fn test_match_upload_detects_format_from_extension() {
        let request = upload_request(
            "/api/v1/match",
            "resume",
            "jane.docx",
            "application/octet-stream",
            &backend_resume(),
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume_format"], "docx");
    }

    #[tokio::test]
    async fn test_match_upload_rejects_unsupported_type() {
        let request = upload_request(
            "/api/v1/match",
            "resume",
            "resume.txt",
            "text/plain",
            b"Python developer",
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }

    #[tokio::test]
    async fn test_match_upload_requires_resume_field() {
        let request = upload_request(
            "/api/v1/match",
            "attachment",
            "jane.docx",
            DOCX_MIME,
            &backend_resume(),
        );
        let (status, _) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_rejects_zero_top_n() {
        let request = upload_request(
            "/api/v1/match?top_n=0",
            "resume",
            "jane.docx",
            DOCX_MIME,
            &backend_resume(),
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_corrupt_pdf_extracts_no_skills() {
        let request = upload_request(
            "/api/v1/skills/extract",
            "resume",
            "resume.pdf",
            "application/pdf",
            b"%PDF-1.4 this is not really a pdf",
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["format"], "pdf");
        assert_eq!(body["text_chars"], 0);
        assert_eq!(body["skills"], json!([]));
        assert_eq!(body["no_skills_detected"], true);
    }

    #[tokio::test]
    async fn test_extract_skills_from_docx() {
        let request = upload_request(
            "/api/v1/skills/extract",
            "resume",
            "jane.docx",
            DOCX_MIME,
            &backend_resume(),
        );
        let (status, body) = send(build_router(test_state()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["format"], "docx");
        assert_eq!(
            body["skills"],
            json!([
                "Communication",
                "Data Analysis",
                "Docker",
                "Git",
                "Python",
                "REST APIs",
                "SQL",
                "Stakeholder Management"
            ])
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let mut state = test_state();
        state.config.max_upload_bytes = 256;
        let request = upload_request(
            "/api/v1/skills/extract",
            "resume",
            "jane.docx",
            DOCX_MIME,
            &vec![b'x'; 4096],
        );
        let (status, _) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
