pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::interview::handlers as interviews;
use crate::jobs::handlers as jobs;
use crate::questions::handlers as questions;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Uploads (resume PDFs, interview videos) may exceed axum's 2 MB default.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume panels
        .route("/api/v1/resume/review", post(resume::handle_review))
        .route("/api/v1/resume/match", post(resume::handle_match))
        .route(
            "/api/v1/resume/learning-path",
            post(resume::handle_learning_path),
        )
        .route("/api/v1/resume/optimize", post(resume::handle_optimize))
        // Question generation
        .route("/api/v1/questions", post(questions::handle_questions))
        .route("/api/v1/questions/pdf", post(questions::handle_questions_pdf))
        .route("/api/v1/questions/dsa", post(questions::handle_dsa))
        // Job search
        .route("/api/v1/jobs", get(jobs::handle_search))
        .route("/api/v1/jobs/companies", get(jobs::handle_companies))
        // Speech
        .route("/api/v1/evaluation", post(evaluation::handle_evaluate))
        .route("/api/v1/voice", post(evaluation::handle_voice))
        // Mock interview
        .route("/api/v1/interviews", post(interviews::handle_start))
        .route("/api/v1/interviews/:id", get(interviews::handle_get))
        .route(
            "/api/v1/interviews/:id/start",
            post(interviews::handle_resume_start),
        )
        .route(
            "/api/v1/interviews/:id/answer",
            post(interviews::handle_answer),
        )
        .route(
            "/api/v1/interviews/:id/restart",
            post(interviews::handle_restart),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Config;
    use crate::export::render_text_pdf;
    use crate::interview::{InterviewStore, MockDifficulty, MockInterview, MockTopic};
    use crate::jobs::JobSearchClient;
    use crate::llm_client::{ContentPart, GenerativeModel, LlmError, ModelRequest, ModelResponse};
    use crate::normalize::{
        AudioClip, AudioDecoder, NormalizeError, PageRasterizer, ResumeNormalizer,
        ResumeRendering, Transcriber,
    };

    const BOUNDARY: &str = "prepwise-test-boundary";

    /// Answers by prompt shape, standing in for Gemini.
    struct ScriptedModel;

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, LlmError> {
            let has_image = request
                .parts
                .iter()
                .any(|p| matches!(p, ContentPart::InlineData(_)));
            let texts = request.text_parts();
            let first = texts.first().copied().unwrap_or_default();

            let reply = if has_image && first.contains("percentage match") {
                let jd = texts.last().copied().unwrap_or_default();
                if jd.contains("Python") {
                    "1. Percentage match: 78%\n2. Keywords missing: Spark\n3. Final evaluation: strong fit"
                        .to_string()
                } else {
                    "1. Percentage match: 20%".to_string()
                }
            } else if has_image {
                "Jane Doe\nSenior Data Scientist".to_string()
            } else if first.starts_with("Generate a") {
                "Explain GROUP BY.".to_string()
            } else if first.starts_with("Evaluate this") {
                "Clear and correct.".to_string()
            } else if first.starts_with("Overall feedback") {
                "Consistent answers overall.".to_string()
            } else {
                format!("echo: {first}")
            };
            Ok(ModelResponse::from_text(reply))
        }
    }

    struct FixedRasterizer;

    #[async_trait]
    impl PageRasterizer for FixedRasterizer {
        async fn render_first_page(&self, _pdf: &[u8]) -> Result<Vec<u8>, NormalizeError> {
            Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
        }
    }

    struct FixedTranscriber;

    #[async_trait]
    impl Transcriber for FixedTranscriber {
        async fn transcribe(&self, clip: &AudioClip) -> Result<String, NormalizeError> {
            if clip.bytes.as_ref() == b"silence" {
                return Err(NormalizeError::Unrecognized("no speech".to_string()));
            }
            Ok("What is regularization?".to_string())
        }
    }

    fn test_app(jsearch_base_url: &str) -> Router {
        build_router(test_state(jsearch_base_url))
    }

    fn test_state(jsearch_base_url: &str) -> AppState {
        let config = Config::from_lookup(|key| match key {
            "GOOGLE_API_KEY" => Some("g-key".to_string()),
            "JSEARCH_API_KEY" => Some("j-key".to_string()),
            "JSEARCH_BASE_URL" => Some(jsearch_base_url.to_string()),
            _ => None,
        })
        .unwrap();
        AppState {
            model: Arc::new(ScriptedModel),
            jobs: JobSearchClient::new(
                config.jsearch_api_key.clone(),
                config.jsearch_base_url.clone(),
            )
            .unwrap(),
            normalizer: ResumeNormalizer::new(
                Arc::new(FixedRasterizer),
                ResumeRendering::FirstPageImage,
            ),
            decoder: AudioDecoder::new(config.ffmpeg_bin.clone()),
            transcriber: Arc::new(FixedTranscriber),
            interviews: InterviewStore::new(),
            config,
        }
    }

    enum FormPart<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, Vec<u8>),
    }

    fn multipart_request(uri: &str, parts: Vec<FormPart<'_>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                FormPart::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                FormPart::File(name, file_name, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

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

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn resume_pdf() -> Vec<u8> {
        render_text_pdf("Jane Doe\nData Scientist\nPython, SQL, scikit-learn").unwrap()
    }

    /// A whitespace-delimited token made of digits (optionally with a decimal point) and `%`.
    fn has_percentage_token(text: &str) -> bool {
        text.split(|c: char| c.is_whitespace() || c == ':' || c == ',')
            .any(|token| {
                token
                    .strip_suffix('%')
                    .map(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit() || c == '.'))
                    .unwrap_or(false)
            })
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn test_match_end_to_end_returns_percentage() {
        let request = multipart_request(
            "/api/v1/resume/match",
            vec![
                FormPart::Text("job_description", "Data Scientist, 3 years Python"),
                FormPart::File("resume", "resume.pdf", "application/pdf", resume_pdf()),
            ],
        );
        let response = test_app("http://127.0.0.1:9")
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let text = body["response"].as_str().unwrap();
        assert!(has_percentage_token(text), "no percentage in {text:?}");
    }

    #[tokio::test]
    async fn test_missing_resume_is_input_missing() {
        let request = multipart_request(
            "/api/v1/resume/review",
            vec![FormPart::Text("job_description", "Data Scientist")],
        );
        let response = test_app("http://127.0.0.1:9")
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INPUT_MISSING");
        assert_eq!(body["error"]["message"], "Please upload a resume.");
    }

    #[tokio::test]
    async fn test_non_pdf_resume_is_decode_failure() {
        let request = multipart_request(
            "/api/v1/resume/learning-path",
            vec![FormPart::File(
                "resume",
                "resume.pdf",
                "application/pdf",
                b"not a pdf".to_vec(),
            )],
        );
        let response = test_app("http://127.0.0.1:9")
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"]["code"], "DECODE_FAILURE");
    }

    #[tokio::test]
    async fn test_optimize_returns_docx_attachment() {
        let request = multipart_request(
            "/api/v1/resume/optimize",
            vec![
                FormPart::Text("job_description", "Data Scientist"),
                FormPart::File("resume", "resume.pdf", "application/pdf", resume_pdf()),
            ],
        );
        let response = test_app("http://127.0.0.1:9")
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"optimized_resume.docx\""
        );
        assert!(body_bytes(response).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_questions_json_and_pdf() {
        let app = test_app("http://127.0.0.1:9");
        let req = json!({"level": "Advanced", "topic": "Deep Learning", "with_answers": true});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/questions", req.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body["questions"],
            "echo: Generate 30 Advanced interview questions for Deep Learning.\nAlso provide answers."
        );

        let response = app
            .oneshot(json_request("POST", "/api/v1/questions/pdf", req))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_invalid_question_level_is_rejected() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(json_request(
                "POST",
                "/api/v1/questions",
                json!({"level": "Expert"}),
            ))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_dsa_questions() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(json_request(
                "POST",
                "/api/v1/questions/dsa",
                json!({"difficulty": "Easy"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["response"],
            "echo: Generate Easy DSA questions for Data Science with answers."
        );
    }

    #[tokio::test]
    async fn test_companies_catalogue() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(empty_request("GET", "/api/v1/jobs/companies"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["companies"],
            json!(["TCS", "Wipro", "Infosys", "Accenture", "Cognizant"])
        );
    }

    #[tokio::test]
    async fn test_job_search_upstream_error_yields_empty_listings() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let response = test_app(&server.uri())
            .oneshot(empty_request("GET", "/api/v1/jobs?company=wipro"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["company"], "Wipro");
        assert_eq!(body["listings"], json!([]));
    }

    #[tokio::test]
    async fn test_job_search_requires_known_company() {
        let app = test_app("http://127.0.0.1:9");
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/v1/jobs"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INPUT_MISSING");

        let response = app
            .oneshot(empty_request("GET", "/api/v1/jobs?company=Globex"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_voice_assistant() {
        let app = test_app("http://127.0.0.1:9");
        let response = app
            .clone()
            .oneshot(multipart_request(
                "/api/v1/voice",
                vec![FormPart::File("audio", "q.webm", "audio/webm", b"speech".to_vec())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["transcript"], "What is regularization?");
        assert_eq!(body["response"], "echo: What is regularization?");

        let response = app
            .oneshot(multipart_request(
                "/api/v1/voice",
                vec![FormPart::File("audio", "q.webm", "audio/webm", b"silence".to_vec())],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "RECOGNITION_FAILURE");
        assert_eq!(
            body["error"]["message"],
            "Could not understand the audio. Try again."
        );
    }

    #[tokio::test]
    async fn test_evaluation_requires_video() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(multipart_request(
                "/api/v1/evaluation",
                vec![FormPart::Text("job_description", "Data Scientist")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "INPUT_MISSING");
    }

    #[tokio::test]
    async fn test_mock_interview_over_http() {
        let app = test_app("http://127.0.0.1:9");

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/interviews",
                json!({"topic": "SQL", "difficulty": "Hard"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let session = body_json(response).await;
        assert_eq!(session["phase"], "question_posed");
        assert_eq!(session["question"], "Explain GROUP BY.");
        let id = session["id"].as_str().unwrap().to_string();
        let answer_uri = format!("/api/v1/interviews/{id}/answer");

        let mut feedback_seen = Vec::new();
        for i in 1..=3 {
            let answer = format!("answer {i}");
            let part = if i == 2 {
                FormPart::File("audio", "a.wav", "audio/wav", b"speech".to_vec())
            } else {
                FormPart::Text("text", &answer)
            };
            let response = app
                .clone()
                .oneshot(multipart_request(&answer_uri, vec![part]))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["evaluation"], "Clear and correct.");
            feedback_seen.push(!body["feedback"].is_null());
            if i == 2 {
                assert_eq!(body["answer"], "What is regularization?");
            }
        }
        assert_eq!(feedback_seen, vec![false, false, true]);

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/v1/interviews/{id}")))
            .await
            .unwrap();
        let session = body_json(response).await;
        assert_eq!(session["phase"], "feedback_given");
        assert_eq!(session["answers"].as_array().unwrap().len(), 3);
        assert_eq!(session["feedback"], json!(["Consistent answers overall."]));

        let response = app
            .clone()
            .oneshot(empty_request(
                "POST",
                &format!("/api/v1/interviews/{id}/restart"),
            ))
            .await
            .unwrap();
        let session = body_json(response).await;
        assert_eq!(session["phase"], "idle");
        assert_eq!(session["answers"], json!([]));
        assert!(session["question"].is_null());

        // Answering an idle session is rejected until it is started again.
        let response = app
            .clone()
            .oneshot(multipart_request(
                &answer_uri,
                vec![FormPart::Text("text", "too early")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(empty_request(
                "POST",
                &format!("/api/v1/interviews/{id}/start"),
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["phase"], "question_posed");
    }

    #[tokio::test]
    async fn test_status_read_waits_for_in_flight_transition() {
        let state = test_state("http://127.0.0.1:9");
        let session = MockInterview::new(MockTopic::Sql, MockDifficulty::Easy);
        let id = session.id;
        let handle = state.interviews.insert(session).await;
        let app = build_router(state);

        let mut guard = handle.lock().await;
        let pending = tokio::spawn(
            app.oneshot(empty_request("GET", &format!("/api/v1/interviews/{id}"))),
        );
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        guard.question = Some("Explain GROUP BY.".to_string());
        drop(guard);

        let response = pending.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["question"], "Explain GROUP BY.");
    }

    #[tokio::test]
    async fn test_unknown_interview_is_not_found() {
        let response = test_app("http://127.0.0.1:9")
            .oneshot(empty_request(
                "GET",
                "/api/v1/interviews/00000000-0000-0000-0000-000000000000",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_percentage_token_detection() {
        assert!(has_percentage_token("Percentage match: 78%"));
        assert!(has_percentage_token("about 82.5% overall"));
        assert!(!has_percentage_token("no numbers here"));
        assert!(!has_percentage_token("%"));
    }
}
