//! End-to-end flow tests with mocked Gemini and arXiv endpoints.
//!
//! The real HTTP clients talk to an `httpmock` server; PDF extraction is
//! stubbed through the `TextExtractor` seam so no real PDF bytes are needed.

use httpmock::{Method::GET, Method::POST, MockServer};
use paperlens::{
    citations::ArxivClient,
    extract::{ExtractError, TextExtractor},
    llm::GeminiClient,
    processing::{PaperApi, PaperService, PaperUpload, QaError, QUESTION_QUOTA},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const MODEL: &str = "gemini-2.0-flash";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

struct StubExtractor(&'static str);

impl TextExtractor for StubExtractor {
    fn extract(&self, _data: &[u8]) -> Result<String, ExtractError> {
        Ok(self.0.to_string())
    }
}

fn build_service(server: &MockServer, document_text: &'static str) -> PaperService {
    let model = GeminiClient::new(
        server.base_url(),
        MODEL,
        "test-key",
        Duration::from_secs(5),
    )
    .expect("gemini client");
    let arxiv = ArxivClient::new(server.base_url(), Duration::from_secs(5)).expect("arxiv client");
    PaperService::with_components(Arc::new(StubExtractor(document_text)), Box::new(model), arxiv)
}

fn pdf_upload() -> PaperUpload {
    PaperUpload {
        content_type: Some("application/pdf".into()),
        file_name: Some("paper.pdf".into()),
        data: b"%PDF-1.4 stub".to_vec(),
    }
}

fn gemini_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn upload_summarize_then_ask_grounded_questions() {
    let server = MockServer::start_async().await;

    let summarize_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .body_contains("literature reviews");
            then.status(200)
                .json_body(gemini_response("Key equation: $$E = mc^2$$"));
        })
        .await;
    let answer_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .body_contains("Document Summary");
            then.status(200)
                .json_body(gemini_response("Energy equals mass times c squared."));
        })
        .await;

    let service = build_service(&server, "the paper body to summarize");
    let outcome = service
        .upload_and_summarize(pdf_upload())
        .await
        .expect("upload succeeds");

    // Math fences from the model are normalized before storage.
    assert_eq!(outcome.summary, "Key equation: $E = mc^2$");
    summarize_mock.assert_async().await;

    let answer = service
        .answer_about_summary(&outcome.job_id, "What is the key equation?")
        .await
        .expect("question answered");
    assert_eq!(answer, "Energy equals mass times c squared.");
    answer_mock.assert_async().await;

    let err = service
        .answer_about_summary("never-issued-id", "Anything?")
        .await
        .unwrap_err();
    assert!(matches!(err, QaError::SummarySessionExpired));
    assert!(err.to_string().contains("The document was processed"));
}

#[tokio::test]
async fn full_text_flow_counts_down_and_stops_at_the_quota() {
    let server = MockServer::start_async().await;

    let answer_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200)
                .json_body(gemini_response("An answer from the paper."));
        })
        .await;

    let service = build_service(&server, "full text of the paper");
    let outcome = service
        .upload_full_text(pdf_upload())
        .await
        .expect("upload succeeds");

    for turn in 1..=QUESTION_QUOTA {
        let answer = service
            .answer_about_full_text(&outcome.job_id, "What method is used?")
            .await
            .expect("within quota");
        assert_eq!(answer.questions_remaining, QUESTION_QUOTA - turn);
    }

    let err = service
        .answer_about_full_text(&outcome.job_id, "A sixth question?")
        .await
        .unwrap_err();
    assert!(matches!(err, QaError::QuotaExceeded { quota: 5 }));

    // The rejected question never reached the model.
    assert_eq!(answer_mock.hits_async().await, QUESTION_QUOTA as usize);
}

#[tokio::test]
async fn model_failure_surfaces_and_refunds_the_quota_slot() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(429)
                .json_body(json!({ "error": { "message": "quota exhausted" } }));
        })
        .await;

    let service = build_service(&server, "full text of the paper");
    let outcome = service
        .upload_full_text(pdf_upload())
        .await
        .expect("upload succeeds");

    let err = service
        .answer_about_full_text(&outcome.job_id, "What method is used?")
        .await
        .unwrap_err();
    match err {
        QaError::AnswerFailed(inner) => {
            assert!(inner.to_string().contains("quota exhausted"));
        }
        other => panic!("expected AnswerFailed, got {other:?}"),
    }

    let job = service
        .jobs()
        .get_full_text_job(&outcome.job_id)
        .expect("job still present");
    assert_eq!(job.questions_asked, 0);
}

#[tokio::test]
async fn summarizer_failure_creates_no_job() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(500)
                .json_body(json!({ "error": { "message": "backend exploded" } }));
        })
        .await;

    let service = build_service(&server, "the paper body");
    let err = service.upload_and_summarize(pdf_upload()).await.unwrap_err();
    assert!(err.to_string().contains("backend exploded"));
    assert_eq!(service.metrics_snapshot().papers_processed, 0);
}

const SIX_AUTHOR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query: id_list=2301.07041</title>
  <entry>
    <title>T</title>
    <published>2020-01-15T00:00:00Z</published>
    <author><name>A</name></author>
    <author><name>B</name></author>
    <author><name>C</name></author>
    <author><name>D</name></author>
    <author><name>E</name></author>
    <author><name>F</name></author>
  </entry>
</feed>"#;

#[tokio::test]
async fn citation_styles_apply_their_author_cutoffs() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/query")
                .query_param("id_list", "2301.07041");
            then.status(200).body(SIX_AUTHOR_FEED);
        })
        .await;

    let service = build_service(&server, "unused");

    let ieee = service
        .generate_citation("https://arxiv.org/abs/2301.07041", "IEEE")
        .await
        .expect("ieee citation");
    assert_eq!(
        ieee,
        "A, B, C, D, E, F, \"T,\" arXiv preprint arXiv:2301.07041, 2020."
    );

    let apa = service
        .generate_citation("https://arxiv.org/pdf/2301.07041v3", "apa")
        .await
        .expect("apa citation");
    assert_eq!(
        apa,
        "A, B, C, D, E, et al. (2020). T. arXiv preprint arXiv:2301.07041."
    );

    assert_eq!(service.metrics_snapshot().citations_generated, 2);
}

#[tokio::test]
async fn bad_citation_inputs_never_hit_the_network() {
    let server = MockServer::start_async().await;
    let query_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/query");
            then.status(200).body(SIX_AUTHOR_FEED);
        })
        .await;

    let service = build_service(&server, "unused");

    let err = service
        .generate_citation("https://example.org/not-arxiv", "APA")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid arXiv URL format");

    let err = service
        .generate_citation("https://arxiv.org/abs/2301.07041", "harvard")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unknown citation style"));

    assert_eq!(query_mock.hits_async().await, 0);
}
