//! Integration tests for the /upload endpoint
//!
//! Multipart bodies are built by hand so that edge cases (missing part,
//! wrong field name, no filename) are exercised exactly as a client would
//! send them.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose};
use chatrelay::{
    config::Config,
    handlers::{self, AppState},
    upstream::CompletionClient,
};
use proptest::prelude::*;
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Build the real application router (the upstream is never contacted)
fn test_app() -> Router {
    let toml = r#"
[upstream]
base_url = "http://127.0.0.1:9"
model = "test-model"
api_key_env = "TEST_API_KEY"
"#;
    let config: Config = toml::from_str(toml).expect("test config should parse");
    let client = CompletionClient::new(&config.upstream, "test-key".to_string())
        .expect("client should build");
    handlers::create_router(AppState::new(Arc::new(config), client))
}

/// One multipart part: field name, optional filename, raw content
struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content: &'a [u8],
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                    .as_bytes(),
            ),
        }
        body.extend_from_slice(part.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .expect("request should build")
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn text_file_is_base64_encoded_with_filename() {
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "file",
        filename: Some("hello.txt"),
        content: b"hello world",
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({
            "file": general_purpose::STANDARD.encode(b"hello world"),
            "filename": "hello.txt",
        })
    );
}

#[tokio::test]
async fn binary_content_round_trips() {
    let all_bytes: Vec<u8> = (0u8..=255).collect();
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "file",
        filename: Some("bytes.bin"),
        content: &all_bytes,
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    let encoded = json["file"].as_str().expect("file should be a string");
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .expect("file should be valid base64");
    assert_eq!(decoded, all_bytes);
}

#[tokio::test]
async fn empty_file_encodes_to_empty_string() {
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "file",
        filename: Some("empty.txt"),
        content: b"",
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["file"], "");
    assert_eq!(json["filename"], "empty.txt");
}

#[tokio::test]
async fn filename_is_echoed_byte_for_byte() {
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "file",
        filename: Some("résumé (final).v2.pdf"),
        content: b"pdf bytes",
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["filename"], "résumé (final).v2.pdf");
}

#[tokio::test]
async fn part_without_filename_echoes_empty_string() {
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "file",
        filename: None,
        content: b"raw data",
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["filename"], "");
    assert_eq!(
        json["file"],
        general_purpose::STANDARD.encode(b"raw data")
    );
}

#[tokio::test]
async fn missing_file_part_yields_fixed_400_body() {
    let app = test_app();
    let body = multipart_body(&[]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "File is required"}));
}

#[tokio::test]
async fn differently_named_part_yields_fixed_400_body() {
    let app = test_app();
    let body = multipart_body(&[Part {
        name: "attachment",
        filename: Some("hello.txt"),
        content: b"hello",
    }]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json, serde_json::json!({"error": "File is required"}));
}

#[tokio::test]
async fn file_part_is_found_among_other_fields() {
    let app = test_app();
    let body = multipart_body(&[
        Part {
            name: "description",
            filename: None,
            content: b"a note about the file",
        },
        Part {
            name: "file",
            filename: Some("data.csv"),
            content: b"a,b,c",
        },
    ]);

    let response = app
        .oneshot(upload_request(body))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["filename"], "data.csv");
    assert_eq!(json["file"], general_purpose::STANDARD.encode(b"a,b,c"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Round-trip law: for any byte sequence, the returned base64 decodes
    /// back to exactly the uploaded bytes.
    #[test]
    fn uploaded_bytes_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let runtime = tokio::runtime::Runtime::new().expect("runtime should build");
        runtime.block_on(async {
            let app = test_app();
            let body = multipart_body(&[Part {
                name: "file",
                filename: Some("prop.bin"),
                content: &data,
            }]);

            let response = app
                .oneshot(upload_request(body))
                .await
                .expect("request should complete");
            prop_assert_eq!(response.status(), StatusCode::OK);

            let json = response_json(response).await;
            let decoded = general_purpose::STANDARD
                .decode(json["file"].as_str().expect("file should be a string"))
                .expect("file should be valid base64");
            prop_assert_eq!(decoded, data);
            Ok::<(), proptest::test_runner::TestCaseError>(())
        })?;
    }
}
