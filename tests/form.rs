//! Router tests for the interactive form, run against a stub engine.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{FAILING_TEXT, body_bytes, test_state};
use feedback_sentiment::form;
use tower::util::ServiceExt;

async fn page_text(response: axum::response::Response) -> String {
    String::from_utf8(body_bytes(response.into_body()).await).expect("Should be UTF-8")
}

fn submit_request(encoded_body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(encoded_body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_index_renders_empty_form() {
    let app = form::router(test_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = page_text(response).await;
    assert!(page.contains("<h1>Sentiment Analysis</h1>"));
    assert!(page.contains("Enter customer feedback to classify it as Positive or Negative."));
    assert!(page.contains("Enter Feedback"));
    assert!(page.contains("placeholder=\"Type your feedback here...\""));
    assert!(page.contains("Result"));
    assert!(!page.contains("Sentiment: "));
}

#[tokio::test]
async fn test_submit_shows_formatted_result() {
    let app = form::router(test_state());
    let response = app
        .oneshot(submit_request("feedback=This+is+terrible."))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = page_text(response).await;
    assert!(page.contains("Sentiment: Negative\nConfidence: 0.9876"));
    assert!(page.contains(">\nThis is terrible.</textarea>"));
}

#[tokio::test]
async fn test_submit_escapes_feedback() {
    let app = form::router(test_state());
    let response = app
        .oneshot(submit_request("feedback=%3Cscript%3Ealert(1)%3C%2Fscript%3E"))
        .await
        .unwrap();

    let page = page_text(response).await;
    assert!(!page.contains("<script>"));
    assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(page.contains("Sentiment: Positive\nConfidence: 0.9991"));
}

#[tokio::test]
async fn test_submit_inference_failure_renders_error() {
    let app = form::router(test_state());
    let encoded = format!(
        "feedback={}",
        FAILING_TEXT
            .replace('<', "%3C")
            .replace('>', "%3E")
            .replace(' ', "+")
    );
    let response = app.oneshot(submit_request(&encoded)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = page_text(response).await;
    assert!(page.contains(">Error</textarea>"));
}

#[tokio::test]
async fn test_submit_without_field_is_client_error() {
    let app = form::router(test_state());
    let response = app.oneshot(submit_request("other=value")).await.unwrap();
    assert!(response.status().is_client_error());
}
