//! Interactive front-end: one text field in, a two-line verdict out.

use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use metrics::counter;
use serde::Deserialize;

use crate::AppState;
use crate::types::SentimentResult;

const TITLE: &str = "Sentiment Analysis";
const DESCRIPTION: &str = "Enter customer feedback to classify it as Positive or Negative.";

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub feedback: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .with_state(state)
}

/// `Sentiment: Negative\nConfidence: 0.9876`
pub fn format_result(result: &SentimentResult) -> String {
    format!(
        "Sentiment: {}\nConfidence: {:.4}",
        result.label.capitalized(),
        result.score
    )
}

async fn index() -> Html<String> {
    Html(render_page("", ""))
}

#[tracing::instrument(skip_all)]
async fn submit(State(state): State<AppState>, Form(form): Form<FeedbackForm>) -> Response {
    counter!("form_submissions_total").increment(1);
    tracing::info!(text_len = form.feedback.len(), "Processing form submission");

    match state.engine.classify(&form.feedback).await {
        Ok(result) => Html(render_page(&form.feedback, &format_result(&result))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Classification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_page(&form.feedback, "Error")),
            )
                .into_response()
        }
    }
}

fn render_page(feedback: &str, output: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 720px;
            margin: 40px auto;
            padding: 0 20px;
            line-height: 1.6;
        }}
        label {{
            display: block;
            font-weight: 600;
            margin: 16px 0 6px;
        }}
        textarea {{
            width: 100%;
            box-sizing: border-box;
            font: inherit;
            padding: 8px;
        }}
        button {{
            margin-top: 12px;
            padding: 8px 20px;
            font: inherit;
            cursor: pointer;
        }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <p>{description}</p>
    <form method="post" action="/">
        <label for="feedback">Enter Feedback</label>
        <textarea id="feedback" name="feedback" rows="4" placeholder="Type your feedback here...">
{feedback}</textarea>
        <button type="submit">Submit</button>
    </form>
    <label for="result">Result</label>
    <textarea id="result" rows="2" readonly>{output}</textarea>
</body>
</html>
"#,
        title = TITLE,
        description = DESCRIPTION,
        feedback = escape(feedback),
        output = escape(output),
    )
}

/// Escape text for embedding in HTML element content.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
