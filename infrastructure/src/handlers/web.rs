//! Web fetch handler: fetch a URL and extract its text content.

use async_trait::async_trait;
use serde_json::json;
use strata_application::{HandlerError, StepHandler};
use strata_domain::util::truncate_head_tail;
use strata_domain::{Step, StepOutput};
use tracing::debug;

/// Step kind this handler is conventionally registered under.
pub const READ_URL_KIND: &str = "read_url";

/// Maximum response body size (5 MB)
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Default max extracted text size (50 KB)
const DEFAULT_MAX_TEXT: usize = 50 * 1024;

/// Fetches a web page and extracts the readable text.
///
/// Parameters:
/// - `url` (string, required): the URL to fetch
/// - `max_length` (number, optional): maximum extracted text bytes
pub struct WebFetchHandler {
    client: reqwest::Client,
}

impl WebFetchHandler {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebFetchHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepHandler for WebFetchHandler {
    async fn execute(&self, step: &Step) -> Result<StepOutput, HandlerError> {
        let url = step
            .parameters
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::invalid_parameters("'url' is required"))?;

        let max_length = step
            .parameters
            .get("max_length")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_MAX_TEXT);

        debug!(step = %step.id, url, "fetching url");

        let response = self
            .client
            .get(url)
            .header("User-Agent", "strata/0.4 (step handler)")
            .send()
            .await
            .map_err(|e| HandlerError::execution_failed(format!("failed to fetch URL: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::execution_failed(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .bytes()
            .await
            .map_err(|e| HandlerError::execution_failed(format!("failed to read body: {e}")))?;
        if body.len() > MAX_BODY_SIZE {
            return Err(HandlerError::execution_failed(format!(
                "response too large: {} bytes (max: {MAX_BODY_SIZE})",
                body.len()
            )));
        }

        let body_str = String::from_utf8_lossy(&body);
        let text = if content_type.contains("text/html") || content_type.contains("xhtml") {
            html_to_text(&body_str)
        } else {
            body_str.to_string()
        };

        let total_bytes = text.len();
        let content = truncate_head_tail(&text, max_length);

        Ok(StepOutput::text(content).with_data(json!({
            "url": url,
            "status": status.as_u16(),
            "content_type": content_type,
            "total_bytes": total_bytes,
        })))
    }
}

/// Extract readable text from HTML, stripping scripts, styles, and markup.
fn html_to_text(html: &str) -> String {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let selector = Selector::parse("body :not(script):not(style):not(noscript)")
        .expect("static selector");

    let mut parts: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let own_text: String = element
            .children()
            .filter_map(|child| child.value().as_text().map(|t| t.trim().to_string()))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !own_text.is_empty() {
            parts.push(own_text);
        }
    }

    if parts.is_empty() {
        // No body markup worth walking; strip everything in one pass
        let document = Html::parse_fragment(html);
        return document.root_element().text().collect::<Vec<_>>().join(" ");
    }

    parts.join("\n")
}
