use crate::constants::{HTTP_TIMEOUT_SECS, TRANSLATE_SOURCE_LANG, TRANSLATE_TARGET_LANG, TRANSLATE_URL};
use crate::error::{AppError, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the public translate endpoint (English to Turkish)
pub struct Translator {
    client: reqwest::Client,
    url: String,
    source: String,
    target: String,
}

impl Translator {
    pub fn new() -> Result<Self> {
        Self::with_languages(TRANSLATE_SOURCE_LANG, TRANSLATE_TARGET_LANG)
    }

    pub fn with_languages(source: &str, target: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: TRANSLATE_URL.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    /// Translate `text`, joining the sentence segments the service returns
    pub async fn translate(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        debug!(chars = text.len(), source = %self.source, target = %self.target, "Translating text");

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", self.source.as_str()),
                ("tl", self.target.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Translation request rejected");
            return Err(AppError::Network(format!("Translation service returned {}", status)));
        }

        let body: Value = response.json().await?;
        join_segments(&body)
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The payload is a nested array whose first element lists segments as
/// `[translated, original, ...]`.
fn join_segments(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Parse("Unexpected translation payload".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}
