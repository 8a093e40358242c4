use std::time::Duration;

use serde_json::Value;

/// Translation provider interface.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text; `from` may be "auto" for source detection.
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Endpoint answered with a non-success status.
    #[error("HTTP {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Parse(String),
}

/// Client for the unauthenticated web translation endpoint. The response is a
/// nested array whose first element lists `[translated, original, …]` segments;
/// the translated pieces are concatenated in order.
pub struct WebTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl WebTranslator {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, TranslateError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait::async_trait]
impl Translator for WebTranslator {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslateError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", from),
                ("tl", to),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslateError::Http(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        parse_payload(&payload)
    }
}

fn parse_payload(payload: &Value) -> Result<String, TranslateError> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Parse("missing segment array".to_string()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(piece);
        }
    }
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn concatenates_first_items_of_first_array() {
        let payload = json!([
            [["Hello ", "你好", null], ["world", "世界", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_payload(&payload).unwrap(), "Hello world");
    }

    #[test]
    fn missing_segments_is_a_parse_error() {
        let payload = json!({ "unexpected": true });
        assert!(matches!(
            parse_payload(&payload),
            Err(TranslateError::Parse(_))
        ));
    }

    #[test]
    fn non_string_segments_are_skipped() {
        let payload = json!([[["ok", "x", null], [42, "y", null]]]);
        assert_eq!(parse_payload(&payload).unwrap(), "ok");
    }
}
