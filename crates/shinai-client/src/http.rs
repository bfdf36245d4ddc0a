//! HTTP client for the fortune backend's `/fortune/analyze` and `/gongsu` endpoints.

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use shinai_core::{FortuneRequest, FortuneResponse};
use thiserror::Error;
use tracing::{info, warn};

/// Shown for a gongsu JSON reply that has neither `message` nor `answer`.
pub const GENERIC_REPLY: &str = "응답을 받아왔습니다.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for the legacy gongsu call.
#[derive(Debug, Clone, Default)]
pub struct GongsuOptions {
    /// Sent as `Authorization: Bearer <token>` when present.
    pub token: Option<String>,
}

/// Reply from `/gongsu`, tagged by the response content type.
#[derive(Debug, Clone, PartialEq)]
pub enum GongsuReply {
    Text(String),
    Json(Value),
}

impl GongsuReply {
    /// Text to display: the raw text, else the JSON `message` field, else
    /// `answer`, else a generic acknowledgement.
    ///
    /// A field counts as absent only when missing or `null`; other non-string
    /// values are shown as their JSON text.
    pub fn into_message(self) -> String {
        match self {
            GongsuReply::Text(text) => text,
            GongsuReply::Json(value) => ["message", "answer"]
                .iter()
                .find_map(|key| value.get(key).filter(|v| !v.is_null()))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| GENERIC_REPLY.to_string()),
        }
    }
}

#[derive(Serialize)]
struct GongsuBody<'a> {
    question: &'a str,
}

/// Stateless client for the fortune backend.
///
/// Every call is a single POST with no retry; timeouts are reqwest's
/// defaults.
#[derive(Debug, Clone)]
pub struct FortuneClient {
    client: reqwest::Client,
    base_url: String,
}

impl FortuneClient {
    /// Create a client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000`; a trailing slash is
    /// dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a birth profile and concern for analysis.
    ///
    /// A 2xx body is returned as parsed, without checking which fields were
    /// present.
    pub async fn analyze_fortune(
        &self,
        request: &FortuneRequest,
    ) -> Result<FortuneResponse, ApiError> {
        let url = format!("{}/fortune/analyze", self.base_url);

        info!(url = %url, birth_time = request.birth_time(), "requesting fortune analysis");
        let resp = self.client.post(&url).json(request).send().await?;
        let resp = check_status(resp).await?;

        let fortune: FortuneResponse = resp.json().await?;
        info!(
            recommendations = fortune.recommendations.len(),
            "fortune analysis received"
        );
        Ok(fortune)
    }

    /// Ask the legacy free-text endpoint a question.
    pub async fn fetch_gongsu(
        &self,
        question: &str,
        opts: &GongsuOptions,
    ) -> Result<GongsuReply, ApiError> {
        let url = format!("{}/gongsu", self.base_url);

        info!(url = %url, authorized = opts.token.is_some(), "requesting gongsu");
        let mut req = self.client.post(&url).json(&GongsuBody { question });
        if let Some(token) = &opts.token {
            req = req.bearer_auth(token);
        }
        let resp = check_status(req.send().await?).await?;

        let is_json = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let text = resp.text().await?;
        if is_json {
            Ok(GongsuReply::Json(serde_json::from_str(&text)?))
        } else {
            Ok(GongsuReply::Text(text))
        }
    }
}

/// Turn a non-2xx response into [`ApiError::Server`], keeping whatever body
/// text could be read.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let body = if body.is_empty() {
        "Network/Server error".to_string()
    } else {
        body
    };
    warn!(status = status.as_u16(), "backend returned error status");
    Err(ApiError::Server {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_trims_trailing_slash() {
        let client = FortuneClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn text_reply_is_its_own_message() {
        assert_eq!(GongsuReply::Text("hello".into()).into_message(), "hello");
    }

    #[test]
    fn json_reply_prefers_message_then_answer() {
        let both = GongsuReply::Json(json!({ "message": "m", "answer": "a" }));
        assert_eq!(both.into_message(), "m");

        let answer = GongsuReply::Json(json!({ "answer": "a" }));
        assert_eq!(answer.into_message(), "a");
    }

    #[test]
    fn json_reply_renders_non_string_fields() {
        let number = GongsuReply::Json(json!({ "message": 42 }));
        assert_eq!(number.into_message(), "42");

        let object = GongsuReply::Json(json!({ "message": { "text": "hi" }, "answer": "a" }));
        assert_eq!(object.into_message(), r#"{"text":"hi"}"#);

        let flag = GongsuReply::Json(json!({ "answer": false }));
        assert_eq!(flag.into_message(), "false");
    }

    #[test]
    fn json_reply_skips_null_fields() {
        let null_message = GongsuReply::Json(json!({ "message": null, "answer": "a" }));
        assert_eq!(null_message.into_message(), "a");

        let all_null = GongsuReply::Json(json!({ "message": null, "answer": null }));
        assert_eq!(all_null.into_message(), GENERIC_REPLY);
    }

    #[test]
    fn json_reply_without_known_fields_is_generic() {
        let other = GongsuReply::Json(json!({ "status": "ok" }));
        assert_eq!(other.into_message(), GENERIC_REPLY);

        let not_object = GongsuReply::Json(json!([1, 2, 3]));
        assert_eq!(not_object.into_message(), GENERIC_REPLY);
    }

    #[test]
    fn server_error_message_carries_status() {
        let err = ApiError::Server {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "server returned 503: maintenance");
    }
}
