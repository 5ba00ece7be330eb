//! Transport-neutral responses produced by the handlers.

use serde::Serialize;
use serde_json::{Value, json};
use signals_core::SignalsError;
use signals_policy::DenyReason;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";

/// Status code plus optional body, ready for an HTTP layer to write out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Option<Value>,
}

impl ApiResponse {
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_JSON,
            body: Some(body),
        }
    }

    #[must_use]
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: CONTENT_TYPE_HTML,
            body: Some(Value::String(body)),
        }
    }

    #[must_use]
    pub const fn no_content() -> Self {
        Self {
            status: 204,
            content_type: CONTENT_TYPE_JSON,
            body: None,
        }
    }

    /// 403. A body is only written when there is a `detail` to report.
    #[must_use]
    pub fn forbidden(detail: Option<String>) -> Self {
        Self {
            status: 403,
            content_type: CONTENT_TYPE_JSON,
            body: detail.map(|detail| json!({ "detail": detail })),
        }
    }

    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self {
            status: 404,
            content_type: CONTENT_TYPE_JSON,
            body: Some(json!({ "detail": detail.into() })),
        }
    }

    #[must_use]
    pub fn method_not_allowed(method: &str) -> Self {
        Self {
            status: 405,
            content_type: CONTENT_TYPE_JSON,
            body: Some(json!({ "detail": format!("Method \"{method}\" not allowed.") })),
        }
    }

    #[must_use]
    pub fn deny(reason: DenyReason) -> Self {
        Self::forbidden(reason.detail())
    }

    #[must_use]
    pub fn from_error(err: &SignalsError) -> Self {
        if let SignalsError::MethodNotAllowed(method) = err {
            return Self::method_not_allowed(method);
        }
        let status = err.http_status();
        if status >= 500 {
            tracing::error!(error = %err, error_type = err.error_type(), "request failed");
        }
        Self {
            status,
            content_type: CONTENT_TYPE_JSON,
            body: Some(json!({ "detail": err.to_string(), "error_type": err.error_type() })),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// The `detail` field of the body, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.body.as_ref()?.get("detail")?.as_str()
    }
}
