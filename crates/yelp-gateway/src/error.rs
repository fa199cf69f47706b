use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub const MISSING_PARAMETER_MESSAGE: &str =
    "Please provide both arguments 'search_term' and 'search_location'";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{}", MISSING_PARAMETER_MESSAGE)]
    MissingParameter,

    #[error("yelp api unreachable: {0}")]
    UpstreamTransport(#[source] reqwest::Error),

    #[error("yelp api returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("malformed yelp api response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedUpstreamResponse(err.to_string())
        } else {
            Self::UpstreamTransport(err)
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingParameter => (StatusCode::BAD_REQUEST, "missing_parameter"),
            Self::UpstreamTransport(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
            Self::UpstreamStatus { .. } => (StatusCode::BAD_GATEWAY, "upstream_error"),
            Self::MalformedUpstreamResponse(_) => {
                (StatusCode::BAD_GATEWAY, "malformed_upstream_response")
            }
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    // Upstream and internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::UpstreamTransport(_) => "The business directory could not be reached".into(),
            Self::UpstreamStatus { status } => {
                format!("The business directory answered with status {}", status)
            }
            Self::MalformedUpstreamResponse(_) => {
                "The business directory returned an unreadable response".into()
            }
            Self::Internal(_) => "An internal error occurred".into(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if let Self::MissingParameter = self {
            return (status, Json(MISSING_PARAMETER_MESSAGE)).into_response();
        }

        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_parameter_renders_advisory_string() {
        let response = AppError::MissingParameter.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!(MISSING_PARAMETER_MESSAGE)
        );
    }

    #[tokio::test]
    async fn upstream_status_maps_to_bad_gateway() {
        let response = AppError::UpstreamStatus { status: 401 }.into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "upstream_error");
        assert!(json["error"]["message"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn malformed_response_hides_parser_detail() {
        let response =
            AppError::MalformedUpstreamResponse("expected value at line 1".into()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "malformed_upstream_response");
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("line 1"));
    }
}
