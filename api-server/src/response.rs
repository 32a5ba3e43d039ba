use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse,
};
use timer_core::{AttemptError, StoreError};

pub(crate) fn json_error_with_code(
    status: StatusCode,
    message: impl Into<String>,
    error_code: Option<&str>,
) -> HttpResponse {
    let mut body = serde_json::json!({
        "success": false,
        "error": message.into(),
    });
    if let Some(code) = error_code {
        body["error_code"] = serde_json::Value::String(code.to_string());
    }
    HttpResponse::build(status).json(body)
}

pub(crate) fn attempt_error_response(err: &AttemptError) -> HttpResponse {
    let status = match err {
        AttemptError::Validation(_) | AttemptError::ContentRejected { .. } => {
            StatusCode::BAD_REQUEST
        }
        AttemptError::NotLeader { .. } => StatusCode::FORBIDDEN,
        AttemptError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
        AttemptError::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!("request failed: {err}");
        return json_error_with_code(status, "internal server error", Some(err.code()));
    }
    json_error_with_code(status, err.to_string(), Some(err.code()))
}

/// Map body extraction failures (bad JSON, wrong field types) onto the API's
/// error envelope.
pub(crate) fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = json_error_with_code(
        StatusCode::BAD_REQUEST,
        format!("invalid request body: {err}"),
        Some("invalid_json"),
    );
    InternalError::from_response(err, response).into()
}
