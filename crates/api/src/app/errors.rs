use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{json, Map, Value};
use validator::{ValidationErrors, ValidationErrorsKind};

use staffhub_employees::{ErrorKind, ServiceError};

/// Map a use-case failure to its HTTP status and JSON error body.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let message = err.public_message();
    match err.kind() {
        ErrorKind::Validation => {
            tracing::warn!(%message, "request rejected");
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        ErrorKind::Conflict => {
            tracing::warn!(%message, "request conflicts with stored data");
            json_error(StatusCode::CONFLICT, "conflict", message)
        }
        ErrorKind::NotFound => {
            tracing::warn!(%message, "resource not found");
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        ErrorKind::Unauthorized => {
            tracing::warn!(%message, "request not authorized");
            json_error(StatusCode::FORBIDDEN, "forbidden", message)
        }
        ErrorKind::Internal => {
            tracing::error!(error = %err, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
        }
    }
}

/// 400 with every failing field, nested paths flattened (`phones[0].number`).
pub fn validation_errors_to_response(errors: &ValidationErrors) -> axum::response::Response {
    let mut fields = Map::new();
    flatten_validation_errors("", errors, &mut fields);
    tracing::warn!(fields = ?fields.keys().collect::<Vec<_>>(), "request failed validation");

    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": "validation_error",
            "message": "One or more validation errors occurred.",
            "fields": fields,
        })),
    )
        .into_response()
}

fn flatten_validation_errors(prefix: &str, errors: &ValidationErrors, out: &mut Map<String, Value>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = list
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>();
                out.insert(path, json!(messages));
            }
            ValidationErrorsKind::Struct(inner) => flatten_validation_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    flatten_validation_errors(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    tracing::warn!(error = %rejection.body_text(), "malformed request body");
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
