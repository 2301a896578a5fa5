use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use staffhub_core::EmployeeId;
use staffhub_employees::{CreateEmployeeRequest, UpdateEmployeeRequest};

use crate::app::errors;
use crate::app::routes::EMPLOYEES_PATH;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_employee).get(list_employees))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

fn parse_id(raw: &str) -> Result<EmployeeId, axum::response::Response> {
    EmployeeId::from_str(raw).map_err(|e| {
        tracing::warn!(id = %raw, "malformed employee id");
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.message())
    })
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    if let Err(e) = body.validate() {
        return errors::validation_errors_to_response(&e);
    }

    tracing::info!(email = %body.email, "creating employee");
    match services.employees().create_employee(body, None).await {
        Ok(created) => {
            tracing::info!(employee_id = %created.id, "employee created");
            let location = format!("{EMPLOYEES_PATH}/{}", created.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(created),
            )
                .into_response()
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.employees().get_employee_by_id(id).await {
        Ok(Some(employee)) => (StatusCode::OK, Json(employee)).into_response(),
        Ok(None) => {
            tracing::warn!(employee_id = %id, "employee not found");
            errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Employee with ID '{id}' not found."),
            )
        }
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.employees().get_all_employees().await {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    if let Err(e) = body.validate() {
        return errors::validation_errors_to_response(&e);
    }

    tracing::info!(employee_id = %id, "updating employee");
    match services.employees().update_employee(id, body).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    tracing::info!(employee_id = %id, "deactivating employee");
    match services.employees().delete_employee(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
