use crate::{
    data::student::{Student, StudentDraft},
    error::{
        GENERIC_SERVER_MESSAGE, MalformedBodySnafu, MissingStudentSnafu, ParseUuidSnafu,
        RegistrarResult,
    },
    state::RegistrarState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use snafu::ResultExt;
use std::any::Any;
use uuid::Uuid;

/// The `{success, data | message}` envelope every successful call returns.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub const fn message(message: &'static str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message),
        }
    }
}

fn parse_id(raw: &str) -> RegistrarResult<Uuid> {
    Uuid::try_parse(raw).context(ParseUuidSnafu { original: raw })
}

pub async fn get_root() -> Json<Value> {
    Json(json!({"message": "Student Registration API is running!"}))
}

pub async fn post_student(
    State(state): State<RegistrarState>,
    body: Result<Json<StudentDraft>, JsonRejection>,
) -> RegistrarResult<(StatusCode, Json<ApiResponse<Student>>)> {
    let Json(draft) = body.context(MalformedBodySnafu)?;
    let student = state.register(&draft).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(student))))
}

pub async fn get_students(
    State(state): State<RegistrarState>,
) -> RegistrarResult<Json<ApiResponse<Vec<Student>>>> {
    let students = state.store().list().await?;
    Ok(Json(ApiResponse::data(students)))
}

pub async fn get_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<ApiResponse<Student>>> {
    let id = parse_id(&id)?;

    match state.store().get_by_id(id).await? {
        Some(student) => Ok(Json(ApiResponse::data(student))),
        None => MissingStudentSnafu { id }.fail(),
    }
}

pub async fn delete_student(
    State(state): State<RegistrarState>,
    Path(id): Path<String>,
) -> RegistrarResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id)?;

    if !state.store().delete_by_id(id).await? {
        return MissingStudentSnafu { id }.fail();
    }

    info!(%id, "Deleted student");
    Ok(Json(ApiResponse::message("Student deleted successfully")))
}

#[allow(clippy::needless_pass_by_value)] //signature required by `CatchPanicLayer`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(details, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "success": false,
            "message": GENERIC_SERVER_MESSAGE,
            "error": "Internal server error",
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests;
