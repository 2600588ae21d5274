use crate::data::{student::StudentField, validation::FieldErrors};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde_json::json;
use snafu::Snafu;
use std::num::ParseIntError;
use uuid::Uuid;

pub type RegistrarResult<T> = Result<T, RegistrarError>;

pub const GENERIC_SERVER_MESSAGE: &str = "Something went wrong!";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RegistrarError {
    #[snafu(display("Error opening database"))]
    OpenDatabase { source: sqlx::Error },
    #[snafu(display("Error making SQL query"))]
    MakeQuery { source: sqlx::Error },
    #[snafu(display("Error migrating DB schema"))]
    MigrateError { source: sqlx::migrate::MigrateError },
    #[snafu(display("Error converting {} to `time::Date`", date))]
    InvalidDate {
        source: time::error::ComponentRange,
        date: jiff::civil::Date,
    },
    #[snafu(display("Stored student {} has an unreadable {}", id, field))]
    InvalidStoredStudent { id: Uuid, field: &'static str },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse IP port"))]
    ParsePort { source: ParseIntError },
    #[snafu(display("Unknown store {:?}, expected `postgres` or `memory`", provided))]
    UnknownStore { provided: String },
    #[snafu(display("Invalid CORS origin {:?}", provided))]
    InvalidCorsOrigin {
        source: InvalidHeaderValue,
        provided: String,
    },
    #[snafu(display("Invalid timezone {:?}", tz))]
    InvalidTimezone { source: jiff::Error, tz: String },
    #[snafu(display("Invalid locale {:?}", provided))]
    InvalidLocale {
        source: icu::locale::ParseError,
        provided: String,
    },
    #[snafu(display("Invalid hour cycle {:?}", provided))]
    InvalidHourCycle { provided: String },
    #[snafu(display("Invalid calendar algorithm {:?}", provided))]
    InvalidCalendarAlgorithm { provided: String },
    #[snafu(display("Unable to create date formatter"))]
    BadDateTimeFormatter {
        source: icu::datetime::DateTimeFormatterLoadError,
    },
    #[snafu(display("Unable to place {} in a timezone", date))]
    ZoneDate {
        source: jiff::Error,
        date: jiff::civil::Date,
    },
    #[snafu(display("Student record failed validation"))]
    Validation { errors: FieldErrors },
    #[snafu(display("A student with email {:?} already exists", email))]
    DuplicateEmail { email: String },
    #[snafu(display("Unable to find student with UUID: {}", id))]
    MissingStudent { id: Uuid },
    #[snafu(display("Unable to parse uuid {:?}", original))]
    ParseUuid {
        source: uuid::Error,
        original: String,
    },
    #[snafu(display("Malformed request body"))]
    MalformedBody { source: JsonRejection },
    #[snafu(display("Malformed query string"))]
    MalformedQuery { source: QueryRejection },
}

impl RegistrarError {
    #[allow(clippy::match_same_arms)]
    pub fn status_code(&self) -> StatusCode {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::OpenDatabase { .. } | Self::MigrateError { .. } => ISE,
            Self::MakeQuery { source } => match source {
                sqlx::Error::RowNotFound => NF,
                _ => ISE,
            },
            Self::InvalidDate { .. } | Self::InvalidStoredStudent { .. } => ISE,
            Self::BadEnvVar { .. } | Self::ParsePort { .. } | Self::UnknownStore { .. } => ISE,
            Self::InvalidCorsOrigin { .. } => ISE,
            Self::InvalidTimezone { .. } | Self::InvalidLocale { .. } => ISE,
            Self::InvalidHourCycle { .. } | Self::InvalidCalendarAlgorithm { .. } => ISE,
            Self::BadDateTimeFormatter { .. } | Self::ZoneDate { .. } => ISE,
            Self::Validation { .. } => BI,
            Self::DuplicateEmail { .. } => BI,
            Self::MissingStudent { .. } => NF,
            Self::ParseUuid { .. } => BI,
            Self::MalformedBody { .. } | Self::MalformedQuery { .. } => BI,
        }
    }

    /// Errors the person filling in the form can fix, keyed by field.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            Self::Validation { errors } => Some(errors.clone()),
            Self::DuplicateEmail { .. } => Some(FieldErrors::single(
                StudentField::Email,
                "Email is already registered",
            )),
            _ => None,
        }
    }

    /// What is safe to show outside the server.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Validation failed".to_string(),
            Self::DuplicateEmail { .. } => "A student with this email already exists".to_string(),
            Self::MissingStudent { .. } => "Student not found".to_string(),
            Self::ParseUuid { .. } => "Invalid student id".to_string(),
            Self::MalformedBody { source } => source.body_text(),
            Self::MalformedQuery { .. } => "Invalid student id".to_string(),
            _ => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for RegistrarError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = if status_code.is_server_error() {
            error!(?self, "Error!");
            json!({
                "success": false,
                "message": self.public_message(),
                "error": self.to_string(),
            })
        } else if let Some(errors) = self.field_errors() {
            json!({
                "success": false,
                "message": self.public_message(),
                "errors": errors,
            })
        } else {
            json!({
                "success": false,
                "message": self.public_message(),
            })
        };

        (status_code, Json(body)).into_response()
    }
}

pub fn alert(desc: impl AsRef<str>) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4" role="alert" {
            strong class="font-bold" {"Error: "}
            span {(desc.as_ref())}
        }
    }
}

/// The same errors, rendered for htmx fragments instead of JSON clients.
#[derive(Debug)]
pub struct HtmlError {
    context: &'static str,
    error: RegistrarError,
}

pub type HtmlResult<T> = Result<T, HtmlError>;

impl HtmlError {
    pub const fn new(context: &'static str, error: RegistrarError) -> Self {
        Self { context, error }
    }
}

impl From<RegistrarError> for HtmlError {
    fn from(error: RegistrarError) -> Self {
        Self::new("Request failed", error)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        let Self { context, error } = self;
        let status_code = error.status_code();

        if status_code.is_server_error() {
            error!(?error, context, "Error!");
        } else {
            warn!(?error, context, "Rejected request");
        }

        (
            status_code,
            alert(format!("{context}: {}", error.public_message())),
        )
            .into_response()
    }
}
