use log::error;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{DbError, ErrorKind};
use crate::model::Page;
use crate::validate::ValidationReport;

/// Outcome label carried in every structured response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Success,
    Empty,
    NotFound,
    BadRequest,
    Conflict,
    ServerError,
}

impl ApiStatus {
    pub fn status_code(self) -> u16 {
        match self {
            ApiStatus::Success | ApiStatus::Empty => 200,
            ApiStatus::NotFound => 404,
            ApiStatus::BadRequest => 400,
            ApiStatus::Conflict => 409,
            ApiStatus::ServerError => 500,
        }
    }
}

/// Structured payload handed to whatever transport terminates the request.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_id: Option<String>,
}

impl ApiResponse {
    fn bare(status: ApiStatus) -> Self {
        ApiResponse {
            status,
            status_code: status.status_code(),
            data: None,
            total_pages: None,
            error: None,
            error_id: None,
        }
    }

    pub fn success(data: Value) -> Self {
        ApiResponse {
            data: Some(data),
            ..Self::bare(ApiStatus::Success)
        }
    }

    /// A listing result: the page's rows plus the total page count.
    pub fn success_page(page: Page) -> Self {
        if page.rows.is_empty() {
            return Self::empty();
        }
        ApiResponse {
            data: Some(Value::Array(page.rows)),
            total_pages: Some(page.pages),
            ..Self::bare(ApiStatus::Success)
        }
    }

    pub fn empty() -> Self {
        Self::bare(ApiStatus::Empty)
    }

    pub fn not_found() -> Self {
        Self::bare(ApiStatus::NotFound)
    }

    pub fn bad_request(report: ValidationReport) -> Self {
        ApiResponse {
            error: Some(report),
            ..Self::bare(ApiStatus::BadRequest)
        }
    }

    /// Maps an engine failure by its classified kind: unique violations are
    /// conflicts, foreign-key blocks are bad requests, everything else
    /// becomes a server error logged under a fresh correlation id.
    pub fn from_db_error(err: &DbError) -> Self {
        match err.kind() {
            ErrorKind::UniqueViolation => Self::bare(ApiStatus::Conflict),
            ErrorKind::ForeignKeyViolation => Self::bare(ApiStatus::BadRequest),
            ErrorKind::Other => {
                let error_id = Uuid::new_v4().to_string();
                error!("{} | {}", error_id, err);
                ApiResponse {
                    error_id: Some(error_id),
                    ..Self::bare(ApiStatus::ServerError)
                }
            }
        }
    }
}
