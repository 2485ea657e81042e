use axum::{extract::FromRequest, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;

/// `Json` extractor whose rejections are reported as [`AppError::Validation`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parse an id taken from the request path
pub fn parse_id(kind: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("Invalid {} id '{}': expected a UUID", kind, raw)))
}

/// Body returned by successful deletes
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: Uuid,
}

impl DeleteResponse {
    pub fn new(id: Uuid) -> Json<Self> {
        Json(Self { success: true, id })
    }
}
