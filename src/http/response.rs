//! Response construction.
//!
//! Plain-text bodies for every locally generated status, JSON for upstream
//! payloads passed through.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

pub const NOT_FOUND: &str = "Not Found";
pub const TODO_NOT_FOUND: &str = "Todo Not Found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// `text/plain` response with a fixed body.
pub fn text(status: StatusCode, body: &'static str) -> Response {
    (status, body).into_response()
}

/// `application/json` 200 response.
pub fn json<T: Serialize>(value: T) -> Response {
    Json(value).into_response()
}

pub fn not_found() -> Response {
    text(StatusCode::NOT_FOUND, NOT_FOUND)
}

pub fn todo_not_found() -> Response {
    text(StatusCode::NOT_FOUND, TODO_NOT_FOUND)
}

pub fn internal_error() -> Response {
    text(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}
