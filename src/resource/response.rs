//! Transport response wrapper.
//!
//! Successful operations return the projected JSON directly (a bare object
//! for single records, a bare array for listings) — the shape Backbone.js
//! models and collections parse without a custom `parse` hook.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

/// A completed resource operation: status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse {
    status: StatusCode,
    body: Value,
}

impl ResourceResponse {
    /// 200 with the given JSON body.
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
