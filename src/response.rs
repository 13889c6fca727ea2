//! Success response helpers. Records are returned bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn message(message: &'static str) -> (StatusCode, Json<MessageBody>) {
    (StatusCode::OK, Json(MessageBody { message }))
}
