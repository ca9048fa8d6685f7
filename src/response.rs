use axum::{Json, http::StatusCode};

use crate::models::Kind;

/// Confirmation returned by write endpoints: a status code and a
/// human-readable JSON string naming the entity.
pub type Confirmation = (StatusCode, Json<String>);

pub fn created(kind: Kind, id: i32) -> Confirmation {
    (StatusCode::CREATED, Json(format!("{kind} with id = {id} created successfully!")))
}

pub fn updated(kind: Kind, id: i32) -> Confirmation {
    (StatusCode::NO_CONTENT, Json(format!("{kind} with id = {id} updated successfully!")))
}

pub fn deleted(kind: Kind, id: i32) -> Confirmation {
    (StatusCode::NO_CONTENT, Json(format!("{kind} with id = {id} deleted successfully!")))
}
