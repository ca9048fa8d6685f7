use std::sync::Arc;

use axum::{Json, Router, extract::rejection::JsonRejection};
use serde_json::Value;

use crate::AppState;

pub mod directors;
pub mod genres;
pub mod movies;

/// Request body whose parse failure is reported by the handler, after the
/// target row has been looked up.
pub type JsonBody = Result<Json<Value>, JsonRejection>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(movies::routes())
        .merge(directors::routes())
        .merge(genres::routes())
        .with_state(state)
}
