use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::Kind;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{kind} with id = {id} not found!")]
    NotFound { kind: Kind, id: i32 },

    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("{kind} with id = {id} is still referenced by {movies} movie(s)")]
    Referenced { kind: Kind, id: i32, movies: u64 },

    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl AppError {
    pub fn not_found(kind: Kind, id: i32) -> Self {
        Self::NotFound { kind, id }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Referenced { .. } => StatusCode::CONFLICT,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Db(err) => {
                tracing::error!(error = %err, "database error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(message)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
