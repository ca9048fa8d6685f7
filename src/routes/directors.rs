use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{DirectorView, Kind, NamePayload, parse_payload},
    response::{self, Confirmation},
    routes::JsonBody,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/directors/", get(list).post(create))
        .route("/directors/{id}", get(get_one).put(replace).delete(delete_one))
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<DirectorView>>> {
    let directors = state.store.list_directors().await?;
    Ok(Json(directors.into_iter().map(DirectorView::from).collect()))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<DirectorView>> {
    let director =
        state.store.get_director(id).await?.ok_or(AppError::not_found(Kind::Director, id))?;
    Ok(Json(director.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    let Json(body) = body?;
    let NamePayload { name } = parse_payload(body)?;
    let id = state.store.insert_director(name).await?;
    Ok(response::created(Kind::Director, id))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    if state.store.get_director(id).await?.is_none() {
        return Err(AppError::not_found(Kind::Director, id));
    }
    let Json(body) = body?;
    let NamePayload { name } = parse_payload(body)?;
    state.store.rename_director(id, name).await?;
    Ok(response::updated(Kind::Director, id))
}

/// Directors still credited on a movie are kept and answered with 409.
pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Confirmation> {
    if state.store.get_director(id).await?.is_none() {
        return Err(AppError::not_found(Kind::Director, id));
    }

    let movies = state.store.count_movies_by_director(id).await?;
    if movies > 0 {
        return Err(AppError::Referenced { kind: Kind::Director, id, movies });
    }

    state.store.delete_director(id).await?;
    Ok(response::deleted(Kind::Director, id))
}
