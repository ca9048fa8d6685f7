use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{GenreView, Kind, NamePayload, parse_payload},
    response::{self, Confirmation},
    routes::JsonBody,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/genres/", get(list).post(create))
        .route("/genres/{id}", get(get_one).put(replace).delete(delete_one))
}

pub async fn list(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<GenreView>>> {
    let genres = state.store.list_genres().await?;
    Ok(Json(genres.into_iter().map(GenreView::from).collect()))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreView>> {
    let genre = state.store.get_genre(id).await?.ok_or(AppError::not_found(Kind::Genre, id))?;
    Ok(Json(genre.into()))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    let Json(body) = body?;
    let NamePayload { name } = parse_payload(body)?;
    let id = state.store.insert_genre(name).await?;
    Ok(response::created(Kind::Genre, id))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    if state.store.get_genre(id).await?.is_none() {
        return Err(AppError::not_found(Kind::Genre, id));
    }
    let Json(body) = body?;
    let NamePayload { name } = parse_payload(body)?;
    state.store.rename_genre(id, name).await?;
    Ok(response::updated(Kind::Genre, id))
}

pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Confirmation> {
    if state.store.get_genre(id).await?.is_none() {
        return Err(AppError::not_found(Kind::Genre, id));
    }

    let movies = state.store.count_movies_by_genre(id).await?;
    if movies > 0 {
        return Err(AppError::Referenced { kind: Kind::Genre, id, movies });
    }

    state.store.delete_genre(id).await?;
    Ok(response::deleted(Kind::Genre, id))
}
