use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    AppState,
    entities::movie,
    error::{AppError, AppResult},
    models::{Kind, MovieChange, MoviePayload, MovieView, parse_payload},
    query::MovieQuery,
    response::{self, Confirmation},
    routes::JsonBody,
    store::Store,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/movies/", get(list).post(create)).route(
        "/movies/{id}",
        get(get_one).put(replace).patch(partial_update).delete(delete_one),
    )
}

async fn existing(store: &Store, id: i32) -> AppResult<movie::Model> {
    store.get_movie(id).await?.ok_or(AppError::not_found(Kind::Movie, id))
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<MovieView>>> {
    let Query(query) = query?;
    let Some(filter) = query.to_filter() else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store.list_movies(&filter).await?))
}

pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Json<MovieView>> {
    let movie = state.store.movie_view(id).await?.ok_or(AppError::not_found(Kind::Movie, id))?;
    Ok(Json(movie))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    let Json(body) = body?;
    let payload: MoviePayload = parse_payload(body)?;
    let id = state.store.insert_movie(payload).await?;
    Ok(response::created(Kind::Movie, id))
}

pub async fn replace(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    existing(&state.store, id).await?;
    let Json(body) = body?;
    let payload: MoviePayload = parse_payload(body)?;

    let mut changes = <movie::ActiveModel as Default>::default();
    payload.write_into(&mut changes);
    state.store.update_movie(id, changes).await?;

    Ok(response::updated(Kind::Movie, id))
}

pub async fn partial_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    body: JsonBody,
) -> AppResult<Confirmation> {
    existing(&state.store, id).await?;
    let Json(body) = body?;

    if let Some(change) = MovieChange::from_patch(body)? {
        let mut changes = <movie::ActiveModel as Default>::default();
        change.write_into(&mut changes);
        state.store.update_movie(id, changes).await?;
    }

    Ok(response::updated(Kind::Movie, id))
}

pub async fn delete_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> AppResult<Confirmation> {
    existing(&state.store, id).await?;
    state.store.delete_movie(id).await?;
    Ok(response::deleted(Kind::Movie, id))
}
