use std::fmt;

use sea_orm::{ActiveValue::Set, FromQueryResult};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    entities::{director, genre, movie},
    error::{AppError, AppResult},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Movie,
    Director,
    Genre,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Kind::Movie => "Movie",
            Kind::Director => "Director",
            Kind::Genre => "Genre",
        };
        f.write_str(label)
    }
}

/// Wire shape of a movie: the stored columns plus the joined genre and
/// director names in place of their ids.
#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct MovieView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub trailer: String,
    pub year: i32,
    pub rating: f64,
    pub genre: String,
    pub director: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DirectorView {
    pub id: i32,
    pub name: String,
}

impl From<director::Model> for DirectorView {
    fn from(model: director::Model) -> Self {
        Self { id: model.id, name: model.name }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GenreView {
    pub id: i32,
    pub name: String,
}

impl From<genre::Model> for GenreView {
    fn from(model: genre::Model) -> Self {
        Self { id: model.id, name: model.name }
    }
}

/// Every writable movie field; used by create and full replace.
#[derive(Clone, Debug, Deserialize)]
pub struct MoviePayload {
    pub title: String,
    pub description: String,
    pub trailer: String,
    pub year: i32,
    pub rating: f64,
    pub genre_id: i32,
    pub director_id: i32,
}

impl MoviePayload {
    /// Writes every field into `model`, leaving the primary key alone.
    pub fn write_into(self, model: &mut movie::ActiveModel) {
        model.title = Set(self.title);
        model.description = Set(self.description);
        model.trailer = Set(self.trailer);
        model.year = Set(self.year);
        model.rating = Set(self.rating);
        model.genre_id = Set(self.genre_id);
        model.director_id = Set(self.director_id);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MovieChange {
    Title(String),
    Description(String),
    Trailer(String),
    Year(i32),
    Rating(f64),
    GenreId(i32),
    DirectorId(i32),
}

type ParseChange = fn(Value) -> serde_json::Result<MovieChange>;

/// Keys a movie patch recognizes, highest priority first.
const PATCH_FIELDS: [(&str, ParseChange); 7] = [
    ("title", |v| serde_json::from_value(v).map(MovieChange::Title)),
    ("description", |v| serde_json::from_value(v).map(MovieChange::Description)),
    ("trailer", |v| serde_json::from_value(v).map(MovieChange::Trailer)),
    ("year", |v| serde_json::from_value(v).map(MovieChange::Year)),
    ("rating", |v| serde_json::from_value(v).map(MovieChange::Rating)),
    ("genre_id", |v| serde_json::from_value(v).map(MovieChange::GenreId)),
    ("director_id", |v| serde_json::from_value(v).map(MovieChange::DirectorId)),
];

impl MovieChange {
    /// A patch applies a single field: the first recognized key present in
    /// the body wins and the rest of the payload is ignored. A present key
    /// must hold a value of the column's type; `null` is rejected rather
    /// than skipped.
    pub fn from_patch(body: Value) -> AppResult<Option<Self>> {
        let Value::Object(mut fields) = body else {
            return Err(AppError::Validation("body must be a JSON object".to_string()));
        };

        for (key, parse) in PATCH_FIELDS {
            if let Some(value) = fields.remove(key) {
                return parse(value)
                    .map(Some)
                    .map_err(|err| AppError::Validation(format!("{key}: {err}")));
            }
        }
        Ok(None)
    }

    pub fn write_into(self, model: &mut movie::ActiveModel) {
        match self {
            MovieChange::Title(v) => model.title = Set(v),
            MovieChange::Description(v) => model.description = Set(v),
            MovieChange::Trailer(v) => model.trailer = Set(v),
            MovieChange::Year(v) => model.year = Set(v),
            MovieChange::Rating(v) => model.rating = Set(v),
            MovieChange::GenreId(v) => model.genre_id = Set(v),
            MovieChange::DirectorId(v) => model.director_id = Set(v),
        }
    }
}

/// Body of director and genre writes.
#[derive(Clone, Debug, Deserialize)]
pub struct NamePayload {
    pub name: String,
}

/// Reads a request body into its schema. Missing or mistyped fields become
/// `AppError::Validation`.
pub fn parse_payload<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    Ok(serde_json::from_value(body)?)
}
