use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    RelationTrait, Selector, SelectModel,
};
use serde::Deserialize;

use crate::{
    entities::{director, genre, movie},
    models::MovieView,
};

/// Optional equality constraints on the movie listing. Both present means
/// both apply.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovieFilter {
    pub director_id: Option<i32>,
    pub genre_id: Option<i32>,
}

/// Raw listing query string. Values are kept as text so that a parameter
/// that is present but not an id (`?director_id=`) filters everything out
/// instead of failing the request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieQuery {
    pub director_id: Option<String>,
    pub genre_id: Option<String>,
}

impl MovieQuery {
    /// `None` when some parameter cannot match any row.
    pub fn to_filter(&self) -> Option<MovieFilter> {
        fn id(raw: &Option<String>) -> Option<Option<i32>> {
            match raw {
                None => Some(None),
                Some(raw) => raw.parse().ok().map(Some),
            }
        }

        Some(MovieFilter { director_id: id(&self.director_id)?, genre_id: id(&self.genre_id)? })
    }
}

fn joined() -> sea_orm::Select<movie::Entity> {
    movie::Entity::find()
        .select_only()
        .columns([
            movie::Column::Id,
            movie::Column::Title,
            movie::Column::Description,
            movie::Column::Trailer,
            movie::Column::Year,
            movie::Column::Rating,
        ])
        .column_as(genre::Column::Name, "genre")
        .column_as(director::Column::Name, "director")
        .join(JoinType::InnerJoin, movie::Relation::Genre.def())
        .join(JoinType::InnerJoin, movie::Relation::Director.def())
}

fn filtered(filter: &MovieFilter) -> sea_orm::Select<movie::Entity> {
    joined()
        .apply_if(filter.director_id, |q, id| q.filter(movie::Column::DirectorId.eq(id)))
        .apply_if(filter.genre_id, |q, id| q.filter(movie::Column::GenreId.eq(id)))
}

pub fn movie_listing(filter: &MovieFilter) -> Selector<SelectModel<MovieView>> {
    filtered(filter).order_by_asc(movie::Column::Id).into_model::<MovieView>()
}

pub fn movie_by_id(id: i32) -> Selector<SelectModel<MovieView>> {
    joined().filter(movie::Column::Id.eq(id)).into_model::<MovieView>()
}

#[cfg(test)]
mod tests {
    use sea_orm::DbBackend;

    use super::*;

    fn sql(filter: MovieFilter) -> String {
        filtered(&filter).build(DbBackend::Sqlite).to_string()
    }

    fn query(director_id: Option<&str>, genre_id: Option<&str>) -> MovieQuery {
        MovieQuery {
            director_id: director_id.map(str::to_string),
            genre_id: genre_id.map(str::to_string),
        }
    }

    #[test]
    fn query_string_parses_into_filter() {
        let filter = query(Some("3"), None).to_filter().unwrap();
        assert_eq!(filter.director_id, Some(3));
        assert_eq!(filter.genre_id, None);

        let filter = query(None, None).to_filter().unwrap();
        assert!(filter.director_id.is_none() && filter.genre_id.is_none());
    }

    #[test]
    fn non_numeric_parameter_matches_nothing() {
        assert!(query(Some(""), None).to_filter().is_none());
        assert!(query(Some("2"), Some("drama")).to_filter().is_none());
    }

    #[test]
    fn unfiltered_listing_joins_both_labels() {
        let sql = sql(MovieFilter::default());
        assert!(sql.contains(r#""genre"."name" AS "genre""#), "{sql}");
        assert!(sql.contains(r#""director"."name" AS "director""#), "{sql}");
        assert!(sql.contains(r#"INNER JOIN "genre""#), "{sql}");
        assert!(!sql.contains("WHERE"), "{sql}");
    }

    #[test]
    fn single_filter_constrains_one_column() {
        let sql = sql(MovieFilter { genre_id: Some(7), ..Default::default() });
        assert!(sql.contains(r#"WHERE "movie"."genre_id" = 7"#), "{sql}");
        let (_, predicate) = sql.split_once("WHERE").unwrap();
        assert!(!predicate.contains("director_id"), "{sql}");
    }

    #[test]
    fn both_filters_are_combined_with_and() {
        let sql = sql(MovieFilter { director_id: Some(2), genre_id: Some(5) });
        assert!(sql.contains(r#""movie"."director_id" = 2 AND "movie"."genre_id" = 5"#), "{sql}");
    }
}
