use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};

use crate::{
    entities::{director, genre, movie},
    error::AppResult,
    models::{MoviePayload, MovieView},
    query::{self, MovieFilter},
};

/// Repository over the catalogue tables. Lookups of unknown ids return
/// `None`; updates and deletes of unknown ids affect no rows.
#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_movies(&self, filter: &MovieFilter) -> AppResult<Vec<MovieView>> {
        Ok(query::movie_listing(filter).all(&self.db).await?)
    }

    pub async fn movie_view(&self, id: i32) -> AppResult<Option<MovieView>> {
        Ok(query::movie_by_id(id).one(&self.db).await?)
    }

    pub async fn get_movie(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn insert_movie(&self, payload: MoviePayload) -> AppResult<i32> {
        let mut model = <movie::ActiveModel as Default>::default();
        payload.write_into(&mut model);

        let txn = self.db.begin().await?;
        let res = movie::Entity::insert(model).exec(&txn).await?;
        txn.commit().await?;

        tracing::debug!(id = res.last_insert_id, "movie inserted");
        Ok(res.last_insert_id)
    }

    /// Writes the columns set on `changes` to the movie `id`.
    pub async fn update_movie(&self, id: i32, changes: movie::ActiveModel) -> AppResult<()> {
        if !changes.is_changed() {
            return Ok(());
        }
        let res = movie::Entity::update_many()
            .set(changes)
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        tracing::debug!(id, rows = res.rows_affected, "movie updated");
        Ok(())
    }

    pub async fn delete_movie(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::debug!(id, rows = res.rows_affected, "movie deleted");
        Ok(())
    }

    pub async fn list_directors(&self) -> AppResult<Vec<director::Model>> {
        Ok(director::Entity::find().order_by_asc(director::Column::Id).all(&self.db).await?)
    }

    pub async fn get_director(&self, id: i32) -> AppResult<Option<director::Model>> {
        Ok(director::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn insert_director(&self, name: String) -> AppResult<i32> {
        let model = director::ActiveModel { name: Set(name), ..Default::default() };

        let txn = self.db.begin().await?;
        let res = director::Entity::insert(model).exec(&txn).await?;
        txn.commit().await?;

        tracing::debug!(id = res.last_insert_id, "director inserted");
        Ok(res.last_insert_id)
    }

    pub async fn rename_director(&self, id: i32, name: String) -> AppResult<()> {
        let res = director::Entity::update_many()
            .col_expr(director::Column::Name, Expr::value(name))
            .filter(director::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        tracing::debug!(id, rows = res.rows_affected, "director updated");
        Ok(())
    }

    pub async fn delete_director(&self, id: i32) -> AppResult<()> {
        let res = director::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::debug!(id, rows = res.rows_affected, "director deleted");
        Ok(())
    }

    pub async fn count_movies_by_director(&self, id: i32) -> AppResult<u64> {
        Ok(movie::Entity::find()
            .filter(movie::Column::DirectorId.eq(id))
            .count(&self.db)
            .await?)
    }

    pub async fn list_genres(&self) -> AppResult<Vec<genre::Model>> {
        Ok(genre::Entity::find().order_by_asc(genre::Column::Id).all(&self.db).await?)
    }

    pub async fn get_genre(&self, id: i32) -> AppResult<Option<genre::Model>> {
        Ok(genre::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn insert_genre(&self, name: String) -> AppResult<i32> {
        let model = genre::ActiveModel { name: Set(name), ..Default::default() };

        let txn = self.db.begin().await?;
        let res = genre::Entity::insert(model).exec(&txn).await?;
        txn.commit().await?;

        tracing::debug!(id = res.last_insert_id, "genre inserted");
        Ok(res.last_insert_id)
    }

    pub async fn rename_genre(&self, id: i32, name: String) -> AppResult<()> {
        let res = genre::Entity::update_many()
            .col_expr(genre::Column::Name, Expr::value(name))
            .filter(genre::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        tracing::debug!(id, rows = res.rows_affected, "genre updated");
        Ok(())
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        let res = genre::Entity::delete_by_id(id).exec(&self.db).await?;
        tracing::debug!(id, rows = res.rows_affected, "genre deleted");
        Ok(())
    }

    pub async fn count_movies_by_genre(&self, id: i32) -> AppResult<u64> {
        Ok(movie::Entity::find().filter(movie::Column::GenreId.eq(id)).count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::testing::memory_store, error::AppError, models::MovieChange};

    fn payload(title: &str, genre_id: i32, director_id: i32) -> MoviePayload {
        MoviePayload {
            title: title.to_string(),
            description: format!("{title} description"),
            trailer: format!("https://trailers.example/{title}"),
            year: 2010,
            rating: 7.5,
            genre_id,
            director_id,
        }
    }

    struct Seed {
        store: Store,
        nolan: i32,
        mann: i32,
        drama: i32,
        thriller: i32,
    }

    async fn seeded() -> Seed {
        let store = memory_store().await;
        let nolan = store.insert_director("Nolan".into()).await.unwrap();
        let mann = store.insert_director("Mann".into()).await.unwrap();
        let drama = store.insert_genre("Drama".into()).await.unwrap();
        let thriller = store.insert_genre("Thriller".into()).await.unwrap();

        store.insert_movie(payload("Inception", thriller, nolan)).await.unwrap();
        store.insert_movie(payload("Memento", drama, nolan)).await.unwrap();
        store.insert_movie(payload("Heat", thriller, mann)).await.unwrap();

        Seed { store, nolan, mann, drama, thriller }
    }

    fn titles(rows: &[MovieView]) -> Vec<&str> {
        rows.iter().map(|m| m.title.as_str()).collect()
    }

    #[tokio::test]
    async fn unknown_ids_read_as_none() {
        let store = memory_store().await;
        assert!(store.get_movie(1).await.unwrap().is_none());
        assert!(store.movie_view(1).await.unwrap().is_none());
        assert!(store.get_director(1).await.unwrap().is_none());
        assert!(store.get_genre(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inserts_assign_fresh_ids() {
        let store = memory_store().await;
        let first = store.insert_genre("Drama".into()).await.unwrap();
        let second = store.insert_genre("Drama".into()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn listing_without_filters_returns_everything() {
        let seed = seeded().await;
        let rows = seed.store.list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(titles(&rows), ["Inception", "Memento", "Heat"]);
        assert_eq!(rows[0].genre, "Thriller");
        assert_eq!(rows[0].director, "Nolan");
    }

    #[tokio::test]
    async fn listing_filters_by_director_and_genre() {
        let seed = seeded().await;

        let by_director = MovieFilter { director_id: Some(seed.nolan), genre_id: None };
        let rows = seed.store.list_movies(&by_director).await.unwrap();
        assert_eq!(titles(&rows), ["Inception", "Memento"]);

        let both = MovieFilter { director_id: Some(seed.nolan), genre_id: Some(seed.thriller) };
        let rows = seed.store.list_movies(&both).await.unwrap();
        assert_eq!(titles(&rows), ["Inception"]);

        let none = MovieFilter { director_id: Some(seed.mann), genre_id: Some(seed.drama) };
        assert!(seed.store.list_movies(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_ids_are_noops() {
        let seed = seeded().await;

        let mut changes = <movie::ActiveModel as Default>::default();
        MovieChange::Rating(1.0).write_into(&mut changes);
        seed.store.update_movie(999, changes).await.unwrap();
        seed.store.delete_movie(999).await.unwrap();
        seed.store.rename_genre(999, "Noir".into()).await.unwrap();
        seed.store.delete_director(999).await.unwrap();

        let rows = seed.store.list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|m| m.rating == 7.5));
    }

    #[tokio::test]
    async fn update_writes_only_changed_columns() {
        let seed = seeded().await;
        let before = seed.store.get_movie(1).await.unwrap().unwrap();

        let mut changes = <movie::ActiveModel as Default>::default();
        MovieChange::Year(2001).write_into(&mut changes);
        seed.store.update_movie(1, changes).await.unwrap();
        let untouched = <movie::ActiveModel as Default>::default();
        seed.store.update_movie(1, untouched).await.unwrap();

        let after = seed.store.get_movie(1).await.unwrap().unwrap();
        assert_eq!(after.year, 2001);
        assert_eq!(movie::Model { year: 2001, ..before }, after);
    }

    #[tokio::test]
    async fn dangling_foreign_key_is_rejected() {
        let store = memory_store().await;
        let err = store.insert_movie(payload("Orphan", 41, 42)).await.unwrap_err();
        assert!(matches!(err, AppError::Db(_)), "{err:?}");
        assert!(store.list_movies(&MovieFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn referenced_genre_cannot_be_removed() {
        let seed = seeded().await;
        assert_eq!(seed.store.count_movies_by_genre(seed.thriller).await.unwrap(), 2);
        assert_eq!(seed.store.count_movies_by_director(seed.mann).await.unwrap(), 1);

        let err = seed.store.delete_genre(seed.thriller).await.unwrap_err();
        assert!(matches!(err, AppError::Db(_)), "{err:?}");
        assert!(seed.store.get_genre(seed.thriller).await.unwrap().is_some());
    }
}
