use std::sync::Arc;

use futures::future::BoxFuture;

use crate::errors::BackendError;
use crate::recommendation::{NewRecommendation, Recommendation};

#[cfg(test)]
pub(crate) mod mock;

pub type SafeDb = Arc<dyn Db + Send + Sync>;

pub trait Db {
    /// Creates a new recommendation with a zero score.
    fn create(&self, submission: &NewRecommendation)
        -> BoxFuture<Result<Recommendation, BackendError>>;

    fn find_all(&self) -> BoxFuture<Result<Vec<Recommendation>, BackendError>>;

    fn find_by_id(&self, id: i32) -> BoxFuture<Result<Option<Recommendation>, BackendError>>;

    fn find_by_name(&self, name: &str)
        -> BoxFuture<Result<Option<Recommendation>, BackendError>>;

    /// Returns up to `amount` recommendations, highest score first.
    fn find_top_by_score(
        &self,
        amount: i64,
    ) -> BoxFuture<Result<Vec<Recommendation>, BackendError>>;

    fn remove(&self, id: i32) -> BoxFuture<Result<(), BackendError>>;

    fn truncate(&self) -> BoxFuture<Result<(), BackendError>>;

    /// Adds `delta` to the score of the given recommendation in a single
    /// statement, returning the score that statement persisted. `None`
    /// means no such recommendation exists.
    fn update_score(
        &self,
        id: i32,
        delta: i32,
    ) -> BoxFuture<Result<Option<i32>, BackendError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use url::Url;

    use crate::errors::BackendError;
    use crate::recommendation::{NewRecommendation, Recommendation};

    const RECOMMENDATIONS_NAME_CONSTRAINT: &str = "recommendations_name";

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn create(
            &self,
            submission: &NewRecommendation,
        ) -> BoxFuture<Result<Recommendation, BackendError>> {
            let submission = submission.clone();

            async move {
                let query = sqlx::query(include_str!("queries/create.sql"));

                let recommendation = query
                    .bind(&submission.name)
                    .bind(&submission.link)
                    .try_map(recommendation_from_row)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recommendation)
            }
            .boxed()
        }

        fn find_all(&self) -> BoxFuture<Result<Vec<Recommendation>, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_all.sql"));

                let recommendations = query
                    .try_map(recommendation_from_row)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recommendations)
            }
            .boxed()
        }

        fn find_by_id(&self, id: i32) -> BoxFuture<Result<Option<Recommendation>, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve.sql"));

                let recommendation = query
                    .bind(id)
                    .try_map(recommendation_from_row)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recommendation)
            }
            .boxed()
        }

        fn find_by_name(
            &self,
            name: &str,
        ) -> BoxFuture<Result<Option<Recommendation>, BackendError>> {
            let name = name.to_owned();

            async move {
                let query = sqlx::query(include_str!("queries/retrieve_by_name.sql"));

                let recommendation = query
                    .bind(name)
                    .try_map(recommendation_from_row)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recommendation)
            }
            .boxed()
        }

        fn find_top_by_score(
            &self,
            amount: i64,
        ) -> BoxFuture<Result<Vec<Recommendation>, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_top.sql"));

                let recommendations = query
                    .bind(amount)
                    .try_map(recommendation_from_row)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(recommendations)
            }
            .boxed()
        }

        fn remove(&self, id: i32) -> BoxFuture<Result<(), BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/delete.sql"));

                let count = query
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .rows_affected();

                if count == 0 {
                    Err(BackendError::NonExistentId(id))
                } else {
                    Ok(())
                }
            }
            .boxed()
        }

        fn truncate(&self) -> BoxFuture<Result<(), BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/truncate.sql"));

                query
                    .execute(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(())
            }
            .boxed()
        }

        fn update_score(
            &self,
            id: i32,
            delta: i32,
        ) -> BoxFuture<Result<Option<i32>, BackendError>> {
            async move {
                let query = sqlx::query_as::<_, (i32,)>(include_str!("queries/update_score.sql"));

                let score = query
                    .bind(id)
                    .bind(delta)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?
                    .map(|(score,)| score);

                Ok(score)
            }
            .boxed()
        }
    }

    fn recommendation_from_row(row: PgRow) -> Result<Recommendation, sqlx::Error> {
        let id: i32 = try_get(&row, "id")?;
        let name: String = try_get(&row, "name")?;
        let score: i32 = try_get(&row, "score")?;

        let link: String = try_get(&row, "link")?;
        let link: Url = Url::parse(&link).map_err(|source| {
            // links are validated on the way in, but just for completeness...
            sqlx::Error::Decode(Box::new(BackendError::UnableToParseUrl { url: link, source }))
        })?;

        Ok(Recommendation::new(id, name, link, score))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> BackendError {
        use sqlx::Error;

        match error {
            Error::Database(ref e) if e.constraint() == Some(RECOMMENDATIONS_NAME_CONSTRAINT) => {
                BackendError::NameAlreadyExists
            }
            _ => BackendError::Sqlx { source: error },
        }
    }
}
