use std::collections::HashMap;
use std::sync::RwLock;

use futures::future::BoxFuture;
use futures::FutureExt;
use url::Url;

use crate::db::Db;
use crate::errors::BackendError;
use crate::recommendation::{NewRecommendation, Recommendation};

/// An in-memory stand-in for the database, implementing the same
/// contract as `PgDb` (including result ordering and the unique
/// constraint on names).
#[derive(Default)]
pub(crate) struct MockDb {
    rows: RwLock<HashMap<i32, Recommendation>>,
    next_id: RwLock<i32>,
}

impl MockDb {
    pub fn new() -> Self {
        MockDb {
            next_id: RwLock::new(1),
            ..Default::default()
        }
    }

    /// Seeds the mock with `(name, score)` pairs, assigning sequential IDs.
    pub fn with_rows(rows: &[(&str, i32)]) -> Self {
        let db = MockDb::new();

        for (name, score) in rows {
            let id = db.take_id();

            db.rows.write().unwrap().insert(
                id,
                Recommendation::new(
                    id,
                    (*name).to_owned(),
                    Url::parse("https://www.youtube.com/watch?v=EiVWPgroGso").unwrap(),
                    *score,
                ),
            );
        }

        db
    }

    fn take_id(&self) -> i32 {
        let mut next_id = self.next_id.write().unwrap();
        let id = *next_id;
        *next_id += 1;

        id
    }

    fn sorted(&self) -> Vec<Recommendation> {
        let mut rows: Vec<Recommendation> = self.rows.read().unwrap().values().cloned().collect();
        rows.sort_by_key(|r| r.id);

        rows
    }
}

impl Db for MockDb {
    fn create(
        &self,
        submission: &NewRecommendation,
    ) -> BoxFuture<Result<Recommendation, BackendError>> {
        let submission = submission.clone();

        async move {
            let mut rows = self.rows.write().unwrap();

            if rows.values().any(|r| r.name == submission.name) {
                return Err(BackendError::NameAlreadyExists);
            }

            let id = self.take_id();
            let link = Url::parse(&submission.link)
                .map_err(|_| BackendError::InvalidLink(submission.link.clone()))?;
            let recommendation = Recommendation::new(id, submission.name, link, 0);
            rows.insert(id, recommendation.clone());

            Ok(recommendation)
        }
        .boxed()
    }

    fn find_all(&self) -> BoxFuture<Result<Vec<Recommendation>, BackendError>> {
        async move { Ok(self.sorted()) }.boxed()
    }

    fn find_by_id(&self, id: i32) -> BoxFuture<Result<Option<Recommendation>, BackendError>> {
        async move { Ok(self.rows.read().unwrap().get(&id).cloned()) }.boxed()
    }

    fn find_by_name(
        &self,
        name: &str,
    ) -> BoxFuture<Result<Option<Recommendation>, BackendError>> {
        let name = name.to_owned();

        async move {
            Ok(self
                .rows
                .read()
                .unwrap()
                .values()
                .find(|r| r.name == name)
                .cloned())
        }
        .boxed()
    }

    fn find_top_by_score(
        &self,
        amount: i64,
    ) -> BoxFuture<Result<Vec<Recommendation>, BackendError>> {
        async move {
            let mut rows = self.sorted();
            rows.sort_by(|a, b| b.score.cmp(&a.score));
            rows.truncate(amount as usize);

            Ok(rows)
        }
        .boxed()
    }

    fn remove(&self, id: i32) -> BoxFuture<Result<(), BackendError>> {
        async move {
            self.rows
                .write()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(BackendError::NonExistentId(id))
        }
        .boxed()
    }

    fn truncate(&self) -> BoxFuture<Result<(), BackendError>> {
        async move {
            self.rows.write().unwrap().clear();

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
            let mut rows = self.rows.write().unwrap();

            Ok(rows.get_mut(&id).map(|r| {
                r.score += delta;
                r.score
            }))
        }
        .boxed()
    }
}
