//! The scoring engine: vote bookkeeping, the eviction policy, Top-N
//! ranking and the score-weighted random pick. All state lives behind
//! the [`Db`] collaborator; every function here is independently
//! reproducible given the storage snapshot at call time.

use crate::db::SafeDb;
use crate::errors::BackendError;
use crate::recommendation::{NewRecommendation, Recommendation};

/// Fraction of random draws that prefer positively-scored recommendations.
const POSITIVE_POOL_BIAS: f64 = 0.7;

/// Scores strictly below this are evicted on downvote.
const EVICTION_FLOOR: i32 = -5;

/// Admits a new recommendation with a zero score, enforcing name
/// uniqueness. On conflict nothing is written.
pub async fn insert(
    db: SafeDb,
    submission: NewRecommendation,
) -> Result<Recommendation, BackendError> {
    if db.find_by_name(&submission.name).await?.is_some() {
        return Err(BackendError::NameAlreadyExists);
    }

    db.create(&submission).await
}

/// Raises the score of the given recommendation by one, returning the
/// new score.
pub async fn upvote(db: SafeDb, id: i32) -> Result<i32, BackendError> {
    db.update_score(id, 1)
        .await?
        .ok_or(BackendError::NonExistentId(id))
}

/// Lowers the score of the given recommendation by one, returning the
/// new score. A recommendation driven below the eviction floor is
/// deleted; the check runs against the score this request itself
/// persisted, not a re-read.
pub async fn downvote(db: SafeDb, id: i32) -> Result<i32, BackendError> {
    let score = db
        .update_score(id, -1)
        .await?
        .ok_or(BackendError::NonExistentId(id))?;

    if score < EVICTION_FLOOR {
        db.remove(id).await?;
    }

    Ok(score)
}

pub async fn list(db: SafeDb) -> Result<Vec<Recommendation>, BackendError> {
    db.find_all().await
}

pub async fn get_by_id(db: SafeDb, id: i32) -> Result<Recommendation, BackendError> {
    db.find_by_id(id)
        .await?
        .ok_or(BackendError::NonExistentId(id))
}

/// Returns up to `amount` recommendations, highest score first.
pub async fn top(db: SafeDb, amount: u32) -> Result<Vec<Recommendation>, BackendError> {
    db.find_top_by_score(i64::from(amount)).await
}

/// Picks one recommendation at random. `draw` chooses the score pool
/// (see [`ScoreFilter`]) and `pick` the element within it; both are
/// uniform draws from [0, 1), injected by the caller so the selection
/// itself stays deterministic. An empty pool falls back to the whole
/// catalog: the pick never fails while any recommendation exists.
pub async fn random(db: SafeDb, draw: f64, pick: f64) -> Result<Recommendation, BackendError> {
    let all = db.find_all().await?;

    if all.is_empty() {
        return Err(BackendError::NoRecommendations);
    }

    let filter = ScoreFilter::for_draw(draw);
    let pool: Vec<&Recommendation> = all.iter().filter(|r| filter.matches(r.score)).collect();
    let pool = if pool.is_empty() {
        all.iter().collect()
    } else {
        pool
    };

    let index = ((pick * pool.len() as f64) as usize).min(pool.len() - 1);

    Ok(pool[index].clone())
}

/// The score predicate chosen from a uniform random draw: draws below
/// [`POSITIVE_POOL_BIAS`] target positively-scored recommendations,
/// the rest target the zero-and-below pool. Keeping unpopular items in
/// rotation lets them be voted down further and eventually evicted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScoreFilter {
    Positive,
    NonPositive,
}

impl ScoreFilter {
    pub fn for_draw(draw: f64) -> Self {
        if draw < POSITIVE_POOL_BIAS {
            ScoreFilter::Positive
        } else {
            ScoreFilter::NonPositive
        }
    }

    pub fn matches(self, score: i32) -> bool {
        match self {
            ScoreFilter::Positive => score > 0,
            ScoreFilter::NonPositive => score <= 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::db::mock::MockDb;

    fn submission(name: &str) -> NewRecommendation {
        NewRecommendation {
            name: name.to_owned(),
            link: "https://www.youtube.com/watch?v=EiVWPgroGso".to_owned(),
        }
    }

    #[tokio::test]
    async fn insert_creates_with_zero_score() {
        let db = Arc::new(MockDb::new());

        let created = insert(db.clone(), submission("Falamansa - Xote dos Milagres"))
            .await
            .expect("insert recommendation");

        assert_eq!(created.score, 0);
        assert_eq!(
            get_by_id(db, created.id).await.expect("find created").name,
            "Falamansa - Xote dos Milagres"
        );
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_names() {
        let db = Arc::new(MockDb::with_rows(&[("Duplicada", 10)]));

        let error = insert(db.clone(), submission("Duplicada"))
            .await
            .expect_err("duplicate insert must fail");

        assert!(matches!(error, BackendError::NameAlreadyExists));
        assert_eq!(error.to_string(), "Recommendations names must be unique");
        assert_eq!(list(db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upvote_adds_one() {
        let db = Arc::new(MockDb::with_rows(&[("Alta", 11)]));

        let score = upvote(db, 1).await.expect("upvote");

        assert_eq!(score, 12);
    }

    #[tokio::test]
    async fn upvote_rejects_unknown_ids() {
        let db = Arc::new(MockDb::new());

        let error = upvote(db, 1).await.expect_err("upvote must fail");

        assert!(matches!(error, BackendError::NonExistentId(1)));
    }

    #[tokio::test]
    async fn downvote_subtracts_one() {
        let db = Arc::new(MockDb::with_rows(&[("Baixa", 5)]));

        let score = downvote(db.clone(), 1).await.expect("downvote");

        assert_eq!(score, 4);
        assert_eq!(get_by_id(db, 1).await.expect("still present").score, 4);
    }

    #[tokio::test]
    async fn downvote_rejects_unknown_ids() {
        let db = Arc::new(MockDb::new());

        let error = downvote(db, 1).await.expect_err("downvote must fail");

        assert!(matches!(error, BackendError::NonExistentId(1)));
    }

    #[tokio::test]
    async fn downvote_keeps_recommendations_at_the_floor() {
        let db = Arc::new(MockDb::with_rows(&[("No limite", -4)]));

        let score = downvote(db.clone(), 1).await.expect("downvote");

        assert_eq!(score, -5);
        assert!(get_by_id(db, 1).await.is_ok());
    }

    #[tokio::test]
    async fn downvote_evicts_below_the_floor() {
        let db = Arc::new(MockDb::with_rows(&[("Impopular", -5)]));

        let score = downvote(db.clone(), 1).await.expect("downvote");

        assert_eq!(score, -6);
        assert!(matches!(
            get_by_id(db, 1).await,
            Err(BackendError::NonExistentId(1))
        ));
    }

    #[tokio::test]
    async fn top_orders_by_score_and_truncates() {
        let db = Arc::new(MockDb::with_rows(&[
            ("Terceira", 8),
            ("Primeira", 10),
            ("Segunda", 9),
        ]));

        let two = top(db.clone(), 2).await.expect("top 2");
        assert_eq!(
            two.iter().map(|r| r.score).collect::<Vec<_>>(),
            vec![10, 9]
        );

        let five = top(db, 5).await.expect("top 5");
        assert_eq!(
            five.iter().map(|r| r.score).collect::<Vec<_>>(),
            vec![10, 9, 8]
        );
    }

    #[tokio::test]
    async fn random_prefers_the_positive_pool() {
        let db = Arc::new(MockDb::with_rows(&[("Boa", 5), ("Ruim", -1)]));

        let positive = random(db.clone(), 0.3, 0.0).await.expect("positive draw");
        assert_eq!(positive.name, "Boa");

        let non_positive = random(db, 0.9, 0.0).await.expect("non-positive draw");
        assert_eq!(non_positive.name, "Ruim");
    }

    #[tokio::test]
    async fn random_falls_back_when_the_pool_is_empty() {
        let db = Arc::new(MockDb::with_rows(&[("Ruim", -1), ("Pior", -3)]));

        // the draw targets the positive pool, which has no members
        let picked = random(db, 0.1, 0.99).await.expect("fallback pick");

        assert_eq!(picked.name, "Pior");
    }

    #[tokio::test]
    async fn random_fails_on_an_empty_catalog() {
        let db = Arc::new(MockDb::new());

        let error = random(db, 0.3, 0.5).await.expect_err("random must fail");

        assert!(matches!(error, BackendError::NoRecommendations));
    }

    #[test]
    fn score_filter_boundaries() {
        assert_eq!(ScoreFilter::for_draw(0.0), ScoreFilter::Positive);
        assert_eq!(ScoreFilter::for_draw(0.699), ScoreFilter::Positive);
        assert_eq!(ScoreFilter::for_draw(0.7), ScoreFilter::NonPositive);
        assert_eq!(ScoreFilter::for_draw(0.999), ScoreFilter::NonPositive);

        assert!(ScoreFilter::Positive.matches(1));
        assert!(!ScoreFilter::Positive.matches(0));
        assert!(ScoreFilter::NonPositive.matches(0));
        assert!(ScoreFilter::NonPositive.matches(-6));
        assert!(!ScoreFilter::NonPositive.matches(1));
    }

    proptest! {
        #[test]
        fn score_filter_splits_every_draw(draw in 0.0f64..1.0) {
            let filter = ScoreFilter::for_draw(draw);

            prop_assert_eq!(filter == ScoreFilter::Positive, draw < 0.7);
        }

        #[test]
        fn score_filter_pools_are_disjoint_and_total(score in i32::MIN..i32::MAX) {
            prop_assert_ne!(
                ScoreFilter::Positive.matches(score),
                ScoreFilter::NonPositive.matches(score)
            );
        }
    }
}
