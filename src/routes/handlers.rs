use std::time::{Duration, Instant};

use log::debug;
use rand::Rng;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::recommendation::NewRecommendation;
use crate::routes::{
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::{scoring, validation};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn insert(environment: Environment, submission: NewRecommendation) -> RouteResult {
    timed! {
        let name = submission.name.clone();
        let error_handler = |e: BackendError| Rejection::new(Context::insert(name.clone()), e);

        validation::validate(&submission).map_err(error_handler)?;

        debug!(environment.logger, "Inserting recommendation..."; "name" => &name);
        let created = scoring::insert(environment.db.clone(), submission)
            .await
            .map_err(error_handler)?;

        with_header(
            with_status(json(&created), StatusCode::CREATED),
            "location",
            environment.urls.recommendation(created.id).as_str(),
        )
    }
}

pub async fn upvote(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::upvote(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Upvoting recommendation..."; "id" => id);

        let score = scoring::upvote(environment.db.clone(), id)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Score { score })
    }
}

pub async fn downvote(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::downvote(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Downvoting recommendation..."; "id" => id);

        let score = scoring::downvote(environment.db.clone(), id)
            .await
            .map_err(error_handler)?;

        json(&SuccessResponse::Score { score })
    }
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let recommendations = scoring::list(environment.db.clone())
            .await
            .map_err(|e: BackendError| Rejection::new(Context::list(), e))?;

        json(&recommendations)
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Retrieving recommendation..."; "id" => id);

        let recommendation = scoring::get_by_id(environment.db.clone(), id)
            .await
            .map_err(error_handler)?;

        json(&recommendation)
    }
}

pub async fn top(environment: Environment, amount: u32) -> RouteResult {
    timed! {
        let recommendations = scoring::top(environment.db.clone(), amount)
            .await
            .map_err(|e: BackendError| Rejection::new(Context::top(amount), e))?;

        json(&recommendations)
    }
}

pub async fn random(environment: Environment) -> RouteResult {
    timed! {
        let (draw, pick) = {
            let mut rng = rand::thread_rng();

            (rng.gen::<f64>(), rng.gen::<f64>())
        };

        let recommendation = scoring::random(environment.db.clone(), draw, pick)
            .await
            .map_err(|e: BackendError| Rejection::new(Context::random(), e))?;

        json(&recommendation)
    }
}

fn parse_id(id: &str) -> Result<i32, BackendError> {
    id.parse::<i32>()
        .map_err(|_| BackendError::InvalidId(id.to_owned()))
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
