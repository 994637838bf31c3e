use serde::{Deserialize, Serialize};
use url::Url;

use crate::normalization;

/// A single recommendation in the database.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    /// The ID of the recommendation.
    pub id: i32,

    /// The name provided. Must be unique after normalization.
    pub name: String,

    /// The link to the recommended video.
    pub link: Url,

    /// The running vote total.
    pub score: i32,
}

impl Recommendation {
    pub fn new(id: i32, name: String, link: Url, score: i32) -> Self {
        Self {
            id,
            name,
            link,
            score,
        }
    }
}

/// A recommendation as submitted, before it has been admitted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewRecommendation {
    /// The name provided. Must be unique after normalization.
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    /// The link provided. Must point at a recognized video host.
    pub link: String,
}
