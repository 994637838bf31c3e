use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Downvote { id: String },
    Insert { name: String },
    List {},
    Random {},
    Retrieve { id: String },
    Top { amount: u32 },
    Upvote { id: String },
}

impl Context {
    pub fn downvote(id: String) -> Context {
        Context::Downvote { id }
    }

    pub fn insert(name: String) -> Context {
        Context::Insert { name }
    }

    pub fn list() -> Context {
        Context::List {}
    }

    pub fn random() -> Context {
        Context::Random {}
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn top(amount: u32) -> Context {
        Context::Top { amount }
    }

    pub fn upvote(id: String) -> Context {
        Context::Upvote { id }
    }
}
