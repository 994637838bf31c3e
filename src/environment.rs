use std::sync::Arc;

use log::Logger;

use crate::db::SafeDb;
use crate::urls::Urls;

#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: SafeDb,
    pub urls: Arc<Urls>,
}

impl Environment {
    pub fn new(logger: Arc<Logger>, db: SafeDb, urls: Arc<Urls>) -> Self {
        Self { logger, db, urls }
    }
}
