mod accounts;
mod addresses;
mod menu;
mod orders;
mod reviews;

use crate::db::DbPool;
use crate::errors::custom::DbError;
use diesel_async::pooled_connection::deadpool::Object;
use diesel_async::AsyncPgConnection;

/// Repository backed by a deadpool of async Postgres connections.
#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Object<AsyncPgConnection>, DbError> {
        self.pool
            .get()
            .await
            .map_err(|err| DbError::ConnectionError(err.to_string()))
    }
}
