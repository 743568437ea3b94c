use crate::errors::custom::DbError;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

pub type DbPool = Pool<AsyncPgConnection>;

const SCHEMA_SQL: &str = include_str!("../migrations/2024-10-01-000000_create_food_delivery/up.sql");

/******************************************/
// Establishing Db Connection
/******************************************/
pub fn establish_connection(database_url: &str, max_size: usize) -> Result<DbPool, DbError> {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Pool::builder(manager)
        .max_size(max_size)
        .build()
        .map_err(|err| DbError::ConnectionError(err.to_string()))
}

/******************************************/
// Applying the embedded schema
/******************************************/
/// The schema script only creates what is missing, so this is safe on every start.
#[tracing::instrument(name = "Applying database schema", skip(pool))]
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    let mut conn = pool
        .get()
        .await
        .map_err(|err| DbError::ConnectionError(err.to_string()))?;
    conn.batch_execute(SCHEMA_SQL).await?;
    Ok(())
}
