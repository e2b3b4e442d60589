use anyhow::Result;
use sqlx::{Pool, Sqlite};

use super::{connect_db, migrate, prepare_sqlite_url};

/// Handle to the event store. Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Connects to `url` and brings the schema up to date.
    pub async fn open(url: &str, max_connections: u32) -> Result<Self> {
        let url = prepare_sqlite_url(url);
        let pool = connect_db(&url, max_connections).await?;
        migrate(&pool).await?;
        tracing::info!(db_url = %url, "Database ready");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

impl std::ops::Deref for Database {
    type Target = Pool<Sqlite>;
    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
