pub mod articles;
pub mod comments;
pub mod profiles;
pub mod users;

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::SqliteConnection;

use crate::config::{Config, DEFAULT_LIMIT};
use crate::errors::Result;

const SCHEMA: &str = include_str!("schema.sql");

pub type Connection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Shared handle to the connection pool. Cloning is cheap; repositories keep
/// no other state.
#[derive(Clone)]
pub struct Db(Pool<ConnectionManager<SqliteConnection>>);

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

impl Db {
    pub fn open(database_url: &str, pool_size: u32) -> Result<Db> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout: Duration::from_secs(5),
            }))
            .build(manager)?;
        Ok(Db(pool))
    }

    pub fn from_config(config: &Config) -> Result<Db> {
        Db::open(&config.database_url, config.pool_size)
    }

    /// Switches the file to WAL mode and creates any missing tables.
    pub fn setup(&self) -> Result<()> {
        let mut conn = self.conn()?;
        conn.batch_execute("PRAGMA journal_mode = WAL;")?;
        conn.batch_execute(SCHEMA)?;
        tracing::debug!("database schema ready");
        Ok(())
    }

    pub fn conn(&self) -> Result<Connection> {
        Ok(self.0.get()?)
    }
}

/// Applies the listing defaults: a non-positive limit means `DEFAULT_LIMIT`,
/// a negative offset means the first page.
pub(crate) fn page_bounds(limit: i64, offset: i64) -> (i64, i64) {
    let limit = if limit <= 0 { DEFAULT_LIMIT } else { limit };
    (limit, offset.max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_uses_default_page_size() {
        assert_eq!(page_bounds(0, 0), (DEFAULT_LIMIT, 0));
        assert_eq!(page_bounds(-3, -1), (DEFAULT_LIMIT, 0));
        assert_eq!(page_bounds(5, 5), (5, 5));
    }
}
