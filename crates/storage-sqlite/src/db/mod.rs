//! Database connection management: pool setup, migrations, and the
//! single-writer actor.

mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::errors::StorageError;
use foliotrack_core::errors::{DatabaseError, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connection customizer applied to every pooled connection. WAL keeps
/// readers unblocked by the writer actor; the busy timeout covers the
/// handover between them.
#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create the r2d2 connection pool for the given database file.
pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(8)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| DatabaseError::PoolCreationFailed(e.to_string()))?;
    Ok(Arc::new(pool))
}

/// Get a pooled connection.
pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get()
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()).into())
}

/// Run all pending embedded migrations.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
    for migration in applied {
        info!("Applied migration {}", migration);
    }
    Ok(())
}

/// Cheap connectivity check used by the health endpoint.
pub fn ping(pool: &DbPool) -> Result<()> {
    use diesel::RunQueryDsl;
    let mut conn = get_connection(pool)?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .map_err(StorageError::from)?;
    Ok(())
}

/// Create the pool and bring the schema up to date. The entry point the
/// server calls on startup.
pub fn init(db_path: &str) -> Result<Arc<DbPool>> {
    let pool = create_pool(db_path)?;
    let mut conn = get_connection(&pool)?;
    run_migrations(&mut conn)?;
    Ok(pool)
}
