//! Connection pool, migrations and the single-writer actor.

mod write_actor;

pub use write_actor::{spawn_writer, WriteHandle};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};

use diesel::connection::SimpleConnection;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};

use crate::errors::{IntoCore, StorageError};
use wealthledger_core::errors::{DatabaseError, Error, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const DB_FILE_NAME: &str = "wealthledger.db";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const POOL_SIZE: u32 = 8;
const BUSY_TIMEOUT_MS: u32 = 5_000;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Per-connection pragmas. Foreign keys are off by default in SQLite.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL;",
            BUSY_TIMEOUT_MS
        ))
        .map_err(r2d2::Error::QueryError)
    }
}

/// Resolves the database file: `DATABASE_URL` wins, otherwise
/// `<app_data_dir>/wealthledger.db`.
pub fn get_db_path(app_data_dir: &str) -> String {
    resolve_db_path(app_data_dir, env::var(DATABASE_URL_ENV).ok())
}

fn resolve_db_path(app_data_dir: &str, database_url: Option<String>) -> String {
    match database_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => url,
        None => Path::new(app_data_dir)
            .join(DB_FILE_NAME)
            .to_string_lossy()
            .into_owned(),
    }
}

/// Makes sure the parent directory exists and returns the database path.
pub fn init(app_data_dir: &str) -> Result<String> {
    let db_path = get_db_path(app_data_dir);
    if let Some(parent) = Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Database(DatabaseError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }
    }
    debug!("Using database at {}", db_path);
    Ok(db_path)
}

pub fn create_pool(db_path: &str) -> Result<Arc<DbPool>> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_path);
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .connection_timeout(Duration::from_secs(30))
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)
        .map_err(|e| Error::Database(DatabaseError::PoolCreationFailed(e.to_string())))?;
    Ok(Arc::new(pool))
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection> {
    pool.get().into_core()
}

/// Runs `f` inside one read transaction on a pooled connection, so every
/// query in it sees the same state of the ledger.
pub fn read_transaction<T, F>(pool: &DbPool, f: F) -> Result<T>
where
    F: FnOnce(&mut SqliteConnection) -> Result<T>,
{
    let mut conn = get_connection(pool)?;
    conn.transaction::<T, StorageError, _>(|c| f(c).map_err(StorageError::from))
        .map_err(Error::from)
}

/// Applies every pending embedded migration.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = get_connection(pool)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::from(StorageError::MigrationFailed(e.to_string())))?;
    for version in &applied {
        info!("Applied migration {}", version);
    }
    if applied.is_empty() {
        debug!("Database schema is up to date");
    }
    Ok(())
}

/// Pool, migrations and writer in one step.
pub fn open(db_path: &str) -> Result<(Arc<DbPool>, WriteHandle)> {
    let pool = create_pool(db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());
    Ok((pool, writer))
}
