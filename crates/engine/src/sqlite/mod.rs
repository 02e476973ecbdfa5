//! Embedded SQLite vector database
//!
//! One table per collection:
//!
//! | column    | type | notes                                  |
//! |-----------|------|----------------------------------------|
//! | id        | TEXT | primary key, `metric_id(name)`         |
//! | name      | TEXT | indexed                                |
//! | help      | TEXT |                                        |
//! | type      | TEXT |                                        |
//! | labels    | TEXT | label names joined with `", "`         |
//! | embedding | BLOB | little-endian f32, see [`crate::codec`]|
//!
//! The table and index names are the only values interpolated into SQL;
//! both come from [`promrag_security::safe_identifier`].
//!
//! A single connection is guarded by a mutex. Every operation runs to
//! completion on the calling thread; isolation during batch writes comes
//! from SQLite's own transactions.

mod add;
mod search;

use std::path::PathBuf;

use parking_lot::Mutex;
use promrag_core::{
    MetricMetadata, SharedEncoder, VectorDbClient, VectorDbError, VectorDbResult,
};
use promrag_security::{safe_identifier, QuotedIdentifier};
use rusqlite::Connection;
use tracing::info;

/// Options for opening an embedded vector database
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file; parent directories are created if missing
    pub db_path: PathBuf,
    /// Collection (table) name, validated before anything is opened
    pub collection_name: String,
}

impl SqliteConfig {
    /// Create options for `collection_name` stored in `db_path`
    pub fn new(db_path: impl Into<PathBuf>, collection_name: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            collection_name: collection_name.into(),
        }
    }
}

/// Vector database backed by a single SQLite connection
pub struct SqliteVectorDb {
    conn: Mutex<Option<Connection>>,
    collection_name: String,
    table: QuotedIdentifier,
    encoder: SharedEncoder,
}

impl std::fmt::Debug for SqliteVectorDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteVectorDb")
            .field("collection_name", &self.collection_name)
            .finish_non_exhaustive()
    }
}

impl SqliteVectorDb {
    /// Open (or create) the database file and ensure the collection exists.
    ///
    /// The collection name is validated first: an invalid name fails with
    /// `InvalidIdentifier` before any file or directory is created.
    pub fn open(config: SqliteConfig, encoder: SharedEncoder) -> VectorDbResult<Self> {
        let table = safe_identifier(&config.collection_name)?;

        if let Some(dir) = config.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    VectorDbError::backend(
                        format!("failed to create database directory {}", dir.display()),
                        e,
                    )
                })?;
            }
        }

        info!(
            target: "promrag::sqlite",
            path = %config.db_path.display(),
            "Opening sqlite3 database"
        );
        let conn = Connection::open(&config.db_path)
            .map_err(|e| VectorDbError::backend("failed to open sqlite3 db", e))?;

        Self::from_connection(conn, config.collection_name, table, encoder)
    }

    /// Open a private in-memory database holding one collection
    pub fn open_in_memory(
        collection_name: impl Into<String>,
        encoder: SharedEncoder,
    ) -> VectorDbResult<Self> {
        let collection_name = collection_name.into();
        let table = safe_identifier(&collection_name)?;
        let conn = Connection::open_in_memory()
            .map_err(|e| VectorDbError::backend("failed to open in-memory sqlite3 db", e))?;
        Self::from_connection(conn, collection_name, table, encoder)
    }

    // The connection is owned by `db` as soon as it exists, so a failed
    // create_collection drops and closes it on the way out.
    fn from_connection(
        conn: Connection,
        collection_name: String,
        table: QuotedIdentifier,
        encoder: SharedEncoder,
    ) -> VectorDbResult<Self> {
        let db = Self {
            conn: Mutex::new(Some(conn)),
            collection_name,
            table,
            encoder,
        };
        db.create_collection()?;
        Ok(db)
    }

    /// Name of the collection served by this instance
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Run `f` against the open connection.
    ///
    /// Fails with `Backend` once the store has been closed.
    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> VectorDbResult<T>,
    ) -> VectorDbResult<T> {
        let mut guard = self.conn.lock();
        let conn = guard.as_mut().ok_or_else(|| {
            VectorDbError::backend(
                format!("collection '{}' unavailable", self.collection_name),
                "store is closed",
            )
        })?;
        f(conn)
    }

    /// Create the collection table and its name index if missing.
    pub fn create_collection(&self) -> VectorDbResult<()> {
        let index = safe_identifier(&format!("idx_{}_name", self.collection_name))?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                help TEXT,
                type TEXT,
                labels TEXT,
                embedding BLOB
            )",
            self.table
        );
        let create_index = format!("CREATE INDEX IF NOT EXISTS {} ON {}(name)", index, self.table);

        self.with_conn(|conn| {
            conn.execute(&create_table, [])
                .map_err(|e| VectorDbError::backend("failed to create collection table", e))?;
            conn.execute(&create_index, [])
                .map_err(|e| VectorDbError::backend("failed to create name index", e))?;
            Ok(())
        })?;

        info!(
            target: "promrag::sqlite",
            collection = %self.collection_name,
            "Created collection table"
        );
        Ok(())
    }

    /// Drop the collection table. Dropping a missing table succeeds.
    pub fn delete_collection(&self) -> VectorDbResult<()> {
        let drop_table = format!("DROP TABLE IF EXISTS {}", self.table);
        self.with_conn(|conn| {
            conn.execute(&drop_table, [])
                .map_err(|e| VectorDbError::backend("failed to delete collection table", e))?;
            Ok(())
        })?;

        info!(
            target: "promrag::sqlite",
            collection = %self.collection_name,
            "Deleted collection table"
        );
        Ok(())
    }

    /// Check whether the collection table currently exists
    pub fn collection_exists(&self) -> VectorDbResult<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [&self.collection_name],
                    |row| row.get(0),
                )
                .map_err(|e| VectorDbError::backend("failed to check collection existence", e))?;
            Ok(count > 0)
        })
    }

    /// Close the connection.
    ///
    /// Later operations fail with `Backend`; closing twice is a no-op.
    pub fn close(&self) -> VectorDbResult<()> {
        let conn = self.conn.lock().take();
        if let Some(conn) = conn {
            conn.close()
                .map_err(|(_, e)| VectorDbError::backend("failed to close sqlite3 db", e))?;
            info!(
                target: "promrag::sqlite",
                collection = %self.collection_name,
                "Closed sqlite3 database"
            );
        }
        Ok(())
    }
}

impl VectorDbClient for SqliteVectorDb {
    fn create_collection(&self) -> VectorDbResult<()> {
        SqliteVectorDb::create_collection(self)
    }

    fn delete_collection(&self) -> VectorDbResult<()> {
        SqliteVectorDb::delete_collection(self)
    }

    fn add_one(&self, metadata: &MetricMetadata) -> VectorDbResult<()> {
        SqliteVectorDb::add_one(self, metadata)
    }

    fn add_batch(&self, metadata: &[MetricMetadata]) -> VectorDbResult<()> {
        SqliteVectorDb::add_batch(self, metadata)
    }

    fn search(&self, query: &str, limit: usize) -> VectorDbResult<Vec<MetricMetadata>> {
        SqliteVectorDb::search(self, query, limit)
    }

    fn close(&self) -> VectorDbResult<()> {
        SqliteVectorDb::close(self)
    }
}
