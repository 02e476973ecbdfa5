//! Shared test utilities for the vectordb suite.
//!
//! Import via `mod common;` from main.rs.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

pub use promrag::{
    open_vector_db, MetricMetadata, VectorDbClient, VectorDbConfig, VectorDbError,
};
use tempfile::TempDir;

static COUNTER: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// TestStore - embedded store in a private temp directory
// ============================================================================

/// Embedded store opened through the provider selector.
pub struct TestStore {
    pub db: Box<dyn VectorDbClient>,
    pub config: VectorDbConfig,
    pub dir: TempDir,
}

impl TestStore {
    /// Open a fresh sqlite3 store with a unique collection name.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = sqlite_config(&dir, &unique_collection());
        let db = open_vector_db(&config).expect("Failed to open store");
        Self { db, config, dir }
    }

    /// Path of the database file
    pub fn db_path(&self) -> PathBuf {
        self.config.sqlite3.db_path.clone()
    }

    /// Count rows with a separate connection, bypassing the store.
    pub fn row_count(&self) -> i64 {
        let conn = rusqlite::Connection::open(self.db_path()).expect("open raw connection");
        conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", self.config.collection),
            [],
            |row| row.get(0),
        )
        .expect("count rows")
    }

    /// Names returned by a search, in rank order.
    pub fn search_names(&self, query: &str, limit: usize) -> Vec<String> {
        self.db
            .search(query, limit)
            .expect("search")
            .into_iter()
            .map(|m| m.name)
            .collect()
    }
}

impl Drop for TestStore {
    fn drop(&mut self) {
        let _ = self.db.close();
    }
}

/// sqlite3 configuration rooted in `dir`
pub fn sqlite_config(dir: &TempDir, collection: &str) -> VectorDbConfig {
    let mut config = VectorDbConfig::default();
    config.collection = collection.to_string();
    config.sqlite3.db_path = dir.path().join("data").join("metrics.db");
    config
}

/// Collection name not shared with any other test in this process
pub fn unique_collection() -> String {
    format!("test_metrics_{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub fn metric(name: &str, help: &str) -> MetricMetadata {
    MetricMetadata::new(name, help, "gauge")
}

/// The two-metric catalog used by relevance tests.
pub fn sample_catalog() -> Vec<MetricMetadata> {
    vec![
        MetricMetadata::new("http_requests_total", "Total number of HTTP requests", "counter")
            .with_labels(["method", "code"]),
        MetricMetadata::new("node_memory_usage", "Memory usage of node", "gauge")
            .with_labels(["instance"]),
    ]
}
