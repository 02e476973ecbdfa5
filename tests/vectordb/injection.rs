//! Collection names are interpolated into DDL; hostile names must be
//! rejected before any statement runs or any file is created.

use crate::common::*;
use promrag::{safe_identifier, validate_identifier, SqliteVectorDb};
use tempfile::TempDir;

const HOSTILE: &[&str] = &[
    "'; DROP TABLE x; --",
    "SELECT",
    "a b",
    "select",
    "Drop",
    "metrics\"; DROP TABLE metrics; --",
    "1metrics",
    "",
];

#[test]
fn hostile_names_fail_before_touching_disk() {
    for name in HOSTILE {
        let dir = TempDir::new().unwrap();
        let config = sqlite_config(&dir, name);

        match open_vector_db(&config) {
            Err(VectorDbError::InvalidIdentifier { .. }) => {}
            Err(other) => panic!("{:?}: expected InvalidIdentifier, got {}", name, other),
            Ok(_) => panic!("{:?}: expected InvalidIdentifier, store opened", name),
        }
        assert!(
            !config.sqlite3.db_path.exists(),
            "{:?}: database file was created",
            name
        );
    }
}

#[test]
fn hostile_names_rejected_by_guard() {
    for name in HOSTILE {
        let err = safe_identifier(name).unwrap_err();
        assert!(err.is_validation_error(), "{:?}", name);
    }
}

#[test]
fn hostile_names_leave_existing_tables_alone() {
    let store = TestStore::new();
    store.db.add_batch(&sample_catalog()).unwrap();

    for name in HOSTILE {
        let mut config = store.config.clone();
        config.collection = name.to_string();
        assert!(open_vector_db(&config).is_err(), "{:?}", name);
    }

    assert_eq!(store.row_count(), 2);
    let conn = rusqlite::Connection::open(store.db_path()).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 1);
}

#[test]
fn accepted_names_round_trip() {
    for name in ["prag-metrics", "_private", "Metrics_2024", "a"] {
        validate_identifier(name).unwrap();

        let encoder = promrag::build_encoder(&VectorDbConfig::default()).unwrap();
        let db = SqliteVectorDb::open_in_memory(name, encoder).unwrap();
        db.add_one(&metric("up", "Target is up")).unwrap();
        assert_eq!(db.count().unwrap(), 1);
        assert!(db.collection_exists().unwrap());
    }
}

#[test]
fn length_limit_is_inclusive() {
    let max = "m".repeat(64);
    assert_eq!(safe_identifier(&max).unwrap().as_str(), format!("\"{}\"", max));
    assert!(safe_identifier(&"m".repeat(65)).is_err());
}
