//! Provider selection and configuration loading

use std::collections::HashMap;

use crate::common::*;
use promrag::{open_vector_db_with_encoder, HashingEncoder, ProviderKind};
use tempfile::TempDir;

#[test]
fn unknown_provider_is_rejected_with_tag() {
    let dir = TempDir::new().unwrap();
    let mut config = sqlite_config(&dir, "metrics");
    config.provider = "pinecone".to_string();

    match open_vector_db(&config) {
        Err(VectorDbError::UnsupportedProvider { provider }) => assert_eq!(provider, "pinecone"),
        Err(other) => panic!("expected UnsupportedProvider, got {}", other),
        Ok(_) => panic!("expected UnsupportedProvider, store opened"),
    }
    assert!(!config.sqlite3.db_path.exists());
}

#[test]
fn provider_tags_are_case_insensitive_aliases() {
    assert_eq!(ProviderKind::parse("SQLite3").unwrap(), ProviderKind::Sqlite3);
    assert_eq!(ProviderKind::parse("embedded").unwrap(), ProviderKind::Sqlite3);
    assert_eq!(ProviderKind::parse(" Qdrant ").unwrap(), ProviderKind::Qdrant);
    assert_eq!(ProviderKind::parse("remote").unwrap(), ProviderKind::Qdrant);
}

#[test]
fn embedded_alias_opens_sqlite() {
    let dir = TempDir::new().unwrap();
    let mut config = sqlite_config(&dir, "metrics");
    config.provider = "embedded".to_string();

    let db = open_vector_db(&config).unwrap();
    db.add_batch(&sample_catalog()).unwrap();
    assert_eq!(db.search("memory", 1).unwrap()[0].name, "node_memory_usage");
    db.close().unwrap();
    assert!(config.sqlite3.db_path.exists());
}

#[test]
fn caller_supplied_encoder_is_used() {
    let dir = TempDir::new().unwrap();
    let config = sqlite_config(&dir, "metrics");
    let encoder = std::sync::Arc::new(HashingEncoder::new(16).unwrap());

    let db = open_vector_db_with_encoder(&config, encoder).unwrap();
    db.add_one(&metric("up", "Target is up")).unwrap();
    db.close().unwrap();

    let conn = rusqlite::Connection::open(&config.sqlite3.db_path).unwrap();
    let blob: Vec<u8> = conn
        .query_row("SELECT embedding FROM \"metrics\"", [], |row| row.get(0))
        .unwrap();
    assert_eq!(blob.len(), 16 * 4);
}

#[test]
fn env_overrides_select_backend() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("env").join("override.db");
    let vars: HashMap<&str, String> = HashMap::from([
        ("PRAG_VECTORDB_PROVIDER", "sqlite3".to_string()),
        ("PRAG_VECTORDB_COLLECTION", "from_env".to_string()),
        (
            "PRAG_VECTORDB_SQLITE3_DB_PATH",
            db_path.to_string_lossy().into_owned(),
        ),
        ("PRAG_VECTORDB_ENCODER_DIMENSION", "64".to_string()),
    ]);

    let mut config = VectorDbConfig::default();
    config
        .apply_overrides(|key| vars.get(key).cloned())
        .unwrap();
    config.validate().unwrap();

    let db = open_vector_db(&config).unwrap();
    db.add_one(&metric("up", "")).unwrap();
    db.close().unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM \"from_env\"", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn default_config_file_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("promrag.toml");

    VectorDbConfig::write_default_if_missing(&path).unwrap();
    let loaded = VectorDbConfig::from_file(&path).unwrap();
    assert_eq!(loaded.provider, "sqlite3");
    assert_eq!(loaded.collection, "prag-metrics");
    assert_eq!(loaded.qdrant.port, 6333);
    assert_eq!(loaded.encoder.dimension, 384);

    // An existing file is left alone
    std::fs::write(&path, "provider = \"qdrant\"\n").unwrap();
    VectorDbConfig::write_default_if_missing(&path).unwrap();
    assert_eq!(VectorDbConfig::from_file(&path).unwrap().provider, "qdrant");
}

#[test]
fn unreachable_qdrant_is_a_backend_error() {
    let mut config = VectorDbConfig::default();
    config.provider = "qdrant".to_string();
    config.qdrant.host = "127.0.0.1".to_string();
    config.qdrant.port = 1;
    config.qdrant.timeout_ms = 500;

    match open_vector_db(&config) {
        Err(e) => assert!(e.is_backend_error(), "got {}", e),
        Ok(_) => panic!("nothing listens on port 1"),
    }
}
