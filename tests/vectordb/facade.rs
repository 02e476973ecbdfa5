//! Store facade behaviour through `Box<dyn VectorDbClient>`
//!
//! Upsert semantics, batch atomicity, limits and relevance ordering, as
//! seen by a caller that only holds the trait object.

use crate::common::*;
use promrag::metric_id;

// ============================================================================
// Upsert
// ============================================================================

#[test]
fn upsert_replaces_by_name() {
    let store = TestStore::new();
    store.db.add_one(&metric("m", "a")).unwrap();
    store.db.add_one(&metric("m", "b")).unwrap();

    assert_eq!(store.row_count(), 1);
    let results = store.db.search("m", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].help, "b");
}

#[test]
fn upsert_within_one_batch_keeps_last() {
    let store = TestStore::new();
    store
        .db
        .add_batch(&[metric("m", "first"), metric("m", "second")])
        .unwrap();

    assert_eq!(store.row_count(), 1);
    assert_eq!(store.db.search("m", 10).unwrap()[0].help, "second");
}

#[test]
fn id_depends_on_name_only() {
    let a = metric_id("http_requests_total");
    assert_eq!(a, metric_id("http_requests_total"));
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_ne!(a, metric_id("http_requests_count"));

    let store = TestStore::new();
    store
        .db
        .add_one(
            &MetricMetadata::new("http_requests_total", "one", "counter").with_labels(["code"]),
        )
        .unwrap();
    store
        .db
        .add_one(&MetricMetadata::new("http_requests_total", "two", "gauge"))
        .unwrap();

    let conn = rusqlite::Connection::open(store.db_path()).unwrap();
    let id: String = conn
        .query_row(
            &format!("SELECT id FROM \"{}\"", store.config.collection),
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(id, a);
}

#[test]
fn unnamed_metric_is_rejected() {
    let store = TestStore::new();
    let err = store.db.add_one(&metric("", "orphan help")).unwrap_err();
    assert!(matches!(err, VectorDbError::Validation { .. }));
    assert_eq!(store.row_count(), 0);
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn batch_with_invalid_item_stores_nothing() {
    let store = TestStore::new();
    let err = store
        .db
        .add_batch(&[metric("ok", ""), metric("", "")])
        .unwrap_err();

    assert!(matches!(err, VectorDbError::Validation { .. }));
    assert_eq!(store.row_count(), 0);
    assert!(store.search_names("ok", 10).is_empty());
}

#[test]
fn failed_batch_leaves_previous_contents_unchanged() {
    let store = TestStore::new();
    store.db.add_batch(&sample_catalog()).unwrap();

    let err = store
        .db
        .add_batch(&[metric("node_memory_usage", "rewritten"), metric("", "")])
        .unwrap_err();
    assert!(err.is_validation_error());

    assert_eq!(store.row_count(), 2);
    let hits = store.db.search("node memory usage", 1).unwrap();
    assert_eq!(hits[0].help, "Memory usage of node");
}

#[test]
fn empty_batch_is_noop() {
    let store = TestStore::new();
    store.db.add_one(&metric("up", "Target is up")).unwrap();

    store.db.add_batch(&[]).unwrap();
    assert_eq!(store.row_count(), 1);
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn search_respects_limit() {
    let store = TestStore::new();
    let catalog: Vec<MetricMetadata> = (0..5)
        .map(|i| metric(&format!("metric_{}", i), "scrape duration"))
        .collect();

    for n in 0..=catalog.len() {
        store.db.delete_collection().unwrap();
        store.db.create_collection().unwrap();
        store.db.add_batch(&catalog[..n]).unwrap();

        for limit in 0..8 {
            let results = store.db.search("scrape duration", limit).unwrap();
            assert_eq!(results.len(), n.min(limit), "n={} limit={}", n, limit);
        }
    }
}

#[test]
fn search_empty_collection() {
    let store = TestStore::new();
    assert!(store.db.search("anything", 10).unwrap().is_empty());
}

#[test]
fn search_ranks_by_relevance() {
    let store = TestStore::new();
    store.db.add_batch(&sample_catalog()).unwrap();

    assert_eq!(
        store.search_names("memory", 10),
        vec!["node_memory_usage", "http_requests_total"]
    );
    assert_eq!(
        store.search_names("http requests", 10),
        vec!["http_requests_total", "node_memory_usage"]
    );
}

#[test]
fn search_returns_full_metadata() {
    let store = TestStore::new();
    store.db.add_batch(&sample_catalog()).unwrap();

    let top = &store.db.search("http requests", 1).unwrap()[0];
    assert_eq!(top.name, "http_requests_total");
    assert_eq!(top.help, "Total number of HTTP requests");
    assert_eq!(top.metric_type, "counter");
    assert_eq!(top.labels, vec!["method", "code"]);
}

#[test]
fn equal_scores_rank_by_name() {
    let store = TestStore::new();
    store
        .db
        .add_batch(&[
            metric("zeta_latency", ""),
            metric("alpha_latency", ""),
            metric("mid_latency", ""),
        ])
        .unwrap();

    // Nothing in common with the query: every score is zero.
    assert_eq!(
        store.search_names("goroutines", 10),
        vec!["alpha_latency", "mid_latency", "zeta_latency"]
    );
}

#[test]
fn store_is_shareable_across_threads() {
    let store = TestStore::new();
    std::thread::scope(|s| {
        for t in 0..4 {
            let db = &store.db;
            s.spawn(move || {
                for i in 0..10 {
                    db.add_one(&metric(&format!("worker_{}_metric_{}", t, i), "busy"))
                        .unwrap();
                }
            });
        }
    });
    assert_eq!(store.row_count(), 40);
}
