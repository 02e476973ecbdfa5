//! Qdrant REST request bodies and response parsing
//!
//! Pure functions only; the HTTP round trips live in the parent module.

use promrag_core::{
    split_labels, MetricMetadata, MetricRecord, ScoredMetric, VectorDbError, VectorDbResult,
};
use serde_json::{json, Map, Value};
use tracing::warn;
use uuid::Uuid;

/// Point id for a metric: UUID v5 of the name in the DNS namespace
pub fn point_id(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_DNS, name.as_bytes())
}

/// `PUT /collections/{c}` body
pub fn create_collection_body(dimension: usize) -> Value {
    json!({
        "vectors": {
            "size": dimension,
            "distance": "Cosine",
        }
    })
}

/// `PUT /collections/{c}/points` body
pub fn upsert_body(records: &[MetricRecord]) -> Value {
    let points: Vec<Value> = records
        .iter()
        .map(|record| {
            json!({
                "id": point_id(&record.metadata.name).to_string(),
                "vector": record.embedding,
                "payload": record.metadata.to_payload(),
            })
        })
        .collect();
    json!({ "points": points })
}

/// `POST /collections/{c}/points/query` body
pub fn query_body(vector: &[f32], limit: usize) -> Value {
    json!({
        "query": vector,
        "limit": limit,
        "with_payload": true,
    })
}

/// Read `result.exists` from a `GET /collections/{c}/exists` response
pub fn parse_exists(response: &Value) -> VectorDbResult<bool> {
    response
        .get("result")
        .and_then(|r| r.get("exists"))
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            VectorDbError::backend("unexpected qdrant response", "missing result.exists")
        })
}

/// Convert `result.points[]` of a query response into scored metrics.
///
/// Points without a `name` payload are logged and skipped.
pub fn parse_query_points(response: &Value) -> VectorDbResult<Vec<ScoredMetric>> {
    let points = response
        .get("result")
        .and_then(|r| r.get("points"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            VectorDbError::backend("unexpected qdrant response", "missing result.points")
        })?;

    let mut hits = Vec::with_capacity(points.len());
    for point in points {
        let metadata = point
            .get("payload")
            .and_then(Value::as_object)
            .and_then(payload_metadata);
        match metadata {
            Some(metadata) => {
                let score = point.get("score").and_then(Value::as_f64).unwrap_or(0.0);
                hits.push(ScoredMetric { metadata, score });
            }
            None => {
                let id = point.get("id").cloned().unwrap_or_default();
                warn!(
                    target: "promrag::qdrant",
                    id = %id,
                    "Skipping point without metric payload"
                );
            }
        }
    }
    Ok(hits)
}

fn payload_metadata(payload: &Map<String, Value>) -> Option<MetricMetadata> {
    let field = |key: &str| payload.get(key).and_then(Value::as_str).unwrap_or_default();

    let name = field("name");
    if name.is_empty() {
        return None;
    }
    Some(MetricMetadata {
        name: name.to_string(),
        help: field("help").to_string(),
        metric_type: field("type").to_string(),
        labels: split_labels(field("labels")),
    })
}
