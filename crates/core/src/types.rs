//! Metric metadata types
//!
//! - MetricMetadata: one entry of the Prometheus metadata catalog
//! - MetricRecord: metadata plus its deterministic id and embedding
//! - ScoredMetric: a search hit with its cosine similarity

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{VectorDbError, VectorDbResult};

/// Separator used when labels are flattened into a single text column
pub const LABEL_SEPARATOR: &str = ", ";

/// Metadata associated with a Prometheus metric
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMetadata {
    /// Name of the metric, unique within a collection
    pub name: String,

    /// Description of what the metric represents
    #[serde(default)]
    pub help: String,

    /// Metric kind (counter, gauge, histogram, ...). Not validated.
    #[serde(rename = "type", default)]
    pub metric_type: String,

    /// Label names attached to the metric
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl MetricMetadata {
    /// Create metadata with no labels
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        metric_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            metric_type: metric_type.into(),
            labels: Vec::new(),
        }
    }

    /// Attach label names
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Check the entry can be stored: the name is required
    pub fn validate(&self) -> VectorDbResult<()> {
        if self.name.is_empty() {
            return Err(VectorDbError::validation(&self.name, "name is required"));
        }
        Ok(())
    }

    /// Labels flattened with [`LABEL_SEPARATOR`]
    pub fn joined_labels(&self) -> String {
        join_labels(&self.labels)
    }

    /// Flat string payload stored alongside remote vectors
    pub fn to_payload(&self) -> BTreeMap<String, String> {
        let mut payload = BTreeMap::new();
        payload.insert("name".to_string(), self.name.clone());
        payload.insert("help".to_string(), self.help.clone());
        payload.insert("type".to_string(), self.metric_type.clone());
        payload.insert("labels".to_string(), self.joined_labels());
        payload
    }
}

/// Join label names into the stored text form
pub fn join_labels(labels: &[String]) -> String {
    labels.join(LABEL_SEPARATOR)
}

/// Split the stored text form back into label names
///
/// An empty string yields no labels rather than a single empty label.
pub fn split_labels(labels: &str) -> Vec<String> {
    if labels.is_empty() {
        return Vec::new();
    }
    labels.split(LABEL_SEPARATOR).map(str::to_string).collect()
}

/// Deterministic record id for a metric name
///
/// First 16 bytes of the SHA-256 digest of the name, as lowercase hex.
/// Depends on the name only, so re-adding a metric always targets the
/// same row.
pub fn metric_id(name: &str) -> String {
    let digest = Sha256::digest(name.as_bytes());
    digest[..16].iter().map(|b| format!("{:02x}", b)).collect()
}

/// A metric ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// Deterministic id derived from `metadata.name`
    pub id: String,
    /// The metric metadata
    pub metadata: MetricMetadata,
    /// Embedding of the metric's name and help text
    pub embedding: Vec<f32>,
}

impl MetricRecord {
    /// Build a record, deriving its id from the metric name
    pub fn new(metadata: MetricMetadata, embedding: Vec<f32>) -> Self {
        Self {
            id: metric_id(&metadata.name),
            metadata,
            embedding,
        }
    }
}

/// A search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMetric {
    /// The matched metric (embedding omitted)
    pub metadata: MetricMetadata,
    /// Cosine similarity with the query, higher = more similar
    pub score: f64,
}
