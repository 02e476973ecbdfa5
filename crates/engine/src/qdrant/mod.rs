//! Remote vector database backed by a Qdrant service
//!
//! Speaks the Qdrant REST API over a blocking `ureq` agent. Ranking is
//! delegated to the service (cosine distance); this side only encodes
//! text, shapes requests and maps responses back to metric metadata.

mod wire;

pub use wire::point_id;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use promrag_core::{
    MetricMetadata, MetricRecord, ScoredMetric, SharedEncoder, VectorDbClient, VectorDbError,
    VectorDbResult,
};
use serde_json::Value;
use tracing::{debug, info};
use ureq::{Agent, RequestBuilder};

use crate::ranker::sort_by_relevance;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for connecting to a Qdrant service
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    /// Base URL of the REST API, e.g. `http://localhost:6333`
    pub url: String,
    /// Collection holding the metric points
    pub collection_name: String,
    /// Optional API key, sent as the `api-key` header
    pub api_key: Option<String>,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl QdrantConfig {
    /// Create options with no API key and the default timeout
    pub fn new(url: impl Into<String>, collection_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            collection_name: collection_name.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

enum Method {
    Get,
    Put,
    Post,
    Delete,
}

/// Vector database client for a Qdrant collection
pub struct QdrantVectorDb {
    agent: Agent,
    base_url: String,
    collection_name: String,
    api_key: Option<String>,
    encoder: SharedEncoder,
    closed: AtomicBool,
}

impl std::fmt::Debug for QdrantVectorDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantVectorDb")
            .field("base_url", &self.base_url)
            .field("collection_name", &self.collection_name)
            .finish_non_exhaustive()
    }
}

impl QdrantVectorDb {
    /// Connect and ensure the collection exists.
    pub fn open(config: QdrantConfig, encoder: SharedEncoder) -> VectorDbResult<Self> {
        let db = Self::new(config, encoder)?;
        db.create_collection()?;
        Ok(db)
    }

    /// Build a client without contacting the service.
    pub fn new(config: QdrantConfig, encoder: SharedEncoder) -> VectorDbResult<Self> {
        validate_collection_segment(&config.collection_name)?;

        let agent_config = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build();

        info!(
            target: "promrag::qdrant",
            url = %config.url,
            collection = %config.collection_name,
            "Configured qdrant client"
        );

        Ok(Self {
            agent: Agent::new_with_config(agent_config),
            base_url: config.url.trim_end_matches('/').to_string(),
            collection_name: config.collection_name,
            api_key: config.api_key,
            encoder,
            closed: AtomicBool::new(false),
        })
    }

    /// Name of the collection served by this client
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!(
            "{}/collections/{}{}",
            self.base_url, self.collection_name, suffix
        )
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        match &self.api_key {
            Some(key) => request.header("api-key", key.as_str()),
            None => request,
        }
    }

    fn ensure_open(&self) -> VectorDbResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(VectorDbError::backend(
                format!("collection '{}' unavailable", self.collection_name),
                "client is closed",
            ));
        }
        Ok(())
    }

    /// One JSON round trip. Non-2xx statuses surface as `Backend`.
    fn call(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        context: &str,
    ) -> VectorDbResult<Value> {
        self.ensure_open()?;

        let body_bytes = match body {
            Some(body) => serde_json::to_vec(body).map_err(|e| {
                VectorDbError::backend(context, format!("failed to serialize request: {}", e))
            })?,
            None => Vec::new(),
        };

        let result = match method {
            Method::Get => self.authorize(self.agent.get(url)).call(),
            Method::Delete => self.authorize(self.agent.delete(url)).call(),
            Method::Put => self
                .authorize(self.agent.put(url))
                .header("Content-Type", "application/json")
                .send(&body_bytes[..]),
            Method::Post => self
                .authorize(self.agent.post(url))
                .header("Content-Type", "application/json")
                .send(&body_bytes[..]),
        };

        let mut response = result.map_err(|e| VectorDbError::backend(context, e))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| {
                VectorDbError::backend(context, format!("failed to read response: {}", e))
            })?;

        if text.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| VectorDbError::backend(context, format!("invalid JSON response: {}", e)))
    }

    /// Check whether the collection exists on the service
    pub fn collection_exists(&self) -> VectorDbResult<bool> {
        let response = self.call(
            Method::Get,
            &self.collection_url("/exists"),
            None,
            "failed to check collection existence",
        )?;
        wire::parse_exists(&response)
    }

    /// Create the collection sized to the encoder, unless it exists.
    pub fn create_collection(&self) -> VectorDbResult<()> {
        if self.collection_exists()? {
            debug!(
                target: "promrag::qdrant",
                collection = %self.collection_name,
                "Collection already exists"
            );
            return Ok(());
        }

        let dimension = self.encoder.dimension()?;
        self.call(
            Method::Put,
            &self.collection_url(""),
            Some(&wire::create_collection_body(dimension)),
            "failed to create collection",
        )?;

        info!(
            target: "promrag::qdrant",
            collection = %self.collection_name,
            dimension,
            "Created collection"
        );
        Ok(())
    }

    /// Delete the collection. Deleting a missing collection succeeds.
    pub fn delete_collection(&self) -> VectorDbResult<()> {
        if !self.collection_exists()? {
            return Ok(());
        }
        self.call(
            Method::Delete,
            &self.collection_url(""),
            None,
            "failed to delete collection",
        )?;

        info!(
            target: "promrag::qdrant",
            collection = %self.collection_name,
            "Deleted collection"
        );
        Ok(())
    }

    /// Upsert a single metric
    pub fn add_one(&self, metadata: &MetricMetadata) -> VectorDbResult<()> {
        self.add_batch(std::slice::from_ref(metadata))
    }

    /// Upsert a batch of metrics in one request.
    ///
    /// Every item is validated and encoded before anything is sent.
    pub fn add_batch(&self, batch: &[MetricMetadata]) -> VectorDbResult<()> {
        if batch.is_empty() {
            debug!(target: "promrag::qdrant", "Empty batch, nothing to add");
            return Ok(());
        }

        let records = batch
            .iter()
            .map(|metadata| {
                metadata.validate()?;
                let embedding = self
                    .encoder
                    .encode_record_text(&metadata.name, &metadata.help)?;
                Ok(MetricRecord::new(metadata.clone(), embedding))
            })
            .collect::<VectorDbResult<Vec<_>>>()?;

        self.call(
            Method::Put,
            &self.collection_url("/points?wait=true"),
            Some(&wire::upsert_body(&records)),
            "failed to upsert points",
        )?;

        info!(
            target: "promrag::qdrant",
            collection = %self.collection_name,
            count = records.len(),
            "Upserted points"
        );
        Ok(())
    }

    /// Ask the service for the `limit` nearest metrics, with scores.
    pub fn search_scored(&self, query: &str, limit: usize) -> VectorDbResult<Vec<ScoredMetric>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let vector = self.encoder.encode_query(query)?;
        let response = self.call(
            Method::Post,
            &self.collection_url("/points/query"),
            Some(&wire::query_body(&vector, limit)),
            "failed to query points",
        )?;

        let mut hits = wire::parse_query_points(&response)?;
        sort_by_relevance(&mut hits);
        hits.truncate(limit);

        debug!(
            target: "promrag::qdrant",
            collection = %self.collection_name,
            hits = hits.len(),
            limit,
            "Queried collection"
        );
        Ok(hits)
    }

    /// Metadata of the `limit` nearest metrics, best first
    pub fn search(&self, query: &str, limit: usize) -> VectorDbResult<Vec<MetricMetadata>> {
        Ok(self
            .search_scored(query, limit)?
            .into_iter()
            .map(|hit| hit.metadata)
            .collect())
    }

    /// Stop issuing requests. Closing twice is a no-op.
    pub fn close(&self) -> VectorDbResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!(
                target: "promrag::qdrant",
                collection = %self.collection_name,
                "Closed qdrant client"
            );
        }
        Ok(())
    }
}

/// The collection name is spliced into request paths, so it must stay a
/// single path segment.
fn validate_collection_segment(name: &str) -> VectorDbResult<()> {
    if name.is_empty() {
        return Err(VectorDbError::invalid_identifier(
            name,
            "collection name cannot be empty",
        ));
    }
    if name == "." || name == ".." {
        return Err(VectorDbError::invalid_identifier(
            name,
            "collection name cannot be a relative path segment",
        ));
    }
    let reserved = |c: &char| {
        matches!(*c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if let Some(c) = name.chars().find(reserved) {
        return Err(VectorDbError::invalid_identifier(
            name,
            format!("collection name cannot contain {:?}", c),
        ));
    }
    Ok(())
}

impl VectorDbClient for QdrantVectorDb {
    fn create_collection(&self) -> VectorDbResult<()> {
        QdrantVectorDb::create_collection(self)
    }

    fn delete_collection(&self) -> VectorDbResult<()> {
        QdrantVectorDb::delete_collection(self)
    }

    fn add_one(&self, metadata: &MetricMetadata) -> VectorDbResult<()> {
        QdrantVectorDb::add_one(self, metadata)
    }

    fn add_batch(&self, metadata: &[MetricMetadata]) -> VectorDbResult<()> {
        QdrantVectorDb::add_batch(self, metadata)
    }

    fn search(&self, query: &str, limit: usize) -> VectorDbResult<Vec<MetricMetadata>> {
        QdrantVectorDb::search(self, query, limit)
    }

    fn close(&self) -> VectorDbResult<()> {
        QdrantVectorDb::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use promrag_core::Encoder;

    // Never contacted: every test below returns before any request is made.
    const UNROUTABLE: &str = "http://127.0.0.1:1";

    struct PanicEncoder;

    impl Encoder for PanicEncoder {
        fn dimension(&self) -> VectorDbResult<usize> {
            Ok(4)
        }
        fn encode_query(&self, _text: &str) -> VectorDbResult<Vec<f32>> {
            panic!("encoder must not be reached")
        }
        fn encode_record_text(&self, _name: &str, _help: &str) -> VectorDbResult<Vec<f32>> {
            panic!("encoder must not be reached")
        }
    }

    fn client() -> QdrantVectorDb {
        QdrantVectorDb::new(
            QdrantConfig::new(format!("{}/", UNROUTABLE), "metrics")
                .with_timeout(Duration::from_millis(50)),
            Arc::new(PanicEncoder),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_collection_name_rejected() {
        let err = QdrantVectorDb::new(QdrantConfig::new(UNROUTABLE, ""), Arc::new(PanicEncoder))
            .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_collection_name_must_be_one_path_segment() {
        for name in ["m?x=", "a/../b", "a#frag", "..", "50%25", "two words"] {
            let err =
                QdrantVectorDb::new(QdrantConfig::new(UNROUTABLE, name), Arc::new(PanicEncoder))
                    .unwrap_err();
            assert!(
                matches!(err, VectorDbError::InvalidIdentifier { .. }),
                "{} should be rejected",
                name
            );
        }
        QdrantVectorDb::new(
            QdrantConfig::new(UNROUTABLE, "prag-metrics.v2"),
            Arc::new(PanicEncoder),
        )
        .unwrap();
    }

    #[test]
    fn test_collection_url_trims_trailing_slash() {
        let db = client();
        assert_eq!(
            db.collection_url("/exists"),
            "http://127.0.0.1:1/collections/metrics/exists"
        );
    }

    #[test]
    fn test_zero_limit_skips_round_trip() {
        assert!(client().search("anything", 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        client().add_batch(&[]).unwrap();
    }

    #[test]
    fn test_unnamed_metric_rejected_before_encoding() {
        let err = client()
            .add_one(&MetricMetadata::new("", "help", "gauge"))
            .unwrap_err();
        assert!(matches!(err, VectorDbError::Validation { .. }));
    }

    #[test]
    fn test_closed_client_refuses_requests() {
        let db = client();
        db.close().unwrap();
        db.close().unwrap();
        assert!(db.collection_exists().unwrap_err().is_backend_error());
    }
}
