//! Vector database client contract
//!
//! Implemented by the embedded SQLite backend and by the Qdrant adapter.
//! Callers hold a `Box<dyn VectorDbClient>` and never see which one they got.

use crate::error::VectorDbResult;
use crate::types::MetricMetadata;

/// Operations every vector database backend provides
pub trait VectorDbClient: Send + Sync {
    /// Ensure the collection and its indexes exist
    ///
    /// Creating a collection that already exists is a no-op.
    fn create_collection(&self) -> VectorDbResult<()>;

    /// Remove the collection and everything stored in it
    fn delete_collection(&self) -> VectorDbResult<()>;

    /// Validate, embed and upsert a single metric
    fn add_one(&self, metadata: &MetricMetadata) -> VectorDbResult<()>;

    /// Validate, embed and upsert a batch of metrics
    ///
    /// An empty batch is a no-op. Otherwise the batch is all-or-nothing.
    fn add_batch(&self, metadata: &[MetricMetadata]) -> VectorDbResult<()>;

    /// Metrics ordered by descending relevance to `query`, at most `limit`
    fn search(&self, query: &str, limit: usize) -> VectorDbResult<Vec<MetricMetadata>>;

    /// Release the underlying connection
    fn close(&self) -> VectorDbResult<()>;
}
