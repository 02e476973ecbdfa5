//! Text encoder boundary
//!
//! The store never embeds text itself. It asks an [`Encoder`] for a vector
//! when a metric is added and when a query is searched.

use std::sync::Arc;

use crate::error::VectorDbResult;

/// Turns text into fixed-dimension embeddings
pub trait Encoder: Send + Sync {
    /// Length of every vector this encoder produces
    fn dimension(&self) -> VectorDbResult<usize>;

    /// Embed a natural-language query
    fn encode_query(&self, query: &str) -> VectorDbResult<Vec<f32>>;

    /// Embed the fused text of a metric's name and help
    fn encode_record_text(&self, name: &str, help: &str) -> VectorDbResult<Vec<f32>>;
}

/// Encoder shared between a provider and the backend it builds
pub type SharedEncoder = Arc<dyn Encoder>;
