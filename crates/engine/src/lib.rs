//! Vector storage engine for promrag
//!
//! This crate holds everything between the store facade and the bytes:
//! - codec: embedding <-> blob serialization
//! - distance / ranker: cosine scoring and brute-force top-k
//! - sqlite: embedded backend, one table per collection
//! - qdrant: remote backend over the Qdrant REST API
//! - config: `promrag.toml` and `PRAG_VECTORDB_*` overrides

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod distance;
pub mod qdrant;
pub mod ranker;
pub mod sqlite;

pub use codec::{decode_embedding, encode_embedding};
pub use config::{
    ConfigError, EncoderSection, ProviderKind, QdrantSection, SqliteSection, VectorDbConfig,
    CONFIG_FILE_NAME,
};
pub use distance::cosine_similarity;
pub use qdrant::{QdrantConfig, QdrantVectorDb};
pub use ranker::{sort_by_relevance, BruteForceRanker};
pub use sqlite::{SqliteConfig, SqliteVectorDb};
