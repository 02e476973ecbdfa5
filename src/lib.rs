//! promrag - embedded vector similarity store for Prometheus metric metadata
//!
//! Stores metric names, help text, types and label names next to a text
//! embedding, and answers "which metrics are relevant to this question"
//! by cosine similarity.
//!
//! # Quick Start
//!
//! ```no_run
//! use promrag::{open_vector_db, MetricMetadata, VectorDbClient, VectorDbConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VectorDbConfig::default();
//! let db = open_vector_db(&config)?;
//!
//! db.add_one(&MetricMetadata::new(
//!     "http_requests_total",
//!     "Total number of HTTP requests",
//!     "counter",
//! ))?;
//!
//! for metric in db.search("http requests", 5)? {
//!     println!("{}", metric.name);
//! }
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Backends
//!
//! | Provider | Storage | Ranking |
//! |----------|---------|---------|
//! | `sqlite3` | one SQLite table per collection | brute-force cosine scan |
//! | `qdrant` | Qdrant collection over REST | server-side cosine |

#![warn(missing_docs)]

mod provider;

pub use provider::{build_encoder, open_vector_db, open_vector_db_with_encoder};

pub use promrag_core::{
    metric_id, Encoder, MetricMetadata, ScoredMetric, SharedEncoder, VectorDbClient,
    VectorDbError, VectorDbResult,
};
pub use promrag_engine::{
    ConfigError, ProviderKind, QdrantConfig, QdrantVectorDb, SqliteConfig, SqliteVectorDb,
    VectorDbConfig,
};
pub use promrag_intelligence::HashingEncoder;
pub use promrag_security::{safe_identifier, validate_identifier};
