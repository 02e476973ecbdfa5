//! Core types and traits for promrag
//!
//! This crate defines the foundational types used throughout the system:
//! - MetricMetadata / MetricRecord / ScoredMetric: the stored data model
//! - metric_id: deterministic record id derived from a metric name
//! - VectorDbError: error taxonomy shared by every backend
//! - Encoder: boundary to the text embedding model
//! - VectorDbClient: the contract implemented by every backend

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod encoder;
pub mod error;
pub mod types;

pub use client::VectorDbClient;
pub use encoder::{Encoder, SharedEncoder};
pub use error::{VectorDbError, VectorDbResult};
pub use types::{
    join_labels, metric_id, split_labels, MetricMetadata, MetricRecord, ScoredMetric,
    LABEL_SEPARATOR,
};
