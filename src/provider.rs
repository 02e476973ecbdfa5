//! Backend selection
//!
//! The encoder is built once from configuration and shared with whichever
//! backend the provider tag selects.

use std::sync::Arc;
use std::time::Duration;

use promrag_core::{SharedEncoder, VectorDbClient, VectorDbResult};
use promrag_engine::{
    ProviderKind, QdrantConfig, QdrantVectorDb, SqliteConfig, SqliteVectorDb, VectorDbConfig,
};
use promrag_intelligence::HashingEncoder;
use tracing::info;

/// Build the encoder described by `config.encoder`.
pub fn build_encoder(config: &VectorDbConfig) -> VectorDbResult<SharedEncoder> {
    Ok(Arc::new(HashingEncoder::new(config.encoder.dimension)?))
}

/// Open the backend named by `config.provider` with a freshly built encoder.
///
/// Unknown provider tags fail with `UnsupportedProvider` before the encoder
/// or any backend is constructed.
pub fn open_vector_db(config: &VectorDbConfig) -> VectorDbResult<Box<dyn VectorDbClient>> {
    config.provider_kind()?;
    let encoder = build_encoder(config)?;
    open_vector_db_with_encoder(config, encoder)
}

/// Open the backend named by `config.provider`, bound to `encoder`.
pub fn open_vector_db_with_encoder(
    config: &VectorDbConfig,
    encoder: SharedEncoder,
) -> VectorDbResult<Box<dyn VectorDbClient>> {
    let kind = config.provider_kind()?;
    info!(
        target: "promrag::provider",
        provider = kind.as_str(),
        collection = %config.collection,
        "Opening vector database"
    );

    match kind {
        ProviderKind::Sqlite3 => {
            let sqlite =
                SqliteConfig::new(config.sqlite3.db_path.clone(), config.collection.clone());
            Ok(Box::new(SqliteVectorDb::open(sqlite, encoder)?))
        }
        ProviderKind::Qdrant => {
            let mut qdrant = QdrantConfig::new(config.qdrant_url(), config.collection.clone())
                .with_timeout(Duration::from_millis(config.qdrant.timeout_ms));
            if let Some(key) = &config.qdrant.api_key {
                qdrant = qdrant.with_api_key(key.clone());
            }
            Ok(Box::new(QdrantVectorDb::open(qdrant, encoder)?))
        }
    }
}
