//! Upserts into the collection table

use promrag_core::{MetricMetadata, MetricRecord, VectorDbError, VectorDbResult};
use promrag_security::QuotedIdentifier;
use rusqlite::params;
use tracing::{debug, info};

use super::SqliteVectorDb;
use crate::codec::encode_embedding;

fn insert_sql(table: &QuotedIdentifier) -> String {
    format!(
        "INSERT OR REPLACE INTO {} (id, name, help, type, labels, embedding) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        table
    )
}

impl SqliteVectorDb {
    fn prepare_record(&self, metadata: &MetricMetadata) -> VectorDbResult<MetricRecord> {
        metadata.validate()?;
        let embedding = self
            .encoder
            .encode_record_text(&metadata.name, &metadata.help)?;
        Ok(MetricRecord::new(metadata.clone(), embedding))
    }

    /// Insert or replace a single metric, keyed by its name.
    pub fn add_one(&self, metadata: &MetricMetadata) -> VectorDbResult<()> {
        let record = self.prepare_record(metadata)?;
        let sql = insert_sql(&self.table);

        self.with_conn(|conn| {
            conn.execute(
                &sql,
                params![
                    record.id,
                    record.metadata.name,
                    record.metadata.help,
                    record.metadata.metric_type,
                    record.metadata.joined_labels(),
                    encode_embedding(&record.embedding),
                ],
            )
            .map_err(|e| VectorDbError::backend("failed to add metadata", e))?;
            Ok(())
        })?;

        debug!(
            target: "promrag::sqlite",
            collection = %self.collection_name,
            name = %metadata.name,
            "Upserted metric"
        );
        Ok(())
    }

    /// Insert or replace a batch of metrics atomically.
    ///
    /// Either every item is stored or none is: the first invalid item,
    /// encoder failure or statement error aborts the transaction.
    pub fn add_batch(&self, batch: &[MetricMetadata]) -> VectorDbResult<()> {
        if batch.is_empty() {
            debug!(target: "promrag::sqlite", "Empty batch, nothing to add");
            return Ok(());
        }

        let sql = insert_sql(&self.table);
        self.with_conn(|conn| {
            // Dropping `tx` without commit rolls back.
            let tx = conn
                .transaction()
                .map_err(|e| VectorDbError::backend("failed to begin transaction", e))?;
            {
                let mut stmt = tx
                    .prepare(&sql)
                    .map_err(|e| VectorDbError::backend("failed to prepare statement", e))?;
                for metadata in batch {
                    let record = self.prepare_record(metadata)?;
                    stmt.execute(params![
                        record.id,
                        record.metadata.name,
                        record.metadata.help,
                        record.metadata.metric_type,
                        record.metadata.joined_labels(),
                        encode_embedding(&record.embedding),
                    ])
                    .map_err(|e| {
                        VectorDbError::backend(
                            format!("failed to add metadata '{}'", metadata.name),
                            e,
                        )
                    })?;
                }
            }
            tx.commit()
                .map_err(|e| VectorDbError::backend("failed to commit transaction", e))?;
            Ok(())
        })?;

        info!(
            target: "promrag::sqlite",
            collection = %self.collection_name,
            count = batch.len(),
            "Added metric batch"
        );
        Ok(())
    }
}
