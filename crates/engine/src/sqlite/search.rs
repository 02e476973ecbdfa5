//! Full-scan similarity search and point lookups

use promrag_core::{split_labels, MetricMetadata, ScoredMetric, VectorDbError, VectorDbResult};
use rusqlite::types::ValueRef;
use rusqlite::{OptionalExtension, Row};
use tracing::{debug, warn};

use super::SqliteVectorDb;
use crate::codec::decode_embedding;
use crate::ranker::BruteForceRanker;

fn row_metadata(row: &Row<'_>) -> rusqlite::Result<MetricMetadata> {
    let name: String = row.get(1)?;
    let help: Option<String> = row.get(2)?;
    let metric_type: Option<String> = row.get(3)?;
    let labels: Option<String> = row.get(4)?;
    Ok(MetricMetadata {
        name,
        help: help.unwrap_or_default(),
        metric_type: metric_type.unwrap_or_default(),
        labels: labels.as_deref().map(split_labels).unwrap_or_default(),
    })
}

impl SqliteVectorDb {
    /// Rank every stored metric against `query` and return the best `limit`
    /// together with their cosine scores.
    ///
    /// Rows whose embedding cannot be decoded are logged and skipped.
    pub fn search_scored(&self, query: &str, limit: usize) -> VectorDbResult<Vec<ScoredMetric>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.encoder.encode_query(query)?;
        let sql = format!(
            "SELECT id, name, help, type, labels, embedding FROM {} ORDER BY name",
            self.table
        );

        let mut ranker = BruteForceRanker::new(&query_vec);
        let mut skipped = 0usize;

        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| VectorDbError::backend("failed to prepare search", e))?;
            let mut rows = stmt
                .query([])
                .map_err(|e| VectorDbError::backend("failed to search", e))?;

            while let Some(row) = rows
                .next()
                .map_err(|e| VectorDbError::backend("failed to read search row", e))?
            {
                let metadata = row_metadata(row)
                    .map_err(|e| VectorDbError::backend("failed to scan row", e))?;

                let embedding = match row.get_ref(5) {
                    Ok(ValueRef::Blob(blob)) => decode_embedding(blob),
                    Ok(other) => Err(VectorDbError::Encoding(format!(
                        "embedding column holds {:?} instead of a blob",
                        other.data_type()
                    ))),
                    Err(e) => Err(VectorDbError::backend("failed to read embedding", e)),
                };

                match embedding {
                    Ok(embedding) => ranker.push(metadata, &embedding),
                    Err(e) => {
                        skipped += 1;
                        warn!(
                            target: "promrag::sqlite",
                            name = %metadata.name,
                            error = %e,
                            "Skipping row with undecodable embedding"
                        );
                    }
                }
            }
            Ok(())
        })?;

        debug!(
            target: "promrag::sqlite",
            collection = %self.collection_name,
            scanned = ranker.len(),
            skipped,
            limit,
            "Ranked collection"
        );
        Ok(ranker.finish(limit))
    }

    /// Return the metadata of the `limit` stored metrics most similar to
    /// `query`, best first.
    pub fn search(&self, query: &str, limit: usize) -> VectorDbResult<Vec<MetricMetadata>> {
        Ok(self
            .search_scored(query, limit)?
            .into_iter()
            .map(|hit| hit.metadata)
            .collect())
    }

    /// Fetch one stored metric by name
    pub fn get(&self, name: &str) -> VectorDbResult<Option<MetricMetadata>> {
        let sql = format!(
            "SELECT id, name, help, type, labels FROM {} WHERE name = ?1",
            self.table
        );
        self.with_conn(|conn| {
            conn.query_row(&sql, [name], row_metadata)
                .optional()
                .map_err(|e| VectorDbError::backend("failed to get metadata", e))
        })
    }

    /// Number of stored metrics
    pub fn count(&self) -> VectorDbResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row(&sql, [], |row| row.get(0))
                .map_err(|e| VectorDbError::backend("failed to count metadata", e))?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
    }
}
