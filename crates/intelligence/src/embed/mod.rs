//! Feature-hashing text encoder
//!
//! Each token is hashed with SHA-256: the first 8 bytes (little-endian)
//! pick a bucket, the low bit of byte 8 picks a sign. Token contributions
//! are summed and the vector is L2-normalised. Deterministic across
//! processes and platforms, and needs no model download.

pub mod tokenizer;

use promrag_core::{Encoder, VectorDbError, VectorDbResult};
use sha2::{Digest, Sha256};

/// Default embedding dimension, matching the MiniLM family.
pub const DEFAULT_DIMENSION: usize = 384;

/// Deterministic bag-of-words encoder using the hashing trick
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dimension: usize,
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
        }
    }
}

impl HashingEncoder {
    /// Create an encoder producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> VectorDbResult<Self> {
        if dimension == 0 {
            return Err(VectorDbError::Embedding(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }
        tracing::debug!(target: "promrag::encoder", dimension, "Created hashing encoder");
        Ok(Self { dimension })
    }

    /// Embed arbitrary text. Text without usable tokens maps to the zero vector.
    pub fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimension];
        for token in tokenizer::tokenize(text) {
            let (bucket, sign) = self.feature(&token);
            vector[bucket] += sign;
        }
        normalize(&mut vector);
        vector
    }

    fn feature(&self, token: &str) -> (usize, f32) {
        let digest = Sha256::digest(token.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(head) % self.dimension as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        (bucket, sign)
    }
}

fn normalize(vector: &mut [f32]) {
    let norm = vector
        .iter()
        .map(|&x| f64::from(x) * f64::from(x))
        .sum::<f64>()
        .sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x = (f64::from(*x) / norm) as f32;
        }
    }
}

impl Encoder for HashingEncoder {
    fn dimension(&self) -> VectorDbResult<usize> {
        Ok(self.dimension)
    }

    fn encode_query(&self, text: &str) -> VectorDbResult<Vec<f32>> {
        Ok(self.encode(text))
    }

    fn encode_record_text(&self, name: &str, help: &str) -> VectorDbResult<Vec<f32>> {
        Ok(self.encode(&format!("{} {}", name, help)))
    }
}
