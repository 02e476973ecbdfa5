//! Embedding blob codec
//!
//! Embeddings are stored as little-endian IEEE-754 `f32` values laid out
//! back to back, 4 bytes per component. No header, no dimension prefix:
//! the dimension is implied by the blob length.

use byteorder::{ByteOrder, LittleEndian};
use promrag_core::{VectorDbError, VectorDbResult};

/// Bytes per stored component
pub const F32_SIZE: usize = std::mem::size_of::<f32>();

/// Serialize an embedding into its blob form
///
/// Output length is always `4 * embedding.len()`.
pub fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    let mut buf = vec![0u8; embedding.len() * F32_SIZE];
    LittleEndian::write_f32_into(embedding, &mut buf);
    buf
}

/// Deserialize a blob produced by [`encode_embedding`]
///
/// Fails with `Encoding` when the length is not a multiple of 4.
pub fn decode_embedding(data: &[u8]) -> VectorDbResult<Vec<f32>> {
    if data.len() % F32_SIZE != 0 {
        return Err(VectorDbError::Encoding(format!(
            "invalid embedding data length: {} is not a multiple of {}",
            data.len(),
            F32_SIZE
        )));
    }

    let mut embedding = vec![0f32; data.len() / F32_SIZE];
    LittleEndian::read_f32_into(data, &mut embedding);
    Ok(embedding)
}
