//! FNV-1a hashing embedder.
//!
//! Each lowercase alphanumeric token hashes to one dimension with a sign taken
//! from the hash's high bit. Captures lexical overlap only, but is
//! deterministic and needs no model download.

use anyhow::Result;

use super::{l2_normalize, EmbeddingProvider, EMBEDDING_DIM};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Tokens shorter than this are dropped.
const MIN_TOKEN_LEN: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct HashEmbeddingProvider;

impl HashEmbeddingProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; EMBEDDING_DIM];
        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let index = (hash % EMBEDDING_DIM as u64) as usize;
            let sign = if hash >> 63 == 1 { 1.0 } else { -1.0 };
            v[index] += sign;
        }
        l2_normalize(&v)
    }
}

impl EmbeddingProvider for HashEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn model_id(&self) -> &str {
        "fnv1a-384"
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
