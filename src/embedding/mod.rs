// Sentence embedding model and similarity scoring
pub const MODEL_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/model.safetensors";
pub const TOKENIZER_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json";

pub mod config;
pub mod encoder;
pub mod similarity;

pub use config::MiniLmConfig;
pub use encoder::MiniLmEncoder;
pub use similarity::{cosine_similarity, score_percentage};

use anyhow::Result;

/// A sentence-embedding model: text in, fixed-dimension dense vector out.
///
/// The model is loaded once at startup and injected wherever embeddings are
/// needed; `encode` takes `&self` and holds no per-request state, so one
/// instance may be shared across concurrent requests. Vectors are only
/// comparable when produced by the same encoder instance.
pub trait SentenceEncoder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encodes several texts in one forward pass. Output order matches
    /// input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    fn dimensions(&self) -> usize;
}
