use anyhow::{anyhow, Result};
use candle_core::{DType, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{
    BertModel, Config as BertConfig, HiddenAct, PositionEmbeddingType,
};
use std::time::Instant;
use tokenizers::Tokenizer;
use tracing::info;

use crate::embedding::{MiniLmConfig, SentenceEncoder};
use crate::TARGET_EMBEDDING;

/// The all-MiniLM-L6-v2 sentence encoder: a 6-layer BERT whose token
/// embeddings are mean-pooled over the attention mask and L2-normalized.
///
/// Loading happens exactly once, in [`MiniLmEncoder::initialize`]; encoding
/// is read-only, so one instance serves all requests.
pub struct MiniLmEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    config: MiniLmConfig,
}

fn minilm_bert_config(config: &MiniLmConfig) -> BertConfig {
    BertConfig {
        hidden_size: config.dimensions,
        intermediate_size: 1536,
        max_position_embeddings: 512,
        num_attention_heads: 12,
        num_hidden_layers: 6,
        vocab_size: 30522,
        layer_norm_eps: 1e-12,
        pad_token_id: 0,
        hidden_act: HiddenAct::Gelu,
        hidden_dropout_prob: 0.0,
        type_vocab_size: 2,
        initializer_range: 0.02,
        position_embedding_type: PositionEmbeddingType::Absolute,
        use_cache: false,
        classifier_dropout: None,
        model_type: None,
    }
}

impl MiniLmEncoder {
    /// Loads the model weights and tokenizer from disk.
    ///
    /// Fails fast when either file is missing: downloading is the explicit
    /// job of [`MiniLmConfig::ensure_models_exist`], never a side effect of
    /// first use.
    pub fn initialize(config: MiniLmConfig) -> Result<Self> {
        if !config.model_path.exists() || !config.tokenizer_path.exists() {
            return Err(anyhow!(
                "embedding model resources not found at {} / {}; run ensure_models_exist() first",
                config.model_path.display(),
                config.tokenizer_path.display()
            ));
        }

        let start = Instant::now();
        info!(target: TARGET_EMBEDDING, "Loading MiniLM model from {}", config.model_path.display());

        let tensors = candle_core::safetensors::load_buffer(
            &std::fs::read(&config.model_path)?,
            &config.device,
        )
        .map_err(|e| anyhow!("failed to load model tensors: {}", e))?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &config.device);
        let model = BertModel::load(vb, &minilm_bert_config(&config))
            .map_err(|e| anyhow!("failed to load BERT model: {}", e))?;

        let tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| anyhow!("failed to load tokenizer: {}", e))?;

        info!(target: TARGET_EMBEDDING, "MiniLM ready in {:?}", start.elapsed());

        Ok(Self {
            model,
            tokenizer,
            config,
        })
    }

    /// Runs one forward pass over a padded batch and mean-pools each row
    /// into a normalized sentence vector.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow!("tokenization failed: {}", e))?;

        // Truncate to the model's sequence limit, pad to the batch maximum
        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len().min(self.config.max_length))
            .max()
            .unwrap_or(1)
            .max(1);

        let batch = encodings.len();
        let mut ids: Vec<i64> = Vec::with_capacity(batch * max_len);
        let mut mask: Vec<i64> = Vec::with_capacity(batch * max_len);
        for encoding in &encodings {
            let row_ids: Vec<i64> = encoding
                .get_ids()
                .iter()
                .take(self.config.max_length)
                .map(|&x| x as i64)
                .collect();
            let row_mask: Vec<i64> = encoding
                .get_attention_mask()
                .iter()
                .take(self.config.max_length)
                .map(|&x| x as i64)
                .collect();
            let pad = max_len - row_ids.len();
            ids.extend(row_ids);
            ids.extend(std::iter::repeat(0).take(pad));
            mask.extend(row_mask);
            mask.extend(std::iter::repeat(0).take(pad));
        }

        let tokenized = Instant::now();

        let input_ids = Tensor::from_vec(ids, (batch, max_len), &self.config.device)?;
        let attention_mask = Tensor::from_vec(mask, (batch, max_len), &self.config.device)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden_state = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling: zero out padding positions, sum, divide by the
        // number of real tokens
        let attention_mask_float = attention_mask.to_dtype(DType::F32)?;
        let attention_mask_expanded = attention_mask_float
            .unsqueeze(2)?
            .expand(hidden_state.shape())?;
        let masked_hidden = hidden_state.mul(&attention_mask_expanded)?;
        let summed_hidden = masked_hidden.sum(1)?;

        let valid_token_counts = attention_mask_float
            .sum(1)?
            .unsqueeze(1)?
            .clamp(1.0, f32::MAX)?;
        let valid_token_counts_expanded = valid_token_counts.expand(summed_hidden.shape())?;
        let mean_pooled = summed_hidden.div(&valid_token_counts_expanded)?;

        // L2 normalization
        let norm = mean_pooled.sqr()?.sum(1)?.sqrt()?.unsqueeze(1)?;
        let norm_expanded = norm.expand(mean_pooled.shape())?;
        let normalized = mean_pooled.div(&norm_expanded)?;

        let vectors = normalized.to_vec2::<f32>()?;

        for vector in &vectors {
            if vector.len() != self.config.dimensions {
                return Err(anyhow!(
                    "unexpected embedding dimensions: got {}, expected {}",
                    vector.len(),
                    self.config.dimensions
                ));
            }
        }

        info!(target: TARGET_EMBEDDING,
            "Encoded {} text(s): tokenization {:?}; inference {:?}; max sequence length {}",
            batch,
            tokenized.duration_since(start),
            tokenized.elapsed(),
            max_len
        );

        Ok(vectors)
    }
}

impl SentenceEncoder for MiniLmEncoder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| anyhow!("encoder produced no output"))
    }

    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}
