use anyhow::Result;
use candle_core::Device;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::embedding::{MODEL_URL, TOKENIZER_URL};
use crate::TARGET_EMBEDDING;

/// Environment variable overriding where model files live.
pub const MODEL_DIR_ENV: &str = "VITAE_MODEL_DIR";

/// Configuration for the MiniLM sentence-embedding model.
pub struct MiniLmConfig {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub dimensions: usize,
    pub max_length: usize,
    pub device: Device,
}

impl Default for MiniLmConfig {
    fn default() -> Self {
        Self::with_model_dir(Path::new("models"))
    }
}

impl MiniLmConfig {
    pub fn with_model_dir(dir: &Path) -> Self {
        Self {
            model_path: dir.join("all-minilm-l6-v2.safetensors"),
            tokenizer_path: dir.join("minilm-tokenizer.json"),
            dimensions: 384,
            max_length: 256,
            device: Device::Cpu,
        }
    }

    /// Reads the model directory from `VITAE_MODEL_DIR`, falling back to
    /// `models/` next to the working directory.
    pub fn from_env() -> Self {
        match env::var(MODEL_DIR_ENV) {
            Ok(dir) => Self::with_model_dir(Path::new(&dir)),
            Err(_) => Self::default(),
        }
    }

    /// Downloads the model weights and tokenizer if they are not already on
    /// disk. This is an explicit startup step: encoder initialization does
    /// not download anything and fails fast when these files are absent.
    pub async fn ensure_models_exist(&self) -> Result<()> {
        if let Some(parent) = self.model_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        if !self.model_path.exists() {
            info!(target: TARGET_EMBEDDING, "Downloading MiniLM model from {}", MODEL_URL);
            let response = reqwest::get(MODEL_URL).await?.error_for_status()?;
            let bytes = response.bytes().await?;
            fs::write(&self.model_path, bytes).await?;
            info!(target: TARGET_EMBEDDING, "Downloaded MiniLM model to {}", self.model_path.display());
        }

        if !self.tokenizer_path.exists() {
            info!(target: TARGET_EMBEDDING, "Downloading MiniLM tokenizer from {}", TOKENIZER_URL);
            let response = reqwest::get(TOKENIZER_URL).await?.error_for_status()?;
            let bytes = response.bytes().await?;
            fs::write(&self.tokenizer_path, bytes).await?;
            info!(target: TARGET_EMBEDDING, "Downloaded MiniLM tokenizer to {}", self.tokenizer_path.display());
        }

        Ok(())
    }
}
