//! Embedding service abstraction
//!
//! Provides a unified interface for embedding providers:
//! - Mistral (mistral-embed) and other OpenAI-compatible `/embeddings` APIs
//! - A deterministic hashing embedder for tests and offline development
//!
//! Provider failures never reach the caller. A failed request yields a zero
//! vector of the configured dimension, which scores 0 against every paper.
//! The one error `embed` does return is a missing API key.

use crate::config::EmbeddingConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Trait for embedding generation
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate the embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;
}

/// Mistral embedding client (OpenAI-compatible wire format)
pub struct MistralEmbedder {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    dimension: usize,
    base_url: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl MistralEmbedder {
    /// Create a new embedder from configuration
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            model: config.model.clone(),
            dimension: config.dimension,
            base_url: config.api_base().to_string(),
        })
    }

    /// The vector returned when the provider cannot be reached
    pub fn zero_vector(&self) -> Vec<f32> {
        vec![0.0; self.dimension]
    }

    async fn make_request(&self, api_key: &str, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Embedding {
                message: format!("Request failed: {}", e),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding {
                message: format!("API error {}: {}", status, body),
            });
        }

        let result: EmbeddingResponse = response.json().await.map_err(|e| AppError::Embedding {
            message: format!("Failed to parse response: {}", e),
        })?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| AppError::Embedding {
                message: "Empty response".to_string(),
            })
    }
}

#[async_trait]
impl Embedder for MistralEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::MissingCredential {
                provider: "embedding".to_string(),
                variable: "MISTRAL_API_KEY".to_string(),
            })?;

        let start = Instant::now();
        match self.make_request(api_key, text).await {
            Ok(embedding) => {
                metrics::record_embedding(start.elapsed().as_secs_f64(), &self.model, true);
                if embedding.len() != self.dimension {
                    tracing::warn!(
                        expected = self.dimension,
                        actual = embedding.len(),
                        model = %self.model,
                        "Embedding dimension differs from configuration"
                    );
                }
                Ok(embedding)
            }
            Err(e) => {
                metrics::record_embedding(start.elapsed().as_secs_f64(), &self.model, false);
                tracing::warn!(
                    error = %e,
                    model = %self.model,
                    dimension = self.dimension,
                    "Embedding request failed, using zero vector"
                );
                Ok(self.zero_vector())
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Deterministic bag-of-words embedder for testing.
///
/// Each lowercase token is hashed into one of `dimension` buckets, so equal
/// texts map to equal vectors and texts sharing words score above zero.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Synchronous form of [`Embedder::embed`], handy for seeding test corpora
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimension];
        if self.dimension == 0 {
            return vector;
        }

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector_for(text))
    }

    fn model_name(&self) -> &str {
        "hashing-embedding"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Create an embedder based on configuration
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.provider.as_str() {
        "mistral" | "openai" => Ok(Arc::new(MistralEmbedder::new(config)?)),
        "mock" => Ok(Arc::new(HashingEmbedder::new(config.dimension))),
        other => Err(AppError::Configuration {
            message: format!("Unknown embedding provider: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tokio_test::{assert_err, assert_ok};

    fn unreachable_config() -> EmbeddingConfig {
        let mut config = AppConfig::default().embedding;
        // Nothing listens on the discard port
        config.api_base = Some("http://127.0.0.1:9/v1".to_string());
        config.api_key = Some("test-key".to_string());
        config.timeout_secs = 2;
        config
    }

    #[tokio::test]
    async fn test_unreachable_provider_returns_zero_vector() {
        let embedder = MistralEmbedder::new(&unreachable_config()).unwrap();

        let embedding = embedder.embed("graph neural networks").await.unwrap();

        assert_eq!(embedding.len(), 1024);
        assert!(embedding.iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_an_error() {
        let mut config = unreachable_config();
        config.api_key = None;
        let embedder = MistralEmbedder::new(&config).unwrap();

        let result = embedder.embed("anything").await;

        assert!(matches!(result, Err(AppError::MissingCredential { .. })));
    }

    #[tokio::test]
    async fn test_empty_api_key_counts_as_missing() {
        let mut config = unreachable_config();
        config.api_key = Some(String::new());
        let embedder = MistralEmbedder::new(&config).unwrap();

        assert_err!(embedder.embed("anything").await);
    }

    #[tokio::test]
    async fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::new(64);
        let a = assert_ok!(embedder.embed("Graph Neural Networks").await);
        let b = assert_ok!(embedder.embed("graph neural networks").await);

        assert_eq!(a.len(), 64);
        assert_eq!(a, b);
        assert_eq!(a.iter().sum::<f32>(), 3.0);
    }

    #[test]
    fn test_hashing_embedder_empty_text() {
        let embedder = HashingEmbedder::new(16);
        assert!(embedder.vector_for("").iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_create_embedder() {
        let mut config = AppConfig::default().embedding;
        config.provider = "mock".to_string();
        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.dimension(), 1024);

        config.provider = "word2vec".to_string();
        assert!(create_embedder(&config).is_err());
    }
}
