//! Configuration management for PaperGraph services
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Conventional provider variables (MISTRAL_API_KEY, NEO4J_*)
//! - Configuration files (config/default, config/{APP_ENV}, config/local)
//! - Default values
//!
//! The loaded [`AppConfig`] is passed explicitly to each component
//! constructor; nothing below reads the environment after startup.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
///
/// Missing sections fall back to [`AppConfig::default`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Graph store (Neo4j) configuration
    pub graph: GraphConfig,

    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,

    /// Completion provider configuration
    pub completion: CompletionConfig,

    /// Search pipeline configuration
    pub search: SearchConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GraphConfig {
    /// Graph store backend: neo4j, memory
    #[serde(default = "default_graph_backend")]
    pub backend: String,

    /// Neo4j HTTP endpoint
    #[serde(default = "default_graph_uri")]
    pub uri: String,

    /// Neo4j user
    #[serde(default = "default_graph_user")]
    pub user: String,

    /// Neo4j password
    #[serde(default = "default_graph_password")]
    pub password: String,

    /// Database name
    #[serde(default = "default_graph_database")]
    pub database: String,

    /// Query timeout in seconds
    #[serde(default = "default_graph_timeout")]
    pub timeout_secs: u64,

    /// JSON fixture loaded by the memory backend
    pub seed_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: mistral, mock
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// API key for embedding service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension, also the length of the fallback zero vector
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompletionConfig {
    /// API key for completion service
    pub api_key: Option<String>,

    /// API base URL (for custom endpoints)
    pub api_base: Option<String>,

    /// Model to use
    #[serde(default = "default_completion_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// Output token cap for summaries
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Sampling temperature for summaries
    #[serde(default = "default_summary_temperature")]
    pub summary_temperature: f32,

    /// Output token cap for similarity analysis
    #[serde(default = "default_analysis_max_tokens")]
    pub analysis_max_tokens: u32,

    /// Sampling temperature for similarity analysis
    #[serde(default = "default_analysis_temperature")]
    pub analysis_temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Results returned when the caller gives no top_k
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Largest top_k a caller may request
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Generate summaries unless the request says otherwise
    #[serde(default = "default_enabled")]
    pub summarize: bool,

    /// Maximum enrichments in flight per search (1 = sequential)
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Metrics port (0 to disable)
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 120 }
fn default_graph_backend() -> String { "neo4j".to_string() }
fn default_graph_uri() -> String { "http://localhost:7474".to_string() }
fn default_graph_user() -> String { "neo4j".to_string() }
fn default_graph_password() -> String { "password".to_string() }
fn default_graph_database() -> String { "neo4j".to_string() }
fn default_graph_timeout() -> u64 { 30 }
fn default_embedding_provider() -> String { "mistral".to_string() }
fn default_embedding_model() -> String { crate::DEFAULT_EMBEDDING_MODEL.to_string() }
fn default_embedding_dimension() -> usize { crate::DEFAULT_EMBEDDING_DIMENSION }
fn default_provider_timeout() -> u64 { 30 }
fn default_completion_model() -> String { crate::DEFAULT_COMPLETION_MODEL.to_string() }
fn default_summary_max_tokens() -> u32 { 300 }
fn default_summary_temperature() -> f32 { 0.3 }
fn default_analysis_max_tokens() -> u32 { 400 }
fn default_analysis_temperature() -> f32 { 0.4 }
fn default_top_k() -> usize { 10 }
fn default_max_top_k() -> usize { 20 }
fn default_enrichment_concurrency() -> usize { 1 }
fn default_log_level() -> String { "info".to_string() }
fn default_json_logging() -> bool { true }
fn default_metrics_port() -> u16 { 9090 }
fn default_service_name() -> String { "papergraph".to_string() }
fn default_enabled() -> bool { true }

impl AppConfig {
    /// Load configuration from environment and files
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?

            // Load base config file
            .add_source(File::with_name("config/default").required(false))

            // Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))

            // Load local overrides
            .add_source(File::with_name("config/local").required(false))

            // Load from environment variables with APP__ prefix
            // e.g., APP__SEARCH__DEFAULT_TOP_K=5
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
            )

            // One Mistral key serves both providers
            .set_override_option("embedding.api_key", std::env::var("MISTRAL_API_KEY").ok())?
            .set_override_option("completion.api_key", std::env::var("MISTRAL_API_KEY").ok())?
            .set_override_option("graph.uri", std::env::var("NEO4J_URI").ok())?
            .set_override_option("graph.user", std::env::var("NEO4J_USER").ok())?
            .set_override_option("graph.password", std::env::var("NEO4J_PASSWORD").ok())?

            .build()?;

        config.try_deserialize()
    }

    /// Outer timeout for one HTTP request.
    ///
    /// The configured server timeout is added on top of [`AppConfig::search_budget`],
    /// so every provider call inside a search reaches its own timeout and
    /// fallback before the request as a whole is cancelled.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs) + self.search_budget()
    }

    /// Worst-case duration of one search when every provider call times out:
    /// the embedding call, the similarity query, then a summary and an
    /// analysis per result in rounds of `enrichment_concurrency`.
    pub fn search_budget(&self) -> Duration {
        let concurrency = self.search.enrichment_concurrency.max(1) as u64;
        let rounds = (self.search.max_top_k as u64).div_ceil(concurrency);
        let per_result = self.completion.timeout_secs.saturating_mul(2);

        Duration::from_secs(
            self.embedding
                .timeout_secs
                .saturating_add(self.graph.timeout_secs)
                .saturating_add(rounds.saturating_mul(per_result)),
        )
    }
}

impl EmbeddingConfig {
    /// Base URL without trailing slash (falls back to the Mistral API)
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(crate::DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

impl CompletionConfig {
    /// Base URL without trailing slash (falls back to the Mistral API)
    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or(crate::DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
                request_timeout_secs: default_request_timeout(),
            },
            graph: GraphConfig {
                backend: default_graph_backend(),
                uri: default_graph_uri(),
                user: default_graph_user(),
                password: default_graph_password(),
                database: default_graph_database(),
                timeout_secs: default_graph_timeout(),
                seed_file: None,
            },
            embedding: EmbeddingConfig {
                provider: default_embedding_provider(),
                api_key: None,
                api_base: None,
                model: default_embedding_model(),
                dimension: default_embedding_dimension(),
                timeout_secs: default_provider_timeout(),
            },
            completion: CompletionConfig {
                api_key: None,
                api_base: None,
                model: default_completion_model(),
                timeout_secs: default_provider_timeout(),
                summary_max_tokens: default_summary_max_tokens(),
                summary_temperature: default_summary_temperature(),
                analysis_max_tokens: default_analysis_max_tokens(),
                analysis_temperature: default_analysis_temperature(),
            },
            search: SearchConfig {
                default_top_k: default_top_k(),
                max_top_k: default_max_top_k(),
                summarize: default_enabled(),
                enrichment_concurrency: default_enrichment_concurrency(),
            },
            observability: ObservabilityConfig {
                log_level: default_log_level(),
                json_logging: default_json_logging(),
                metrics_port: default_metrics_port(),
                service_name: default_service_name(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.embedding.model, "mistral-embed");
        assert_eq!(config.embedding.dimension, 1024);
        assert_eq!(config.search.default_top_k, 10);
        assert_eq!(config.search.enrichment_concurrency, 1);
    }

    #[test]
    fn test_request_timeout_covers_search_budget() {
        let mut config = AppConfig::default();
        // 30s embedding + 30s graph + 20 results x 2 calls x 30s
        assert_eq!(config.search_budget(), Duration::from_secs(1260));
        assert_eq!(config.request_timeout(), Duration::from_secs(1380));

        config.search.enrichment_concurrency = 3;
        // ceil(20 / 3) = 7 rounds
        assert_eq!(config.search_budget(), Duration::from_secs(30 + 30 + 7 * 60));

        config.search.enrichment_concurrency = 0;
        assert_eq!(config.search_budget(), Duration::from_secs(1260));
    }

    #[test]
    fn test_api_base_fallback() {
        let mut config = AppConfig::default();
        assert_eq!(config.embedding.api_base(), "https://api.mistral.ai/v1");

        config.completion.api_base = Some("http://localhost:11434/v1/".to_string());
        assert_eq!(config.completion.api_base(), "http://localhost:11434/v1");
    }

    #[test]
    fn test_sections_fill_in_defaults() {
        let config: AppConfig = Config::builder()
            .set_default("server.port", 9000)
            .unwrap()
            .set_default("graph.uri", "http://neo4j:7474")
            .unwrap()
            .set_default("embedding.provider", "mock")
            .unwrap()
            .set_default("completion.model", "mistral-large-latest")
            .unwrap()
            .set_default("search.max_top_k", 50)
            .unwrap()
            .set_default("observability.json_logging", false)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.graph.uri, "http://neo4j:7474");
        assert_eq!(config.graph.database, "neo4j");
        assert_eq!(config.embedding.dimension, 1024);
        assert_eq!(config.completion.summary_max_tokens, 300);
        assert_eq!(config.search.max_top_k, 50);
        assert_eq!(config.search.default_top_k, 10);
        assert!(!config.observability.json_logging);
    }
}
