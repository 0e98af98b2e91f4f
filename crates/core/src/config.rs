use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub router: RouterConfig,
    pub segmenter: SegmenterConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            llm: LlmConfig::from_env(),
            ollama: OllamaConfig::from_env(),
            router: RouterConfig::from_env(),
            segmenter: SegmenterConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  llm:       provider={}, configured={}",
            self.llm.provider,
            self.llm.is_configured()
        );
        tracing::info!("  ollama:    url={}", self.ollama.url);
        tracing::info!(
            "  router:    percentiles={}/{}, fuzzy_threshold={}",
            self.router.front_percentile,
            self.router.middle_percentile,
            self.router.fuzzy_threshold
        );
        tracing::info!(
            "  segmenter: chunk_max_tokens={}, skeleton_threshold={}",
            self.segmenter.chunk_max_tokens,
            self.segmenter.skeleton_threshold
        );
    }
}

// ── LLM (OpenAI-compatible / Anthropic / Ollama) ──────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "anthropic", "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Timeout applied around every collaborator call.
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env() -> Self {
        Self {
            provider: env_or("LLM_PROVIDER", "openai"),
            // DEEPSEEK_API_KEY accepted as an alias: the default backend is
            // DeepSeek's OpenAI-compatible endpoint.
            openai_api_key: env_opt("OPENAI_API_KEY").or_else(|| env_opt("DEEPSEEK_API_KEY")),
            openai_model: env_or("OPENAI_MODEL", "deepseek-chat"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.deepseek.com"),
            anthropic_api_key: env_opt("ANTHROPIC_API_KEY"),
            anthropic_model: env_or("ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            temperature: env_f64("LLM_TEMPERATURE", 0.0) as f32,
            max_tokens: env_u64("LLM_MAX_TOKENS", 4096) as u32,
            timeout_secs: env_u64("ORACLE_TIMEOUT_SECS", 120),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
}

impl OllamaConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("OLLAMA_URL", "http://localhost:11434"),
            model: env_or("OLLAMA_MODEL", "llama3.2"),
        }
    }
}

// ── Router ────────────────────────────────────────────────────

/// Empirically chosen routing constants. The percentile cut points and the
/// fuzzy-match threshold are carried as configuration, not re-derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Headings up to this fraction of the sequence feed Front stages.
    pub front_percentile: f64,
    /// Headings between the front and this fraction feed Middle stages.
    pub middle_percentile: f64,
    /// Minimum similarity ratio for the last tier of title matching.
    pub fuzzy_threshold: f64,
}

impl RouterConfig {
    fn from_env() -> Self {
        Self {
            front_percentile: env_f64("ROUTER_FRONT_PERCENTILE", 0.25),
            middle_percentile: env_f64("ROUTER_MIDDLE_PERCENTILE", 0.65),
            fuzzy_threshold: env_f64("ROUTER_FUZZY_THRESHOLD", 0.8),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            front_percentile: 0.25,
            middle_percentile: 0.65,
            fuzzy_threshold: 0.8,
        }
    }
}

// ── Segmenter ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Token budget per chunk for size-limited downstream calls.
    pub chunk_max_tokens: usize,
    /// Documents above this many chars send a skeleton to the collaborator.
    pub skeleton_threshold: usize,
    /// Segments below this many chars are logged for human audit.
    pub short_segment_warn: usize,
}

impl SegmenterConfig {
    fn from_env() -> Self {
        Self {
            chunk_max_tokens: env_usize("CHUNK_MAX_TOKENS", 8000),
            skeleton_threshold: env_usize("SKELETON_THRESHOLD", 40_000),
            short_segment_warn: env_usize("SHORT_SEGMENT_WARN", 200),
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            chunk_max_tokens: 8000,
            skeleton_threshold: 40_000,
            short_segment_warn: 200,
        }
    }
}
