use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
    /// Chunking and retrieval settings
    pub retrieval: RetrievalConfig,
    /// Maximum number of live document sessions; the oldest is evicted beyond this
    pub max_sessions: usize,
    /// Maximum upload size in MB
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "ollama" or "openai"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for summaries, answers and quizzes
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum characters per chunk
    pub chunk_size: usize,
    /// Characters carried over between consecutive chunks
    pub chunk_overlap: usize,
    /// Passages retrieved per question
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9000".to_string(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            max_sessions: 32,
            max_upload_mb: 20,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: "http://localhost:11434".to_string(),
            chat_model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            api_key: None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("RESEARCH_ASSISTANT_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(val) = std::env::var("RESEARCH_ASSISTANT_MAX_SESSIONS") {
            if let Ok(v) = val.parse::<usize>() {
                config.max_sessions = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_ASSISTANT_MAX_UPLOAD_MB") {
            if let Ok(v) = val.parse() {
                config.max_upload_mb = v;
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_ASSISTANT_CHUNK_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.retrieval.chunk_size = v.max(1);
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_ASSISTANT_CHUNK_OVERLAP") {
            if let Ok(v) = val.parse() {
                config.retrieval.chunk_overlap = v;
            }
        }
        if let Ok(val) = std::env::var("RESEARCH_ASSISTANT_TOP_K") {
            if let Ok(v) = val.parse::<usize>() {
                config.retrieval.top_k = v.max(1);
            }
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("LLM_CHAT_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("LLM_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        // GROQ_API_KEY is accepted for OpenAI-compatible Groq deployments
        if let Ok(key) = std::env::var("LLM_API_KEY").or_else(|_| std::env::var("GROQ_API_KEY")) {
            config.llm.api_key = Some(key);
        }

        // Overlap must leave room for new text in every chunk
        if config.retrieval.chunk_overlap >= config.retrieval.chunk_size {
            config.retrieval.chunk_overlap = config.retrieval.chunk_size / 10;
        }

        config
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
