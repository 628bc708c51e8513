//! Configuration settings for Ragdesk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub openai: OpenAISettings,
    pub embedding: EmbeddingSettings,
    pub vector_store: VectorStoreSettings,
    pub retrieval: RetrievalSettings,
    pub completion: CompletionSettings,
    pub transcription: TranscriptionSettings,
    pub normalize: NormalizeSettings,
    pub rag: RagSettings,
    pub ingest: IngestSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.ragdesk".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum request body size, which bounds uploaded audio clips.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3308,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// OpenAI client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Alternative API base URL (for compatible proxies).
    pub api_base: Option<String>,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
            api_base: None,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions. `None` keeps the model's native size.
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimensions: None,
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Path to SQLite database (for sqlite provider).
    pub sqlite_path: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            sqlite_path: "~/.ragdesk/vectors.db".to_string(),
        }
    }
}

/// Similarity search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Minimum cosine similarity for a document to be returned.
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

/// Chat completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    /// Upper bound on generated tokens. `None` leaves it to the API.
    pub max_tokens: Option<u32>,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.1,
            max_tokens: None,
        }
    }
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub model: String,
    /// Logical filename sent with uploaded clips; the API infers the codec from it.
    pub filename_hint: String,
    /// Optional ISO-639-1 language hint.
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            filename_hint: "transcript.wav".to_string(),
            language: None,
        }
    }
}

/// Target script for generated and transcribed text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    /// Convert simplified Chinese to traditional Chinese.
    #[default]
    Traditional,
    /// Leave text untouched.
    None,
}

impl std::str::FromStr for ScriptTarget {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "traditional" | "zh-hant" | "s2t" => Ok(ScriptTarget::Traditional),
            "none" | "off" => Ok(ScriptTarget::None),
            _ => Err(format!("Unknown script target: {}", s)),
        }
    }
}

impl std::fmt::Display for ScriptTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptTarget::Traditional => write!(f, "traditional"),
            ScriptTarget::None => write!(f, "none"),
        }
    }
}

/// Script normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NormalizeSettings {
    pub script: ScriptTarget,
}

/// Answer pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Active answer profile (registrar, global_affairs).
    pub profile: String,
    /// Override the profile's result count.
    pub k: Option<usize>,
    /// Keep only the most recent N turns in the prompt.
    pub max_history_turns: Option<usize>,
    /// Upper bound on the assembled context, in characters.
    pub max_context_chars: Option<usize>,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            profile: "registrar".to_string(),
            k: None,
            max_history_turns: Some(20),
            max_context_chars: Some(48_000),
        }
    }
}

/// Document ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Target chunk size in characters.
    pub chunk_chars: usize,
    /// Characters carried over between consecutive chunks of one paragraph.
    pub overlap_chars: usize,
    /// Files processed concurrently.
    pub max_concurrent: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            chunk_chars: 1000,
            overlap_chars: 100,
            max_concurrent: 4,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom profile prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in system prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RagdeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragdesk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded SQLite database path.
    pub fn sqlite_path(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.sqlite_path)
    }
}
