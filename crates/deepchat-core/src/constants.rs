/// deepchat — centralized constants.
/// Defaults for the endpoint, sampling, history and retry live here.

// ─── Environment ──────────────────────────────────────────────────────────────

pub mod env {
    /// Holds the endpoint key.
    pub const API_KEY: &str = "AZURE_INFERENCE_CREDENTIAL";
    /// Holds the endpoint URL (without `/v1/chat/completions`).
    pub const ENDPOINT: &str = "AZURE_INFERENCE_ENDPOINT";
}

// ─── API ──────────────────────────────────────────────────────────────────────

pub mod api {
    pub const API_VERSION: &str = "2024-05-01-preview";
    pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
    pub const INFO_PATH: &str = "/info";
}

// ─── Sampling (recommended for DeepSeek-R1) ───────────────────────────────────

pub mod sampling {
    /// 0.5-0.7 is advised.
    pub const TEMPERATURE: f32 = 0.6;
    pub const TOP_P: f32 = 0.95;
    pub const MAX_TOKENS: u32 = 4096;
}

// ─── History ──────────────────────────────────────────────────────────────────

pub mod history {
    pub const FILE_NAME: &str = "conversation_history.json";
    pub const MAX_HISTORY: usize = 100;
    /// Label that separates the instructional template from the question.
    pub const QUESTION_LABEL: &str = "Question:";
}

// ─── Retry ────────────────────────────────────────────────────────────────────

pub mod retry {
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const MIN_DELAY_SECS: u64 = 4;
    pub const MAX_DELAY_SECS: u64 = 10;
}

// ─── Response markup ──────────────────────────────────────────────────────────

pub mod markup {
    pub const THINK_OPEN: &str = "<think>";
    pub const THINK_CLOSE: &str = "</think>";
}
