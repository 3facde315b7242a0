pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod llm;
pub mod session;

// Re-export key types
pub use config::Settings;
pub use context::{
    extract_question, split_thinking, ConversationLog, ConversationStore, Exchange,
    PromptTemplate, ResponseParts,
};
pub use error::DeepChatError;
pub use llm::{
    AzureInferenceClient, ChatParams, LlmClient, LlmResponse, Message, ModelInfo, RetryPolicy,
    Role, StreamEvent, Usage,
};
pub use session::{ChatSession, TurnOutcome};
