mod history;
pub mod persistence;
pub mod template;
pub mod thinking;

pub use history::{ConversationLog, Exchange};
pub use persistence::{extract_question, ConversationStore};
pub use template::PromptTemplate;
pub use thinking::{split_thinking, ResponseParts};
