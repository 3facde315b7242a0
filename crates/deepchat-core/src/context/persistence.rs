use crate::constants::history::QUESTION_LABEL;
use crate::context::history::{ConversationLog, Exchange};
use crate::error::DeepChatError;
use crate::llm::Message;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

lazy_static! {
    // First label wins; the question runs to the end, minus trailing whitespace.
    static ref QUESTION_RE: Regex =
        Regex::new(&format!(r"(?s){}\s*(.+?)\s*\z", regex::escape(QUESTION_LABEL)))
            .expect("question pattern is valid");
}

/// The bounded, file-backed conversation history.
///
/// The file is read once when the store opens and rewritten in full after
/// every append. If a write fails the store drops its path and carries on in
/// memory for the rest of the session.
pub struct ConversationStore {
    path: Option<PathBuf>,
    max_history: usize,
    log: ConversationLog,
}

impl ConversationStore {
    /// Open a store backed by `path`, loading whatever history it holds.
    pub fn open(path: impl Into<PathBuf>, max_history: usize) -> Result<Self, DeepChatError> {
        Self::check_bound(max_history)?;
        let path = path.into();
        let log = Self::load(&path);
        tracing::debug!(path = %path.display(), exchanges = log.len(), "history loaded");

        Ok(Self {
            path: Some(path),
            max_history,
            log,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory(max_history: usize) -> Result<Self, DeepChatError> {
        Self::check_bound(max_history)?;
        Ok(Self {
            path: None,
            max_history,
            log: ConversationLog::new(),
        })
    }

    fn check_bound(max_history: usize) -> Result<(), DeepChatError> {
        if max_history == 0 {
            return Err(DeepChatError::Config(
                "max_history must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load history from `path`.
    ///
    /// A missing file is an empty log. So is an empty, unreadable or
    /// malformed one, with a warning. Never fails, and does not enforce the
    /// bound: a file written by an earlier session may already be full.
    pub fn load(path: &Path) -> ConversationLog {
        if !path.exists() {
            return ConversationLog::new();
        }

        match Self::read_log(path) {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!("Could not load history from {}: {}", path.display(), e);
                ConversationLog::new()
            }
        }
    }

    /// Strict read: errors on I/O failure or content that is not a JSON
    /// array of `{prompt, response}` strings. Whitespace-only is empty.
    pub fn read_log(path: &Path) -> Result<ConversationLog, DeepChatError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| DeepChatError::HistoryRead(format!("{}: {}", path.display(), e)))?;

        let contents = contents.trim();
        if contents.is_empty() {
            return Ok(ConversationLog::new());
        }

        serde_json::from_str(contents)
            .map_err(|e| DeepChatError::HistoryRead(format!("{}: {}", path.display(), e)))
    }

    /// Strict write: the whole log goes to a temporary sibling which is then
    /// renamed over `path`.
    pub fn write_log(path: &Path, log: &ConversationLog) -> Result<(), DeepChatError> {
        let contents = serde_json::to_string_pretty(log)
            .map_err(|e| DeepChatError::HistoryWrite(format!("Failed to serialize history: {}", e)))?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| {
            DeepChatError::HistoryWrite(format!("{}: {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            DeepChatError::HistoryWrite(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Persist the current log. A failure is logged and switches the store
    /// to memory-only mode; the in-memory log is kept as is.
    pub fn save(&mut self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        if let Err(e) = Self::write_log(path, &self.log) {
            tracing::warn!("Failed to save history, continuing without persistence: {}", e);
            self.path = None;
        }
    }

    /// Record a finished turn.
    ///
    /// `prompt` is the full prompt that was sent; only its question is kept.
    /// An empty prompt or response is rejected and the log is left alone.
    pub fn append(&mut self, prompt: &str, response: &str) -> Result<(), DeepChatError> {
        if prompt.trim().is_empty() {
            return Err(DeepChatError::ContractViolation(
                "prompt must be a non-empty string".to_string(),
            ));
        }
        if response.trim().is_empty() {
            return Err(DeepChatError::ContractViolation(
                "response must be a non-empty string".to_string(),
            ));
        }

        let exchange = Exchange::new(extract_question(prompt), response);
        let evicted = self.log.push_bounded(exchange, self.max_history);
        if evicted > 0 {
            tracing::debug!(evicted, max_history = self.max_history, "evicted oldest exchanges");
        }

        self.save();
        Ok(())
    }

    /// Messages for the next request: the template once, then each stored
    /// exchange as its question followed by the verbatim response. The
    /// caller appends the new prompt.
    pub fn to_messages(&self, template: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(1 + self.log.len() * 2);
        messages.push(Message::user(template));

        for exchange in &self.log {
            messages.push(Message::user(format!("{} {}", QUESTION_LABEL, exchange.question)));
            messages.push(Message::assistant(exchange.response.as_str()));
        }
        messages
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }
}

/// Pull the question out of a full instructional prompt.
///
/// Returns the text after the first `Question:` label, trimmed. With no
/// label, or nothing after it, the prompt is returned unchanged.
pub fn extract_question(prompt: &str) -> String {
    QUESTION_RE
        .captures(prompt)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|q| !q.is_empty())
        .unwrap_or(prompt)
        .to_string()
}
