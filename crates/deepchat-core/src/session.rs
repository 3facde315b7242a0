use crate::context::{ConversationStore, PromptTemplate};
use crate::error::{DeepChatError, Result};
use crate::llm::{
    collect_stream, ChatParams, LlmClient, Message, ModelInfo, RetryPolicy, Usage,
};

/// A finished turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    /// The full prompt that was sent for the new question.
    pub prompt: String,
    /// Raw response text, thinking markup included.
    pub response: String,
    pub usage: Option<Usage>,
}

/// One conversation against one model: the client, the history it feeds
/// from, and the knobs for each request.
pub struct ChatSession {
    llm: Box<dyn LlmClient>,
    store: ConversationStore,
    template: PromptTemplate,
    params: ChatParams,
    retry: RetryPolicy,
    streaming: bool,
}

impl ChatSession {
    pub fn new(llm: Box<dyn LlmClient>, store: ConversationStore) -> Self {
        Self {
            llm,
            store,
            template: PromptTemplate::default(),
            params: ChatParams::default(),
            retry: RetryPolicy::default(),
            streaming: true,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Wait for the whole reply instead of streaming fragments.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn set_template(&mut self, template: PromptTemplate) {
        self.template = template;
    }

    /// The prompt for `question` and the full message list to send with it.
    pub fn build_request(&self, question: &str) -> (String, Vec<Message>) {
        let prompt = self.template.render(question);
        let mut messages = self.store.to_messages(self.template.text());
        messages.push(Message::user(prompt.as_str()));
        (prompt, messages)
    }

    /// Run one turn.
    ///
    /// `on_fragment` receives the reply text as it arrives. The store is
    /// only touched once a complete, non-empty reply is in hand, so a failed
    /// turn leaves the history exactly as it was.
    pub async fn ask<F>(&mut self, question: &str, mut on_fragment: F) -> Result<TurnOutcome>
    where
        F: FnMut(&str),
    {
        if question.trim().is_empty() {
            return Err(DeepChatError::ContractViolation(
                "question must not be empty".to_string(),
            ));
        }

        let (prompt, messages) = self.build_request(question);
        tracing::debug!(
            messages = messages.len(),
            template = %self.template,
            streaming = self.streaming,
            "starting turn"
        );

        let llm = self.llm.as_ref();
        let params = self.params;

        let (response, usage) = if self.streaming {
            let events = self
                .retry
                .run(|_| llm.chat_stream(&messages, &params))
                .await?;
            let completed = collect_stream(events, &mut on_fragment).await?;
            (completed.text, completed.usage)
        } else {
            let reply = self.retry.run(|_| llm.chat(&messages, &params)).await?;
            if reply.message.content.trim().is_empty() {
                return Err(DeepChatError::EmptyResponse);
            }
            on_fragment(&reply.message.content);
            (reply.message.content, reply.usage)
        };

        self.store.append(&prompt, &response)?;

        Ok(TurnOutcome {
            prompt,
            response,
            usage,
        })
    }

    pub async fn model_info(&self) -> Result<ModelInfo> {
        self.llm.model_info().await
    }
}
