use crate::constants::api;
use crate::error::DeepChatError;
use crate::llm::traits::*;
use futures::channel::mpsc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client for an Azure AI model inference deployment (serverless DeepSeek-R1
/// and friends). Speaks the OpenAI-style chat completions wire format.
pub struct AzureInferenceClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    api_version: String,
    model: Option<String>,
}

impl AzureInferenceClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_version: api::API_VERSION.to_string(),
            model: None,
        }
    }

    /// Name the deployment explicitly. Serverless endpoints host a single
    /// model and accept requests without it.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn build_request(&self, messages: &[Message], params: &ChatParams, stream: bool) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: messages
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "role": m.role,
                        "content": m.content,
                    })
                })
                .collect(),
            temperature: params.temperature,
            top_p: params.top_p,
            max_tokens: params.max_tokens,
            stream: if stream { Some(true) } else { None },
        }
    }

    async fn post(&self, body: &ChatRequest) -> Result<reqwest::Response, DeepChatError> {
        let url = self.url(api::CHAT_COMPLETIONS_PATH);
        tracing::debug!(%url, messages = body.messages.len(), "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DeepChatError::Llm(format!(
                "Inference API error ({}): {}",
                status, text
            )));
        }

        Ok(response)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<Value>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Reassembles response body chunks into complete event-stream lines.
///
/// Chunks arrive on arbitrary byte boundaries, so a multi-byte character can
/// straddle two of them. Bytes are held until a newline arrives and only whole
/// lines are decoded.
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    /// Add a chunk and return every line it completed, without the newline.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&line[..pos]));
        }
        lines
    }

    /// Whatever is left once the body ends without a trailing newline.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(decode_line(&self.pending))
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(line) => line.to_string(),
        Err(e) => {
            tracing::warn!("invalid UTF-8 in event stream: {e}");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Turn one line of the server-sent event stream into stream events.
///
/// Lines that are not `data:` lines, or whose payload cannot be parsed, yield
/// nothing. `data: [DONE]` yields [`StreamEvent::Done`].
pub fn parse_sse_line(line: &str) -> Vec<StreamEvent> {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return Vec::new();
    };
    let data = data.trim_start();

    if data == "[DONE]" {
        return vec![StreamEvent::Done];
    }

    let Ok(event) = serde_json::from_str::<Value>(data) else {
        tracing::debug!(data, "skipping unparseable stream chunk");
        return Vec::new();
    };

    let mut events = Vec::new();

    if let Some(content) = event
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|c| c.as_str())
    {
        if !content.is_empty() {
            events.push(StreamEvent::TextDelta(content.to_string()));
        }
    }

    // Usage, when the endpoint reports it at all, rides on the final chunk.
    if let Some(usage) = event.get("usage").filter(|u| !u.is_null()) {
        if let Ok(usage) = serde_json::from_value::<Usage>(usage.clone()) {
            if usage != Usage::default() {
                events.push(StreamEvent::Usage(usage));
            }
        }
    }

    events
}

#[async_trait::async_trait]
impl LlmClient for AzureInferenceClient {
    async fn chat(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<LlmResponse, DeepChatError> {
        let body = self.build_request(messages, params, false);
        let response = self.post(&body).await?;
        let response_text = response.text().await?;

        let api_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| DeepChatError::Llm(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .first()
            .ok_or_else(|| DeepChatError::Llm("No response from API".into()))?;

        let content = choice.message.content.clone().unwrap_or_default();

        Ok(LlmResponse {
            message: Message::assistant(content),
            usage: api_response.usage,
        })
    }

    async fn chat_stream(
        &self,
        messages: &[Message],
        params: &ChatParams,
    ) -> Result<mpsc::UnboundedReceiver<StreamEvent>, DeepChatError> {
        let body = self.build_request(messages, params, true);
        let response = self.post(&body).await?;

        let (tx, rx) = mpsc::unbounded();

        let mut stream = response.bytes_stream();
        tokio::spawn(async move {
            use futures::StreamExt;
            let mut lines = SseLineBuffer::default();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.unbounded_send(StreamEvent::Error(e.to_string()));
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    for event in parse_sse_line(&line) {
                        let done = event == StreamEvent::Done;
                        // Receiver dropped: the consumer stopped pulling.
                        if tx.unbounded_send(event).is_err() || done {
                            return;
                        }
                    }
                }
            }

            if let Some(line) = lines.finish() {
                for event in parse_sse_line(&line) {
                    let _ = tx.unbounded_send(event);
                }
            }
            let _ = tx.unbounded_send(StreamEvent::Done);
        });

        Ok(rx)
    }

    async fn model_info(&self) -> Result<ModelInfo, DeepChatError> {
        let response = self
            .client
            .get(self.url(api::INFO_PATH))
            .query(&[("api-version", self.api_version.as_str())])
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(DeepChatError::Llm(format!(
                "Model info request failed ({}): {}",
                status, text
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| DeepChatError::Llm(format!("Failed to parse model info: {e}")))
    }
}
