use deepchat_core::{
    ChatParams, ChatSession, ConversationStore, DeepChatError, LlmClient, LlmResponse, Message,
    ModelInfo, PromptTemplate, RetryPolicy, StreamEvent, Usage,
};
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// One scripted reply: either an HTTP-level failure or a stream of events.
enum Reply {
    Fail(&'static str),
    Stream(Vec<StreamEvent>),
}

/// Mock LLM that plays back scripted replies and records what it was sent.
struct MockLlm {
    replies: Arc<Mutex<Vec<Reply>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockLlm {
    fn new(mut replies: Vec<Reply>) -> (Self, Arc<Mutex<Vec<Vec<Message>>>>) {
        replies.reverse();
        let requests = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                replies: Arc::new(Mutex::new(replies)),
                requests: requests.clone(),
            },
            requests,
        )
    }

    fn next_reply(&self, messages: &[Message]) -> Reply {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Reply::Stream(vec![StreamEvent::Done]))
    }
}

fn text(parts: &[&str]) -> Reply {
    let mut events: Vec<StreamEvent> = parts
        .iter()
        .map(|p| StreamEvent::TextDelta(p.to_string()))
        .collect();
    events.push(StreamEvent::Done);
    Reply::Stream(events)
}

#[async_trait::async_trait]
impl LlmClient for MockLlm {
    async fn chat(
        &self,
        messages: &[Message],
        _params: &ChatParams,
    ) -> Result<LlmResponse, DeepChatError> {
        match self.next_reply(messages) {
            Reply::Fail(e) => Err(DeepChatError::Llm(e.to_string())),
            Reply::Stream(events) => {
                let content: String = events
                    .into_iter()
                    .filter_map(|e| match e {
                        StreamEvent::TextDelta(t) => Some(t),
                        _ => None,
                    })
                    .collect();
                Ok(LlmResponse {
                    message: Message::assistant(content),
                    usage: None,
                })
            }
        }
    }

    async fn chat_stream(
        &self,
        messages: &[Message],
        _params: &ChatParams,
    ) -> Result<UnboundedReceiver<StreamEvent>, DeepChatError> {
        match self.next_reply(messages) {
            Reply::Fail(e) => Err(DeepChatError::Llm(e.to_string())),
            Reply::Stream(events) => {
                let (mut tx, rx) = unbounded();
                for event in events {
                    tx.start_send(event).unwrap();
                }
                Ok(rx)
            }
        }
    }

    async fn model_info(&self) -> Result<ModelInfo, DeepChatError> {
        Ok(ModelInfo {
            model_name: "DeepSeek-R1".into(),
            model_type: "chat-completion".into(),
            model_provider_name: "DeepSeek".into(),
        })
    }
}

fn session(replies: Vec<Reply>, store: ConversationStore) -> (ChatSession, Arc<Mutex<Vec<Vec<Message>>>>) {
    let (mock, requests) = MockLlm::new(replies);
    (ChatSession::new(Box::new(mock), store), requests)
}

#[tokio::test]
async fn test_turn_streams_and_appends() {
    let (mut session, requests) = session(
        vec![text(&["<think>add</think>", "Four."])],
        ConversationStore::in_memory(10).unwrap(),
    );

    let mut echoed = String::new();
    let outcome = session
        .ask("What is 2+2?", |f| echoed.push_str(f))
        .await
        .unwrap();

    assert_eq!(outcome.response, "<think>add</think>Four.");
    assert_eq!(echoed, outcome.response);
    assert_eq!(outcome.prompt, PromptTemplate::General.render("What is 2+2?"));

    let exchange = session.store().log().last().unwrap();
    assert_eq!(exchange.question, "What is 2+2?");
    assert_eq!(exchange.response, "<think>add</think>Four.");

    let requests = requests.lock().unwrap();
    let sent = &requests[0];
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].content, PromptTemplate::General.text());
    assert_eq!(sent[1].content, outcome.prompt);
}

#[tokio::test]
async fn test_second_turn_carries_history() {
    let (mut session, requests) = session(
        vec![text(&["r1"]), text(&["r2"])],
        ConversationStore::in_memory(10).unwrap(),
    );
    let session_template = PromptTemplate::Coding;
    session = session.with_template(session_template);

    session.ask("q1", |_| {}).await.unwrap();
    session.ask("q2", |_| {}).await.unwrap();

    let requests = requests.lock().unwrap();
    let contents: Vec<&str> = requests[1].iter().map(|m| m.content.as_str()).collect();
    let expected_prompt = session_template.render("q2");
    assert_eq!(
        contents,
        vec![
            session_template.text(),
            "Question: q1",
            "r1",
            expected_prompt.as_str(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let (mut session, requests) = session(
        vec![Reply::Fail("503"), Reply::Fail("503"), text(&["ok"])],
        ConversationStore::in_memory(10).unwrap(),
    );

    let outcome = session.ask("q", |_| {}).await.unwrap();

    assert_eq!(outcome.response, "ok");
    assert_eq!(requests.lock().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_turn_is_not_appended() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let mut store = ConversationStore::open(&path, 10).unwrap();
    store.append("earlier", "answer").unwrap();

    let (mut session, requests) = session(
        vec![Reply::Fail("down"), Reply::Fail("down"), Reply::Fail("down")],
        store,
    );

    let err = session.ask("q", |_| {}).await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(requests.lock().unwrap().len(), 3);
    assert_eq!(session.store().log().len(), 1);
    assert_eq!(ConversationStore::load(&path).len(), 1);
}

#[tokio::test]
async fn test_empty_stream_is_not_appended() {
    let (mut session, _) = session(
        vec![Reply::Stream(vec![StreamEvent::Done])],
        ConversationStore::in_memory(10).unwrap(),
    );

    let err = session.ask("q", |_| {}).await.unwrap_err();
    assert!(matches!(err, DeepChatError::EmptyResponse));
    assert!(session.store().log().is_empty());
}

#[tokio::test]
async fn test_whitespace_reply_is_an_empty_response() {
    let (session, _) = session(
        vec![text(&["\n\n", "   "]), text(&[" \t "])],
        ConversationStore::in_memory(10).unwrap(),
    );
    let mut session = session.with_retry(RetryPolicy::none());

    let err = session.ask("q", |_| {}).await.unwrap_err();
    assert!(matches!(err, DeepChatError::EmptyResponse));

    let mut session = session.with_streaming(false);
    let err = session.ask("q", |_| {}).await.unwrap_err();
    assert!(matches!(err, DeepChatError::EmptyResponse));
    assert!(session.store().log().is_empty());
}

#[tokio::test]
async fn test_stream_error_is_not_appended() {
    let (session, _) = session(
        vec![Reply::Stream(vec![
            StreamEvent::TextDelta("half".into()),
            StreamEvent::Error("reset".into()),
        ])],
        ConversationStore::in_memory(10).unwrap(),
    );
    let mut session = session.with_retry(RetryPolicy::none());

    assert!(session.ask("q", |_| {}).await.is_err());
    assert!(session.store().log().is_empty());
}

#[tokio::test]
async fn test_usage_is_reported() {
    let usage = Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    };
    let (mut session, _) = session(
        vec![Reply::Stream(vec![
            StreamEvent::TextDelta("hi".into()),
            StreamEvent::Usage(usage),
            StreamEvent::Done,
        ])],
        ConversationStore::in_memory(10).unwrap(),
    );

    let outcome = session.ask("q", |_| {}).await.unwrap();
    assert_eq!(outcome.usage, Some(usage));
}

#[tokio::test]
async fn test_non_streaming_turn() {
    let (session, _) = session(
        vec![text(&["whole ", "reply"])],
        ConversationStore::in_memory(10).unwrap(),
    );
    let mut session = session.with_streaming(false);

    let mut fragments = Vec::new();
    let outcome = session
        .ask("q", |f| fragments.push(f.to_string()))
        .await
        .unwrap();

    assert_eq!(outcome.response, "whole reply");
    assert_eq!(fragments, vec!["whole reply"]);
    assert_eq!(session.store().log().len(), 1);
}

#[tokio::test]
async fn test_blank_question_is_rejected_without_a_request() {
    let (mut session, requests) = session(vec![], ConversationStore::in_memory(10).unwrap());

    let err = session.ask("   ", |_| {}).await.unwrap_err();
    assert!(matches!(err, DeepChatError::ContractViolation(_)));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_model_info_passthrough() {
    let (session, _) = session(vec![], ConversationStore::in_memory(1).unwrap());
    let info = session.model_info().await.unwrap();
    assert_eq!(info.model_name, "DeepSeek-R1");
}
