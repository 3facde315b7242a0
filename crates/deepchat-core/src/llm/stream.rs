use crate::error::{DeepChatError, Result};
use crate::llm::traits::{StreamEvent, Usage};
use futures::{Stream, StreamExt};

/// The full text of a streamed reply, plus the token counters if the endpoint
/// sent any.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedStream {
    pub text: String,
    pub usage: Option<Usage>,
}

/// Fold a stream of events into the complete response text.
///
/// `on_fragment` sees every text fragment as it arrives, in order. The fold
/// stops at [`StreamEvent::Done`] or when the stream ends, whichever comes
/// first. An error event aborts the fold, and so does a reply with no text
/// beyond whitespace.
pub async fn collect_stream<S, F>(mut events: S, mut on_fragment: F) -> Result<CompletedStream>
where
    S: Stream<Item = StreamEvent> + Unpin,
    F: FnMut(&str),
{
    let mut text = String::new();
    let mut usage = None;

    while let Some(event) = events.next().await {
        match event {
            StreamEvent::TextDelta(fragment) => {
                on_fragment(&fragment);
                text.push_str(&fragment);
            }
            StreamEvent::Usage(u) => usage = Some(u),
            StreamEvent::Error(e) => {
                return Err(DeepChatError::Llm(format!("Stream error: {e}")));
            }
            StreamEvent::Done => break,
        }
    }

    if text.trim().is_empty() {
        return Err(DeepChatError::EmptyResponse);
    }

    Ok(CompletedStream { text, usage })
}
