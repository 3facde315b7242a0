use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One completed question/answer turn.
///
/// `question` is only the user's question, never the surrounding template.
/// `response` is the raw model output, thinking markup included. On disk the
/// question lives under the `"prompt"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    #[serde(rename = "prompt")]
    pub question: String,
    pub response: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
        }
    }
}

/// Ordered exchanges, oldest first. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    exchanges: VecDeque<Exchange>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an exchange, then evict from the front until at most `max`
    /// remain. Returns how many exchanges were evicted.
    pub fn push_bounded(&mut self, exchange: Exchange, max: usize) -> usize {
        self.exchanges.push_back(exchange);
        let mut evicted = 0;
        while self.exchanges.len() > max {
            self.exchanges.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    pub fn last(&self) -> Option<&Exchange> {
        self.exchanges.back()
    }

    pub fn estimate_tokens(&self) -> usize {
        self.exchanges
            .iter()
            .map(|e| (e.question.len() + e.response.len()) / 4)
            .sum()
    }
}

impl From<Vec<Exchange>> for ConversationLog {
    fn from(exchanges: Vec<Exchange>) -> Self {
        Self {
            exchanges: exchanges.into(),
        }
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a Exchange;
    type IntoIter = std::collections::vec_deque::Iter<'a, Exchange>;

    fn into_iter(self) -> Self::IntoIter {
        self.exchanges.iter()
    }
}
