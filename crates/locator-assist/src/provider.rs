use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::element_info::ElementInfo;
use crate::errors::AssistError;

/// A remote service that proposes a locator for an element.
#[async_trait]
pub trait LocatorProvider: Send + Sync {
    /// Short provider name used in logs and outcomes.
    fn name(&self) -> &str;

    /// Raw suggestion text; the chain cleans it before validation.
    async fn suggest(&self, info: &ElementInfo) -> Result<String, AssistError>;
}

/// Scripted provider used for tests and offline runs.
///
/// Replies are consumed in order; once the script runs out the last reply
/// repeats. An optional delay is applied before every reply.
pub struct MockLocatorProvider {
    name: String,
    replies: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<Result<String, String>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockLocatorProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(self, reply: Result<String, String>) -> Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
        self
    }

    fn next_reply(&self) -> Result<String, String> {
        let next = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        let mut last = match self.last.lock() {
            Ok(last) => last,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| Err("mock provider has no scripted reply".to_string()))
    }
}

#[async_trait]
impl LocatorProvider for MockLocatorProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn suggest(&self, _info: &ElementInfo) -> Result<String, AssistError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_reply()
            .map_err(|message| AssistError::invalid_response(&self.name, message))
    }
}
