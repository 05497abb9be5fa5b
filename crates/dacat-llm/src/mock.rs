//! Mock provider for deterministic testing

use crate::LlmError;
use dacat_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text
    Text(String),

    /// Fail the call with `LlmError::Other`
    Fail(String),

    /// Sleep, then return the text
    Delayed(Duration, String),
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        MockReply::Text(text)
    }
}

#[derive(Debug)]
struct Script {
    needle: String,
    replies: VecDeque<MockReply>,
    calls: usize,
}

/// Mock LLM provider for deterministic testing
///
/// Replies are chosen in this order:
///
/// 1. an exact-prompt reply registered with [`add_response`](Self::add_response)
/// 2. the first script whose needle occurs in the prompt; each entry is used
///    once and the last entry repeats forever
/// 3. the default reply
///
/// Clones share all state, so a clone handed to a classifier can be inspected
/// from the test afterwards.
///
/// # Examples
///
/// ```
/// use dacat_llm::MockProvider;
/// use dacat_domain::traits::LlmProvider;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut provider = MockProvider::default();
/// provider.add_script("statement B", ["not json", "{}"]);
///
/// assert_eq!(provider.generate("... statement B ...").await.unwrap(), "not json");
/// assert_eq!(provider.generate("... statement B ...").await.unwrap(), "{}");
/// assert_eq!(provider.generate("... statement B ...").await.unwrap(), "{}");
/// assert_eq!(provider.calls_matching("statement B"), 3);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    scripts: Arc<Mutex<Vec<Script>>>,
    call_count: Arc<Mutex<usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            scripts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for an exact prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<MockReply>) {
        lock(&self.responses).insert(prompt.into(), response.into());
    }

    /// Configure an exact prompt to fail
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Fail("Mock error".to_string()));
    }

    /// Add an ordered reply script for prompts containing `needle`
    pub fn add_script<I, R>(&mut self, needle: impl Into<String>, replies: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<MockReply>,
    {
        lock(&self.scripts).push(Script {
            needle: needle.into(),
            replies: replies.into_iter().map(Into::into).collect(),
            calls: 0,
        });
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *lock(&self.call_count)
    }

    /// Number of calls answered by the script registered for `needle`
    pub fn calls_matching(&self, needle: &str) -> usize {
        lock(&self.scripts)
            .iter()
            .filter(|s| s.needle == needle)
            .map(|s| s.calls)
            .sum()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *lock(&self.call_count) = 0;
    }

    fn next_reply(&self, prompt: &str) -> MockReply {
        *lock(&self.call_count) += 1;

        if let Some(reply) = lock(&self.responses).get(prompt) {
            return reply.clone();
        }

        let mut scripts = lock(&self.scripts);
        if let Some(script) = scripts.iter_mut().find(|s| prompt.contains(&s.needle)) {
            script.calls += 1;
            let reply = if script.replies.len() > 1 {
                script.replies.pop_front()
            } else {
                script.replies.front().cloned()
            };
            if let Some(reply) = reply {
                return reply;
            }
        }

        MockReply::Text(self.default_response.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self.next_reply(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(LlmError::Other(message)),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt").await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate("hello").await.unwrap(), "world");
        assert_eq!(provider.generate("foo").await.unwrap(), "bar");
        assert_eq!(provider.generate("unknown").await.unwrap(), "Default mock response");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").await.unwrap();
        provider.generate("prompt2").await.unwrap();
        assert_eq!(provider.call_count(), 2);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt");

        let result = provider.generate("bad prompt").await;
        assert!(matches!(result.unwrap_err(), LlmError::Other(_)));
    }

    #[tokio::test]
    async fn test_script_last_reply_repeats() {
        let mut provider = MockProvider::default();
        provider.add_script("needle", [MockReply::Fail("down".into()), "ok".into()]);

        assert!(provider.generate("a needle here").await.is_err());
        assert_eq!(provider.generate("needle").await.unwrap(), "ok");
        assert_eq!(provider.generate("needle").await.unwrap(), "ok");
        assert_eq!(provider.generate("haystack").await.unwrap(), "Default mock response");
        assert_eq!(provider.calls_matching("needle"), 3);
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_reply() {
        let mut provider = MockProvider::default();
        provider.add_response("slow", MockReply::Delayed(Duration::from_secs(5), "late".into()));

        let started = tokio::time::Instant::now();
        assert_eq!(provider.generate("slow").await.unwrap(), "late");
        assert!(started.elapsed() >= Duration::from_secs(5));
    }
}
