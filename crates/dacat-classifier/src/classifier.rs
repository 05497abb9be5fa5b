//! Core Classifier implementation

use crate::config::ClassifierConfig;
use crate::error::ClassifierError;
use crate::parser::{parse_response, ClassificationResponse};
use crate::prompt::PromptBuilder;
use dacat_domain::traits::LlmProvider;
use dacat_domain::ClassificationResult;
use tokio::time::timeout;
use tracing::{debug, warn};

/// What happened on one model invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The reply parsed into a valid classification
    Succeeded {
        /// Raw model output
        raw: String,
    },

    /// The provider failed or missed the deadline
    InvocationFailed(ClassifierError),

    /// The provider replied but the reply was unusable
    ExtractionFailed {
        /// Raw model output
        raw: String,
        /// Why extraction failed
        error: ClassifierError,
    },
}

impl AttemptOutcome {
    /// Text to keep for diagnosis if this turns out to be the last attempt
    fn diagnostic(&self) -> String {
        match self {
            AttemptOutcome::Succeeded { raw } | AttemptOutcome::ExtractionFailed { raw, .. } => {
                raw.clone()
            }
            AttemptOutcome::InvocationFailed(error) => error.to_string(),
        }
    }
}

/// Classification result together with every attempt that led to it
#[derive(Debug, Clone)]
pub struct DetailedClassification {
    /// Terminal result
    pub result: ClassificationResult,

    /// One entry per model invocation, in order
    pub attempts: Vec<AttemptOutcome>,
}

/// Classifies statements with bounded retries
///
/// Each call moves through `Attempting` (up to `max_retries` invocations) to
/// exactly one terminal state: a taxonomy category with the model's reason,
/// or the `ERROR` label with the last raw output as reason. Invocation errors,
/// timeouts and unusable replies all take the same retry path.
pub struct Classifier<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ClassifierConfig,
}

impl<L> Classifier<L>
where
    L: LlmProvider,
{
    /// Create a new Classifier
    pub fn new(llm_provider: L, config: ClassifierConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one statement
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_detailed(text).await.result
    }

    /// Classify one statement, keeping the per-attempt history
    pub async fn classify_detailed(&self, text: &str) -> DetailedClassification {
        let prompt = PromptBuilder::new(text).build();
        let max_retries = self.config.max_retries.max(1);
        let mut attempts = Vec::with_capacity(max_retries as usize);

        debug!("Prompt length: {} chars", prompt.len());

        for attempt in 1..=max_retries {
            match self.attempt(&prompt).await {
                Ok((raw, parsed)) => {
                    debug!("Attempt {}/{} succeeded: {}", attempt, max_retries, parsed.category);
                    attempts.push(AttemptOutcome::Succeeded { raw });
                    return DetailedClassification {
                        result: ClassificationResult::classified(
                            parsed.category,
                            parsed.reason,
                            attempt,
                        ),
                        attempts,
                    };
                }
                Err(outcome) => {
                    match &outcome {
                        AttemptOutcome::InvocationFailed(error)
                        | AttemptOutcome::ExtractionFailed { error, .. } => {
                            warn!("Attempt {}/{} failed: {}", attempt, max_retries, error);
                        }
                        AttemptOutcome::Succeeded { .. } => {}
                    }
                    attempts.push(outcome);
                }
            }

            if attempt < max_retries {
                tokio::time::sleep(self.config.retry_delay()).await;
            }
        }

        warn!("Giving up after {} attempts", max_retries);
        let last_output = attempts
            .last()
            .map(AttemptOutcome::diagnostic)
            .unwrap_or_default();

        DetailedClassification {
            result: ClassificationResult::failed(last_output, max_retries),
            attempts,
        }
    }

    /// One invocation plus extraction
    async fn attempt(&self, prompt: &str) -> Result<(String, ClassificationResponse), AttemptOutcome> {
        let deadline = self.config.invocation_timeout();

        let raw = match timeout(deadline, self.llm_provider.generate(prompt)).await {
            Err(_) => {
                return Err(AttemptOutcome::InvocationFailed(ClassifierError::Timeout(deadline)))
            }
            Ok(Err(e)) => {
                return Err(AttemptOutcome::InvocationFailed(ClassifierError::Llm(e.to_string())))
            }
            Ok(Ok(raw)) => raw,
        };

        debug!("LLM response length: {} chars", raw.len());

        match parse_response(&raw) {
            Ok(parsed) => Ok((raw, parsed)),
            Err(error) => Err(AttemptOutcome::ExtractionFailed { raw, error }),
        }
    }
}
