//! Local model process provider
//!
//! Runs `<program> run <model>` once per prompt, feeding the prompt on stdin
//! and taking the reply from stdout. With the default program this is
//! `ollama run gemma:2b`.
//!
//! The child is spawned with `kill_on_drop`, so dropping a pending
//! `generate` future (for example when a deadline expires) terminates the
//! model process instead of leaving it running.

use crate::LlmError;
use dacat_domain::traits::LlmProvider as LlmProviderTrait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Default executable used to run the model
pub const DEFAULT_PROGRAM: &str = "ollama";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemma:2b";

/// Provider backed by one child process per call
#[derive(Debug, Clone)]
pub struct OllamaCommandProvider {
    program: String,
    model: String,
}

impl OllamaCommandProvider {
    /// Create a provider running `ollama run <model>`
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            model: model.into(),
        }
    }

    /// Use a different executable (it is still invoked as `<program> run <model>`)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Executable this provider spawns
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Model this provider targets
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for OllamaCommandProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl LlmProviderTrait for OllamaCommandProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LlmError::Spawn(format!("{}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LlmError::Spawn("stdin not captured".to_string()))?;

        // Feed stdin while draining stdout/stderr so a chatty child cannot
        // block on a full pipe.
        let feed = async move {
            let result = stdin.write_all(prompt.as_bytes()).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output
            .map_err(|e| LlmError::Communication(format!("Failed to wait for model process: {}", e)))?;

        if !output.status.success() {
            return Err(LlmError::ProcessFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        fed.map_err(|e| LlmError::Communication(format!("Failed to send prompt: {}", e)))?;

        let reply = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("{} replied with {} chars", self.program, reply.len());
        Ok(reply)
    }
}
