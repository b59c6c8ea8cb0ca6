//! Deterministic generators for local runs and tests.

use std::collections::VecDeque;

use crate::adapter::{GenerationMeta, Generator};
use crate::error::{GenerationError, Result};

/// Prefix every [`EchoGenerator`] response starts with.
pub const ECHO_PREFIX: &str = "[dummy]";

/// Number of prompt characters an echoing generator repeats back.
pub const ECHO_PROMPT_CHARS: usize = 200;

/// Pass-through generator that echoes a bounded slice of the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoGenerator {
    /// When false, every response is the bare prefix.
    pub echo: bool,
}

impl EchoGenerator {
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl Default for EchoGenerator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Generator for EchoGenerator {
    fn generate(&mut self, prompt: &str, _meta: &GenerationMeta) -> Result<String> {
        if !self.echo {
            return Ok(ECHO_PREFIX.to_string());
        }
        let head: String = prompt.chars().take(ECHO_PROMPT_CHARS).collect();
        Ok(format!("{ECHO_PREFIX} {head}"))
    }
}

/// Replays a fixed queue of responses, failures included.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    responses: VecDeque<Result<String>>,
    prompts: Vec<String>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a generator that returns each string once, in order.
    pub fn from_outputs<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: outputs.into_iter().map(|s| Ok(s.into())).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn push_output(&mut self, output: impl Into<String>) -> &mut Self {
        self.responses.push_back(Ok(output.into()));
        self
    }

    pub fn push_error(&mut self, error: GenerationError) -> &mut Self {
        self.responses.push_back(Err(error));
        self
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&mut self, prompt: &str, _meta: &GenerationMeta) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.responses
            .pop_front()
            .unwrap_or(Err(GenerationError::Exhausted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_echo_prefixes_prompt() {
        let mut generator = EchoGenerator::default();
        let out = generator
            .generate("Explain the loop.", &GenerationMeta::new())
            .unwrap();
        assert_eq!(out, "[dummy] Explain the loop.");
    }

    #[test]
    fn test_echo_truncates_long_prompt_by_chars() {
        let mut generator = EchoGenerator::default();
        let prompt = "說".repeat(ECHO_PROMPT_CHARS + 50);
        let out = generator.generate(&prompt, &GenerationMeta::new()).unwrap();
        assert_eq!(
            out.chars().count(),
            ECHO_PREFIX.chars().count() + 1 + ECHO_PROMPT_CHARS
        );
    }

    #[test]
    fn test_echo_disabled_returns_prefix_only() {
        let mut generator = EchoGenerator::new(false);
        let out = generator.generate("anything", &GenerationMeta::new()).unwrap();
        assert_eq!(out, "[dummy]");
    }

    #[test]
    fn test_scripted_replays_in_order_then_exhausts() {
        let mut generator = ScriptedGenerator::from_outputs(["one", "two"]);
        generator.push_error(GenerationError::Backend("down".into()));
        let meta = GenerationMeta::new();

        assert_eq!(generator.generate("a", &meta).unwrap(), "one");
        assert_eq!(generator.generate("b", &meta).unwrap(), "two");
        assert_eq!(
            generator.generate("c", &meta).unwrap_err(),
            GenerationError::Backend("down".into())
        );
        assert_eq!(
            generator.generate("d", &meta).unwrap_err(),
            GenerationError::Exhausted
        );
        assert_eq!(generator.prompts(), ["a", "b", "c", "d"]);
        assert_eq!(generator.remaining(), 0);
    }
}
