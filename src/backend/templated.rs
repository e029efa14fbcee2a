//! Adapter from a plain text-completion function to a [`SummaryBackend`].

use std::fmt;

use tracing::debug;

use crate::error::BackendError;
use crate::types::{PromptKind, PromptVars};

use super::prompts::PromptTemplate;
use super::SummaryBackend;

/// Renders the template for each prompt kind and hands the prompt to `complete`.
pub struct TemplatedBackend<F> {
    complete: F,
    direct: PromptTemplate,
    map: PromptTemplate,
    reduce: PromptTemplate,
}

impl<F> TemplatedBackend<F>
where
    F: Fn(&str) -> Result<String, BackendError> + Send + Sync,
{
    /// Use the default templates.
    pub fn new(complete: F) -> Self {
        Self {
            complete,
            direct: PromptTemplate::direct(),
            map: PromptTemplate::map(),
            reduce: PromptTemplate::reduce(),
        }
    }

    /// Replace the template used for direct summaries.
    pub fn with_direct_template(mut self, template: PromptTemplate) -> Self {
        self.direct = template;
        self
    }

    pub fn template(&self, kind: PromptKind) -> &PromptTemplate {
        match kind {
            PromptKind::Direct => &self.direct,
            PromptKind::Map => &self.map,
            PromptKind::Reduce => &self.reduce,
        }
    }
}

impl<F> SummaryBackend for TemplatedBackend<F>
where
    F: Fn(&str) -> Result<String, BackendError> + Send + Sync,
{
    fn invoke(&self, kind: PromptKind, vars: &PromptVars) -> Result<String, BackendError> {
        let prompt = self.template(kind).render(vars)?;
        debug!(%kind, prompt_chars = prompt.chars().count(), "Rendered prompt");

        let response = (self.complete)(&prompt)?;
        let response = response.trim();
        if response.is_empty() {
            return Err(BackendError::MalformedResponse(format!(
                "empty {} response",
                kind
            )));
        }
        Ok(response.to_string())
    }

    fn name(&self) -> &str {
        "templated"
    }
}

impl<F> fmt::Debug for TemplatedBackend<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplatedBackend")
            .field("direct", &self.direct)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_renders_prompt_for_kind() {
        let seen = Mutex::new(Vec::new());
        let backend = TemplatedBackend::new(|prompt: &str| {
            seen.lock().unwrap().push(prompt.to_string());
            Ok("  summary  ".to_string())
        });

        let out = backend
            .invoke(PromptKind::Direct, &PromptKind::Direct.vars("POSTING"))
            .unwrap();
        assert_eq!(out, "summary");

        let prompts = seen.lock().unwrap();
        assert!(prompts[0].contains("POSTING"));
        assert!(prompts[0].contains("## 공고명:"));
    }

    #[test]
    fn test_custom_direct_template() {
        let backend = TemplatedBackend::new(|prompt: &str| Ok(prompt.to_string()))
            .with_direct_template(PromptTemplate::custom("JSON으로 답하세요."));

        let out = backend
            .invoke(PromptKind::Direct, &PromptKind::Direct.vars("공고"))
            .unwrap();
        assert!(out.ends_with("JSON으로 답하세요."));
    }

    #[test]
    fn test_empty_response_is_malformed() {
        let backend = TemplatedBackend::new(|_: &str| Ok("   ".to_string()));
        let err = backend
            .invoke(PromptKind::Map, &PromptKind::Map.vars("chunk"))
            .unwrap_err();
        assert!(matches!(err, BackendError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_variable_never_reaches_completion() {
        let backend = TemplatedBackend::new(|_: &str| -> Result<String, BackendError> {
            panic!("completion must not be called")
        });
        let err = backend
            .invoke(PromptKind::Reduce, &PromptKind::Direct.vars("wrong var"))
            .unwrap_err();
        assert!(matches!(err, BackendError::MissingVariable(_)));
    }
}
