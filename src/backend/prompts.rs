//! Prompt templates for the three backend calls.
//!
//! The direct and reduce templates ask for the same structured summary: a
//! title line, a company line, a deadline section and three labeled sections.
//! The map template only condenses a chunk so nothing is lost before reduce.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::BackendError;
use crate::types::{PromptKind, PromptVars};

lazy_static! {
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{(\w+)\}").unwrap();
}

/// Output schema shared by the direct and reduce prompts.
pub const SUMMARY_FORMAT: &str = "아래 형식으로 정리해주세요:

## 공고명: [공고명]
### 회사명: [회사명]

**마감기한**
- [마감기한]

### A. 회사소개 (비전, 연혁) & 직무 소개 (주요 업무):
- [회사 소개 및 주요 업무 내용]

### B. 자격요건 (필수조건) & 우대사항 (선택 요건):
**필수조건:**
- [필수 자격요건들]

**우대사항:**
- [우대사항들]

### C. 혜택 및 복지 & 기타사항:
- [혜택, 복지, 기타 정보들]";

const DIRECT_INTRO: &str = "다음 채용 공고 내용을 핵심 정보만 정리하여 요약해 주세요:";

const MAP_TEMPLATE: &str = "다음은 채용 공고의 일부입니다. 공고명, 회사명, 마감기한, 주요 업무, \
자격요건, 우대사항, 혜택 및 복지에 해당하는 정보를 빠짐없이 간결하게 정리해 주세요. \
해당 정보가 없으면 생략하세요:

{text}

핵심 정보:";

const REDUCE_INTRO: &str = "다음은 하나의 채용 공고를 나누어 정리한 요약들입니다. \
중복을 제거하고 하나의 요약으로 통합해 주세요:";

/// A template with named `{variable}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, input_variables: Vec<String>) -> Self {
        Self {
            template: template.into(),
            input_variables,
        }
    }

    /// Structured summary of a whole posting.
    pub fn direct() -> Self {
        Self::custom(SUMMARY_FORMAT)
    }

    /// Condense one chunk.
    pub fn map() -> Self {
        Self::new(MAP_TEMPLATE, vec![PromptKind::Map.variable().to_string()])
    }

    /// Merge partial summaries into the structured summary.
    pub fn reduce() -> Self {
        Self::new(
            format!("{}\n\n{{text}}\n\n{}\n", REDUCE_INTRO, SUMMARY_FORMAT),
            vec![PromptKind::Reduce.variable().to_string()],
        )
    }

    /// Direct template with a caller-supplied format block in place of the default schema.
    pub fn custom(custom_format: &str) -> Self {
        Self::new(
            format!("{}\n\n{{job_content}}\n\n{}\n", DIRECT_INTRO, custom_format),
            vec![PromptKind::Direct.variable().to_string()],
        )
    }

    /// Default template for `kind`.
    pub fn for_kind(kind: PromptKind) -> Self {
        match kind {
            PromptKind::Direct => Self::direct(),
            PromptKind::Map => Self::map(),
            PromptKind::Reduce => Self::reduce(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    /// Fail with every required variable that `vars` does not provide.
    pub fn validate(&self, vars: &PromptVars) -> Result<(), BackendError> {
        let missing: BTreeSet<&str> = self
            .input_variables
            .iter()
            .map(String::as_str)
            .filter(|name| !vars.contains_key(*name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(BackendError::MissingVariable(
                missing.into_iter().collect::<Vec<_>>().join(", "),
            ))
        }
    }

    /// Substitute the declared variables in one pass.
    ///
    /// Braces that do not name a declared variable are left as they are, so
    /// substituted values are never expanded a second time.
    pub fn render(&self, vars: &PromptVars) -> Result<String, BackendError> {
        self.validate(vars)?;

        let rendered = PLACEHOLDER_RE.replace_all(&self.template, |caps: &Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) if self.input_variables.iter().any(|v| v == name) => value.clone(),
                _ => caps[0].to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direct_template_has_schema() {
        let template = PromptTemplate::direct();
        assert_eq!(template.input_variables(), ["job_content".to_string()]);

        let prompt = template
            .render(&PromptKind::Direct.vars("백엔드 개발자 채용"))
            .unwrap();
        assert!(prompt.contains("백엔드 개발자 채용"));
        assert!(prompt.contains("## 공고명:"));
        assert!(prompt.contains("**마감기한**"));
        assert!(prompt.contains("### C. 혜택 및 복지 & 기타사항:"));
        assert!(!prompt.contains("{job_content}"));
    }

    #[test]
    fn test_map_and_reduce_use_text() {
        for kind in [PromptKind::Map, PromptKind::Reduce] {
            let template = PromptTemplate::for_kind(kind);
            let prompt = template.render(&kind.vars("CHUNK BODY")).unwrap();
            assert!(prompt.contains("CHUNK BODY"));
            assert!(!prompt.contains("{text}"));
        }
        assert!(PromptTemplate::reduce().template().contains("### A."));
    }

    #[test]
    fn test_missing_variable_is_reported() {
        let template = PromptTemplate::direct();
        let err = template.render(&PromptKind::Map.vars("x")).unwrap_err();
        assert!(matches!(err, BackendError::MissingVariable(ref name) if name == "job_content"));
    }

    #[test]
    fn test_custom_format() {
        let template = PromptTemplate::custom("한 줄로 요약해 주세요.");
        let prompt = template.render(&PromptKind::Direct.vars("공고")).unwrap();
        assert_eq!(
            prompt,
            "다음 채용 공고 내용을 핵심 정보만 정리하여 요약해 주세요:\n\n공고\n\n한 줄로 요약해 주세요.\n"
        );
    }

    #[test]
    fn test_values_are_not_expanded_twice() {
        let template = PromptTemplate::map();
        let prompt = template.render(&PromptKind::Map.vars("literal {text} and {other}")).unwrap();
        assert!(prompt.contains("literal {text} and {other}"));
    }
}
