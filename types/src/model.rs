//! Gemini model naming.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const KNOWN_MODELS: &[&str] = &["gemini-3-flash-preview", "gemini-3-pro-preview"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelParseError {
    #[error("model name cannot be empty")]
    Empty,
    #[error("Gemini model must start with gemini- (got {0})")]
    GeminiPrefix(String),
}

/// A validated Gemini model name.
///
/// Known names are normalized to their canonical spelling; anything else with
/// the `gemini-` prefix is accepted as-is so newer models work without a
/// release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelName(Cow<'static, str>);

impl ModelName {
    pub fn parse(raw: &str) -> Result<Self, ModelParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelParseError::Empty);
        }
        if !trimmed.to_ascii_lowercase().starts_with("gemini-") {
            return Err(ModelParseError::GeminiPrefix(trimmed.to_string()));
        }

        if let Some(known) = KNOWN_MODELS
            .iter()
            .find(|model| model.eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self(Cow::Borrowed(*known)));
        }

        Ok(Self(Cow::Owned(trimmed.to_string())))
    }

    /// The model used by the security advisor unless configured otherwise.
    #[must_use]
    pub const fn advisor_default() -> Self {
        Self(Cow::Borrowed("gemini-3-flash-preview"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    #[must_use]
    pub fn is_known(&self) -> bool {
        KNOWN_MODELS.contains(&self.as_str())
    }
}

impl Default for ModelName {
    fn default() -> Self {
        Self::advisor_default()
    }
}

impl TryFrom<String> for ModelName {
    type Error = ModelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModelName> for String {
    fn from(value: ModelName) -> Self {
        value.0.into_owned()
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_model_case_insensitively() {
        let model = ModelName::parse("Gemini-3-Flash-Preview").unwrap();
        assert_eq!(model.as_str(), "gemini-3-flash-preview");
        assert!(model.is_known());
    }

    #[test]
    fn accepts_unknown_gemini_model() {
        let model = ModelName::parse(" gemini-9-ultra ").unwrap();
        assert_eq!(model.as_str(), "gemini-9-ultra");
        assert!(!model.is_known());
    }

    #[test]
    fn rejects_other_providers_and_blank() {
        assert_eq!(ModelName::parse("  "), Err(ModelParseError::Empty));
        assert!(matches!(
            ModelName::parse("gpt-5.2"),
            Err(ModelParseError::GeminiPrefix(_))
        ));
    }

    #[test]
    fn default_is_flash_preview() {
        assert_eq!(ModelName::default().as_str(), "gemini-3-flash-preview");
    }
}
