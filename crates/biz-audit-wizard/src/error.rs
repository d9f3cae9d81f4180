use biz_audit_copy::{phrase, Locale, PhraseKey};
use biz_audit_core::AuditError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("step {step} is incomplete")]
    StepIncomplete { step: String },

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {key} does not offer option {value:?}")]
    UnknownOption { key: String, value: String },

    #[error("invalid questionnaire: {0}")]
    InvalidQuestionnaire(String),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl SessionError {
    /// The blocking prompt shown to the user, if this error has one.
    pub fn prompt(&self, locale: Locale) -> Option<&'static str> {
        match self {
            Self::StepIncomplete { .. } | Self::UnknownOption { .. } => {
                Some(phrase(locale, PhraseKey::PromptStepInvalid))
            }
            Self::Audit(err) => Some(err.prompt(locale)),
            Self::UnknownField(_) | Self::InvalidQuestionnaire(_) => None,
        }
    }
}
