use biz_audit_copy::{phrase, Locale, PhraseKey};
use thiserror::Error;

use crate::plan::FinancialInput;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuditError {
    #[error("missing financial input: {}", join_inputs(.0))]
    MissingFinancialInput(Vec<FinancialInput>),

    #[error("financial input {input} is not a number: {value:?}")]
    NotANumber { input: FinancialInput, value: String },

    #[error("financial input {input} is out of range: {value}")]
    OutOfRange { input: FinancialInput, value: f64 },

    #[error("computed {0} exceeds the supported range")]
    Overflow(&'static str),

    #[error("invalid audit policy: {0}")]
    InvalidPolicy(String),
}

impl AuditError {
    /// User-facing prompt shown when a submission is refused.
    pub fn prompt(&self, locale: Locale) -> &'static str {
        let key = match self {
            Self::MissingFinancialInput(_) => PhraseKey::PromptFinancialMissing,
            Self::NotANumber { .. } | Self::OutOfRange { .. } => PhraseKey::PromptFinancialInvalid,
            Self::Overflow(_) | Self::InvalidPolicy(_) => PhraseKey::PromptCalculationFailed,
        };
        phrase(locale, key)
    }
}

fn join_inputs(inputs: &[FinancialInput]) -> String {
    inputs
        .iter()
        .map(|input| input.key())
        .collect::<Vec<_>>()
        .join(", ")
}
