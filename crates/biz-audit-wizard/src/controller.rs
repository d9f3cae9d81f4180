use std::sync::Arc;

use biz_audit_core::RawAnswers;
use serde::Serialize;
use tracing::debug;

use crate::error::SessionError;
use crate::questionnaire::{Questionnaire, StepSpec};

/// What a view layer needs to draw the step strip and progress bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub current: usize,
    pub total: usize,
    pub step_id: String,
    pub percent: f64,
    pub active: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct StepController {
    questionnaire: Arc<Questionnaire>,
    current: usize,
}

impl StepController {
    pub fn new(questionnaire: Arc<Questionnaire>) -> Self {
        Self {
            questionnaire,
            current: 0,
        }
    }

    pub fn questionnaire(&self) -> &Questionnaire {
        &self.questionnaire
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&StepSpec> {
        self.questionnaire.step(self.current)
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.questionnaire.len()
    }

    /// Validates the current step first; the index never passes the last step.
    pub fn advance(&mut self, answers: &RawAnswers) -> Result<ProgressView, SessionError> {
        if let Some(step) = self.current_step() {
            if !step.is_valid(answers) {
                debug!(step = %step.id, "advance refused");
                return Err(SessionError::StepIncomplete {
                    step: step.id.clone(),
                });
            }
        }
        if !self.is_last() {
            self.current += 1;
        }
        debug!(current = self.current, "advanced");
        Ok(self.view())
    }

    pub fn retreat(&mut self) -> ProgressView {
        self.current = self.current.saturating_sub(1);
        debug!(current = self.current, "retreated");
        self.view()
    }

    pub fn reset(&mut self) -> ProgressView {
        self.current = 0;
        self.view()
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn view(&self) -> ProgressView {
        let total = self.questionnaire.len();
        let percent = if total == 0 {
            0.0
        } else {
            (self.current + 1) as f64 / total as f64 * 100.0
        };
        ProgressView {
            current: self.current,
            total,
            step_id: self
                .current_step()
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            percent,
            active: (0..total).map(|i| i == self.current).collect(),
        }
    }
}
