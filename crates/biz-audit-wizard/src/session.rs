use std::sync::Arc;

use biz_audit_core::{AuditEngine, RawAnswers, Report};
use serde::Serialize;
use tracing::debug;

use crate::controller::{ProgressView, StepController};
use crate::error::SessionError;
use crate::questionnaire::Questionnaire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    Reported,
}

/// One in-progress questionnaire: step position, the answer draft, and the
/// last report once submitted.
#[derive(Debug, Clone)]
pub struct AuditSession {
    controller: StepController,
    engine: AuditEngine,
    answers: RawAnswers,
    report: Option<Report>,
}

impl AuditSession {
    pub fn new(questionnaire: Arc<Questionnaire>, engine: AuditEngine) -> Self {
        Self {
            controller: StepController::new(questionnaire),
            engine,
            answers: RawAnswers::new(),
            report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.report.is_some() {
            Phase::Reported
        } else {
            Phase::Collecting
        }
    }

    pub fn answers(&self) -> &RawAnswers {
        &self.answers
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn progress(&self) -> ProgressView {
        self.controller.view()
    }

    /// An empty value clears the field. Editing answers discards a stale report.
    pub fn set_answer(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        let field = self
            .controller
            .questionnaire()
            .field(key)
            .ok_or_else(|| SessionError::UnknownField(key.to_string()))?;

        if value.is_empty() {
            self.answers.remove(key);
        } else {
            if !field.accepts(value) {
                return Err(SessionError::UnknownOption {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            self.answers.insert(key.to_string(), value.to_string());
        }
        self.report = None;
        Ok(())
    }

    pub fn advance(&mut self) -> Result<ProgressView, SessionError> {
        self.controller.advance(&self.answers)
    }

    pub fn retreat(&mut self) -> ProgressView {
        self.controller.retreat()
    }

    /// Back to the first step with an empty draft.
    pub fn reset(&mut self) -> ProgressView {
        self.answers.clear();
        self.report = None;
        debug!("session reset");
        self.controller.reset()
    }

    /// Runs the engine on the merged draft. A refused submission leaves the
    /// step, the draft, and any earlier report untouched.
    pub fn submit(&mut self) -> Result<&Report, SessionError> {
        let report = self.engine.generate_from_form(&self.answers)?;
        debug!(score = report.risk.score, "session submitted");
        Ok(self.report.insert(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biz_audit_core::{AuditError, RiskLevel};

    fn session() -> AuditSession {
        AuditSession::new(Arc::new(Questionnaire::default()), AuditEngine::default())
    }

    fn fill_and_walk(session: &mut AuditSession, pairs: &[(&str, &str)]) {
        for (key, value) in pairs {
            session.set_answer(key, value).expect("known field");
            session.advance().expect("step valid");
        }
    }

    const REFERENCE: [(&str, &str); 7] = [
        ("hasCRM", "no"),
        ("hasSalesTeam", "no"),
        ("socialStatus", "good"),
        ("platform", "Instagram"),
        ("targetIncome", "5000"),
        ("avgCheck_custom", "250"),
        ("conversion", "10"),
    ];

    #[test]
    fn full_walk_produces_reference_report() {
        let mut session = session();
        fill_and_walk(&mut session, &REFERENCE);
        assert_eq!(session.progress().current, 6);

        let report = session.submit().expect("report").clone();
        assert_eq!(report.risk.level, RiskLevel::HighRisk);
        assert_eq!(report.plan.min_budget, 300);
        assert_eq!(report.plan.total_budget, 420);
        assert_eq!(session.phase(), Phase::Reported);
    }

    #[test]
    fn submission_without_financials_is_refused() {
        let mut session = session();
        fill_and_walk(&mut session, &REFERENCE[..4]);
        let err = session.submit().expect_err("no financials");
        assert!(matches!(
            err,
            SessionError::Audit(AuditError::MissingFinancialInput(_))
        ));
        assert_eq!(session.progress().current, 4);
        assert_eq!(session.phase(), Phase::Collecting);
        assert!(session.report().is_none());
    }

    #[test]
    fn reset_after_report_clears_everything() {
        let mut session = session();
        fill_and_walk(&mut session, &REFERENCE);
        session.submit().expect("report");

        let view = session.reset();
        assert_eq!(view.current, 0);
        assert!(session.answers().is_empty());
        assert!(session.report().is_none());
        assert_eq!(session.phase(), Phase::Collecting);
        assert!(session.submit().is_err());
        assert!(session.advance().is_err());
    }

    #[test]
    fn rejects_unknown_fields_and_options() {
        let mut session = session();
        assert_eq!(
            session.set_answer("budget", "1"),
            Err(SessionError::UnknownField("budget".to_string()))
        );
        let err = session.set_answer("hasCRM", "maybe").expect_err("bad option");
        assert_eq!(
            err.prompt(biz_audit_copy::Locale::Uz),
            Some("Iltimos, variantlardan birini tanlang yoki o'z qiymatingizni kiriting!")
        );
    }

    #[test]
    fn empty_value_clears_and_editing_drops_report() {
        let mut session = session();
        fill_and_walk(&mut session, &REFERENCE);
        session.submit().expect("report");

        session.set_answer("conversion", "").expect("clear");
        assert!(!session.answers().contains_key("conversion"));
        assert!(session.report().is_none());
        assert!(session.submit().is_err());

        session.set_answer("conversion_custom", "5").expect("override");
        assert_eq!(session.submit().expect("report").plan.required_leads, 400);
    }
}
