use tracing::debug;

use crate::answers::{AnswerSet, RawAnswers};
use crate::error::AuditError;
use crate::plan::{compute_plan, FinancialInputs};
use crate::policy::AuditPolicy;
use crate::recommend::recommend;
use crate::report::{waste_warning, Report};
use crate::risk::assess_risk;

#[derive(Debug, Clone, Default)]
pub struct AuditEngine {
    policy: AuditPolicy,
}

impl AuditEngine {
    pub fn new(policy: AuditPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AuditPolicy {
        &self.policy
    }

    /// Deterministic and side-effect free. Financial inputs are checked
    /// before anything else so a refused submission produces nothing.
    pub fn generate(&self, answers: &AnswerSet) -> Result<Report, AuditError> {
        self.policy.validate()?;
        let inputs = FinancialInputs::from_answers(answers)?;

        let risk = assess_risk(answers, &self.policy);
        let plan = compute_plan(&inputs, risk.efficiency_loss_pct, self.policy.cost_per_lead)?;
        let recommendations = recommend(answers, self.policy.locale);
        let waste_warning = waste_warning(&plan, self.policy.locale);

        debug!(
            score = risk.score,
            level = ?risk.level,
            leads = plan.required_leads,
            min_budget = plan.min_budget,
            total_budget = plan.total_budget,
            "audit report generated"
        );

        Ok(Report {
            locale: self.policy.locale,
            risk,
            plan,
            recommendations,
            waste_warning,
        })
    }

    pub fn generate_from_form(&self, raw: &RawAnswers) -> Result<Report, AuditError> {
        self.generate(&AnswerSet::from_form(raw))
    }
}

pub fn generate_report(answers: &AnswerSet) -> Result<Report, AuditError> {
    AuditEngine::default().generate(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{FinancialField, SocialStatus, YesNo};
    use crate::plan::FinancialInput;
    use crate::recommend::RecommendationKind;
    use crate::risk::RiskLevel;
    use biz_audit_copy::Locale;

    fn reference_answers(crm: YesNo, sales: YesNo) -> AnswerSet {
        AnswerSet {
            has_crm: Some(crm),
            has_sales_team: Some(sales),
            social_status: Some(SocialStatus::Good),
            platform: Some("Instagram".to_string()),
            target_income: FinancialField::preset("5000"),
            avg_check: FinancialField::preset("250"),
            conversion: FinancialField::preset("10"),
        }
    }

    #[test]
    fn reference_scenario_with_missing_systems() {
        let report = generate_report(&reference_answers(YesNo::No, YesNo::No)).expect("report");
        assert_eq!(report.risk.score, 4);
        assert_eq!(report.risk.level, RiskLevel::HighRisk);
        assert_eq!(report.plan.required_customers, 20);
        assert_eq!(report.plan.required_leads, 200);
        assert_eq!(report.plan.min_budget, 300);
        assert_eq!(report.plan.efficiency_loss_pct, 40);
        assert_eq!(report.plan.wasted_budget, 120);
        assert_eq!(report.plan.total_budget, 420);
        assert_eq!(
            report.waste_warning.as_deref(),
            Some("Tizim yo'qligi sababli $120 ortiqcha sarflashingiz mumkin!")
        );
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn healthy_business_is_stable_without_warning() {
        let report = generate_report(&reference_answers(YesNo::Yes, YesNo::Yes)).expect("report");
        assert_eq!(report.risk.score, 0);
        assert!(!report.is_high_risk());
        assert_eq!(report.plan.total_budget, report.plan.min_budget);
        assert!(report.waste_warning.is_none());
        assert_eq!(report.risk.positives.len(), 3);
        assert_eq!(
            report
                .recommendations
                .iter()
                .map(|r| r.kind)
                .collect::<Vec<_>>(),
            vec![RecommendationKind::AdStrategy]
        );
    }

    #[test]
    fn override_value_drives_the_plan() {
        let mut answers = reference_answers(YesNo::Yes, YesNo::Yes);
        answers.target_income = FinancialField::preset("1000").with_custom("2500");
        let report = generate_report(&answers).expect("report");
        assert!((report.plan.target_income - 2500.0).abs() < f64::EPSILON);
        assert_eq!(report.plan.required_customers, 10);
    }

    #[test]
    fn blank_financials_produce_no_report() {
        let mut answers = reference_answers(YesNo::No, YesNo::No);
        answers.target_income = FinancialField::default();
        answers.avg_check = FinancialField::preset("");
        answers.conversion = FinancialField::preset("").with_custom("  ");
        let err = generate_report(&answers).expect_err("must refuse");
        assert_eq!(
            err,
            AuditError::MissingFinancialInput(vec![
                FinancialInput::TargetIncome,
                FinancialInput::AvgCheck,
                FinancialInput::Conversion,
            ])
        );
        assert_eq!(
            err.prompt(Locale::Uz),
            "Iltimos, moliyaviy ma'lumotlarni kiriting!"
        );
    }

    #[test]
    fn custom_cost_per_lead_and_locale() {
        let engine = AuditEngine::new(AuditPolicy {
            cost_per_lead: 2.0,
            ..AuditPolicy::default().with_locale(Locale::En)
        });
        let report = engine
            .generate(&reference_answers(YesNo::Yes, YesNo::Yes))
            .expect("report");
        assert_eq!(report.plan.min_budget, 400);
        assert_eq!(report.risk.status_label, "Stable");
        let text = report.render_text();
        assert!(text.contains("Ad budget: $400 - $400"));
        assert!(text.contains("Start Instagram with a small budget"));
    }

    #[test]
    fn generate_from_form_merges_raw_pairs() {
        let raw = [
            ("hasCRM", "no"),
            ("hasSalesTeam", "yes"),
            ("targetIncome", "5000"),
            ("avgCheck", "250"),
            ("conversion", "5"),
            ("conversion_custom", "10"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<RawAnswers>();
        let report = AuditEngine::default()
            .generate_from_form(&raw)
            .expect("report");
        assert_eq!(report.risk.score, 2);
        assert!(report.is_high_risk());
        assert_eq!(report.plan.required_leads, 200);
    }
}
