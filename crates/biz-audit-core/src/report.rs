use biz_audit_copy::{fill, phrase, Locale, PhraseKey};
use serde::{Deserialize, Serialize};

use crate::plan::FinancialPlan;
use crate::recommend::Recommendation;
use crate::risk::{RiskAssessment, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub locale: Locale,
    pub risk: RiskAssessment,
    pub plan: FinancialPlan,
    pub recommendations: Vec<Recommendation>,
    /// Present when missing systems inflate the budget.
    pub waste_warning: Option<String>,
}

impl Report {
    pub fn is_high_risk(&self) -> bool {
        self.risk.is_high_risk()
    }

    /// Plain-text rendering for transports without a richer view.
    pub fn render_text(&self) -> String {
        let locale = self.locale;
        let plan = &self.plan;
        let label = |key| phrase(locale, key);

        let mut lines = vec![
            label(PhraseKey::HeadingRisk).to_string(),
            format!("  {} (score {})", self.risk.status_label, self.risk.score),
        ];
        lines.extend(
            self.risk
                .negatives
                .iter()
                .chain(&self.risk.positives)
                .map(|factor| {
                    let mark = match factor.severity {
                        Severity::Negative => '-',
                        Severity::Positive => '+',
                    };
                    format!("  {mark} {}", factor.label)
                }),
        );

        lines.push(label(PhraseKey::HeadingPlan).to_string());
        lines.push(format!(
            "  {}: ${}",
            label(PhraseKey::LabelTarget),
            format_amount(plan.target_income)
        ));
        lines.push(format!(
            "  {}: {}",
            label(PhraseKey::LabelCustomers),
            group_thousands(plan.required_customers)
        ));
        lines.push(format!(
            "  {}: {}",
            label(PhraseKey::LabelLeads),
            group_thousands(plan.required_leads)
        ));
        lines.push(format!(
            "  {}: ${} - ${}",
            label(PhraseKey::LabelBudget),
            group_thousands(plan.min_budget),
            group_thousands(plan.total_budget)
        ));
        if let Some(warning) = &self.waste_warning {
            lines.push(format!("  ! {warning}"));
        }

        lines.push(label(PhraseKey::HeadingRecommendations).to_string());
        lines.extend(
            self.recommendations
                .iter()
                .map(|rec| format!("  * {}: {}", rec.title, rec.body)),
        );

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

pub fn waste_warning(plan: &FinancialPlan, locale: Locale) -> Option<String> {
    plan.has_waste_warning().then(|| {
        fill(
            phrase(locale, PhraseKey::WasteWarning),
            "amount",
            &group_thousands(plan.wasted_budget),
        )
    })
}

pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value >= 0.0 && value < 9_007_199_254_740_992.0 {
        group_thousands(value as u64)
    } else {
        format!("{value:.2}")
    }
}
