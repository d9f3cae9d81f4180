use biz_audit_copy::Locale;
use serde::{Deserialize, Serialize};

use crate::error::AuditError;

pub const DEFAULT_COST_PER_LEAD: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditPolicy {
    pub cost_per_lead: f64,
    /// Risk points added for each missing system (CRM, sales team).
    pub missing_system_penalty: u32,
    /// Efficiency-loss percentage points added for each missing system.
    pub missing_system_loss_pct: u32,
    pub weak_social_penalty: u32,
    pub high_risk_threshold: u32,
    pub locale: Locale,
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            cost_per_lead: DEFAULT_COST_PER_LEAD,
            missing_system_penalty: 2,
            missing_system_loss_pct: 20,
            weak_social_penalty: 1,
            high_risk_threshold: 2,
            locale: Locale::default(),
        }
    }
}

impl AuditPolicy {
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if !self.cost_per_lead.is_finite() || self.cost_per_lead <= 0.0 {
            return Err(AuditError::InvalidPolicy(format!(
                "cost_per_lead must be a positive number, got {}",
                self.cost_per_lead
            )));
        }
        Ok(())
    }
}
