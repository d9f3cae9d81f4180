use biz_audit_copy::{phrase, Locale, PhraseKey};
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, SocialStatus, YesNo};
use crate::policy::AuditPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Negative,
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Crm,
    SalesTeam,
    SocialMedia,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factor {
    pub kind: FactorKind,
    pub label: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    HighRisk,
    Stable,
}

impl RiskLevel {
    pub fn classify(score: u32, threshold: u32) -> Self {
        if score >= threshold {
            Self::HighRisk
        } else {
            Self::Stable
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match self {
            Self::HighRisk => phrase(locale, PhraseKey::StatusHighRisk),
            Self::Stable => phrase(locale, PhraseKey::StatusStable),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub efficiency_loss_pct: u32,
    pub level: RiskLevel,
    pub status_label: String,
    pub negatives: Vec<Factor>,
    pub positives: Vec<Factor>,
}

impl RiskAssessment {
    pub fn is_high_risk(&self) -> bool {
        self.level == RiskLevel::HighRisk
    }
}

struct Tally {
    score: u32,
    loss_pct: u32,
    negatives: Vec<Factor>,
    positives: Vec<Factor>,
    locale: Locale,
}

impl Tally {
    fn negative(&mut self, kind: FactorKind, key: PhraseKey, points: u32, loss_pct: u32) {
        self.score = self.score.saturating_add(points);
        self.loss_pct = self.loss_pct.saturating_add(loss_pct);
        self.negatives.push(Factor {
            kind,
            label: phrase(self.locale, key).to_string(),
            severity: Severity::Negative,
        });
    }

    fn positive(&mut self, kind: FactorKind, key: PhraseKey) {
        self.positives.push(Factor {
            kind,
            label: phrase(self.locale, key).to_string(),
            severity: Severity::Positive,
        });
    }
}

pub fn assess_risk(answers: &AnswerSet, policy: &AuditPolicy) -> RiskAssessment {
    let mut tally = Tally {
        score: 0,
        loss_pct: 0,
        negatives: Vec::new(),
        positives: Vec::new(),
        locale: policy.locale,
    };

    let systems = [
        (
            answers.has_crm,
            FactorKind::Crm,
            PhraseKey::CrmMissing,
            PhraseKey::CrmPresent,
        ),
        (
            answers.has_sales_team,
            FactorKind::SalesTeam,
            PhraseKey::SalesTeamMissing,
            PhraseKey::SalesTeamPresent,
        ),
    ];
    for (answer, kind, missing, present) in systems {
        if answer == Some(YesNo::No) {
            tally.negative(
                kind,
                missing,
                policy.missing_system_penalty,
                policy.missing_system_loss_pct,
            );
        } else {
            tally.positive(kind, present);
        }
    }

    match answers.social_status {
        Some(SocialStatus::Bad) => tally.negative(
            FactorKind::SocialMedia,
            PhraseKey::SocialBad,
            policy.weak_social_penalty,
            0,
        ),
        Some(SocialStatus::Good) => tally.positive(FactorKind::SocialMedia, PhraseKey::SocialGood),
        None => {}
    }

    let level = RiskLevel::classify(tally.score, policy.high_risk_threshold);
    RiskAssessment {
        score: tally.score,
        efficiency_loss_pct: tally.loss_pct,
        level,
        status_label: level.label(policy.locale).to_string(),
        negatives: tally.negatives,
        positives: tally.positives,
    }
}
