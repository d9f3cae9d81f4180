use biz_audit_copy::{fill, phrase, Locale, PhraseKey};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    CrmAdoption,
    SalesHire,
    AdStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: String,
    pub body: String,
}

impl Recommendation {
    fn from_copy(kind: RecommendationKind, locale: Locale, title: PhraseKey, body: String) -> Self {
        Self {
            kind,
            title: phrase(locale, title).to_string(),
            body,
        }
    }
}

/// CRM and sales advice appear only for an explicit "no"; the ad strategy is
/// always last.
pub fn recommend(answers: &AnswerSet, locale: Locale) -> Vec<Recommendation> {
    let mut out = Vec::with_capacity(3);

    if answers.lacks_crm() {
        out.push(Recommendation::from_copy(
            RecommendationKind::CrmAdoption,
            locale,
            PhraseKey::RecCrmTitle,
            phrase(locale, PhraseKey::RecCrmBody).to_string(),
        ));
    }

    if answers.lacks_sales_team() {
        out.push(Recommendation::from_copy(
            RecommendationKind::SalesHire,
            locale,
            PhraseKey::RecSalesTitle,
            phrase(locale, PhraseKey::RecSalesBody).to_string(),
        ));
    }

    let platform = answers
        .platform
        .as_deref()
        .unwrap_or_else(|| phrase(locale, PhraseKey::PlatformFallback));
    out.push(Recommendation::from_copy(
        RecommendationKind::AdStrategy,
        locale,
        PhraseKey::RecAdsTitle,
        fill(phrase(locale, PhraseKey::RecAdsBody), "platform", platform),
    ));

    out
}
