use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const KEY_HAS_CRM: &str = "hasCRM";
pub const KEY_HAS_SALES_TEAM: &str = "hasSalesTeam";
pub const KEY_SOCIAL_STATUS: &str = "socialStatus";
pub const KEY_PLATFORM: &str = "platform";
pub const KEY_TARGET_INCOME: &str = "targetIncome";
pub const KEY_AVG_CHECK: &str = "avgCheck";
pub const KEY_CONVERSION: &str = "conversion";

/// Suffix of the free-text field that overrides a preset choice.
pub const OVERRIDE_SUFFIX: &str = "_custom";

/// A form submission as flat key/value pairs.
pub type RawAnswers = BTreeMap<String, String>;

pub fn override_key(key: &str) -> String {
    format!("{key}{OVERRIDE_SUFFIX}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialStatus {
    Good,
    Bad,
}

impl SocialStatus {
    /// Values other than `good`/`bad` carry no signal and map to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "good" => Some(Self::Good),
            "bad" => Some(Self::Bad),
            _ => None,
        }
    }
}

/// A numeric question answered either by a preset choice or a free-text value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialField {
    pub preset: Option<String>,
    pub custom: Option<String>,
}

impl FinancialField {
    pub fn preset(value: impl Into<String>) -> Self {
        Self {
            preset: Some(value.into()),
            custom: None,
        }
    }

    pub fn with_custom(mut self, value: impl Into<String>) -> Self {
        self.custom = Some(value.into());
        self
    }

    pub fn merged(&self) -> Option<&str> {
        merge_override(self.preset.as_deref(), self.custom.as_deref())
    }
}

/// The override wins when it is non-blank; blank values count as absent.
pub fn merge_override<'a>(preset: Option<&'a str>, custom: Option<&'a str>) -> Option<&'a str> {
    let present = |v: &&str| !v.trim().is_empty();
    custom
        .filter(present)
        .or_else(|| preset.filter(present))
        .map(str::trim)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet {
    pub has_crm: Option<YesNo>,
    pub has_sales_team: Option<YesNo>,
    pub social_status: Option<SocialStatus>,
    pub platform: Option<String>,
    pub target_income: FinancialField,
    pub avg_check: FinancialField,
    pub conversion: FinancialField,
}

impl AnswerSet {
    pub fn from_form(raw: &RawAnswers) -> Self {
        let text = |key: &str| raw.get(key).cloned();
        let field = |key: &str| FinancialField {
            preset: text(key),
            custom: raw.get(&override_key(key)).cloned(),
        };

        Self {
            has_crm: raw.get(KEY_HAS_CRM).and_then(|v| YesNo::parse(v)),
            has_sales_team: raw.get(KEY_HAS_SALES_TEAM).and_then(|v| YesNo::parse(v)),
            social_status: raw.get(KEY_SOCIAL_STATUS).and_then(|v| SocialStatus::parse(v)),
            platform: text(KEY_PLATFORM)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            target_income: field(KEY_TARGET_INCOME),
            avg_check: field(KEY_AVG_CHECK),
            conversion: field(KEY_CONVERSION),
        }
    }

    /// Only an explicit "no" counts as a missing CRM.
    pub fn lacks_crm(&self) -> bool {
        self.has_crm == Some(YesNo::No)
    }

    pub fn lacks_sales_team(&self) -> bool {
        self.has_sales_team == Some(YesNo::No)
    }
}
