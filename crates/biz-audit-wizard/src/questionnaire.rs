use std::collections::HashSet;

use biz_audit_core::{
    override_key, RawAnswers, KEY_AVG_CHECK, KEY_CONVERSION, KEY_HAS_CRM, KEY_HAS_SALES_TEAM,
    KEY_PLATFORM, KEY_SOCIAL_STATUS, KEY_TARGET_INCOME,
};
use biz_audit_copy::{phrase, Locale, PhraseKey};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// How a step decides it may be left forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Every mandatory field holds a non-empty value.
    RequireAllMandatory,
    /// A choice is selected, or the override field is non-blank.
    RequireChoiceOrOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Exclusive options, one of which may be picked.
    Choice,
    Select,
    Text,
    Number,
}

impl FieldKind {
    fn has_options(self) -> bool {
        matches!(self, Self::Choice | Self::Select)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
}

impl FieldSpec {
    pub fn accepts(&self, value: &str) -> bool {
        !self.kind.has_options() || self.options.iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub id: String,
    pub title: String,
    pub policy: ValidationPolicy,
    pub fields: Vec<FieldSpec>,
    /// Free-text field that can stand in for the choice.
    #[serde(default)]
    pub override_key: Option<String>,
}

impl StepSpec {
    pub fn is_valid(&self, answers: &RawAnswers) -> bool {
        let value = |key: &str| answers.get(key).map_or("", String::as_str);
        match self.policy {
            ValidationPolicy::RequireAllMandatory => self
                .fields
                .iter()
                .filter(|f| f.mandatory)
                .all(|f| !value(&f.key).is_empty()),
            ValidationPolicy::RequireChoiceOrOverride => {
                let chosen = self
                    .fields
                    .iter()
                    .filter(|f| f.kind == FieldKind::Choice)
                    .any(|f| !value(&f.key).is_empty());
                let overridden = self
                    .override_key
                    .as_deref()
                    .is_some_and(|key| !value(key).trim().is_empty());
                chosen || overridden
            }
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    steps: Vec<StepSpec>,
}

impl Questionnaire {
    pub fn new(steps: Vec<StepSpec>) -> Result<Self, SessionError> {
        if steps.is_empty() {
            return Err(SessionError::InvalidQuestionnaire(
                "at least one step is required".to_string(),
            ));
        }

        let mut keys = HashSet::new();
        for step in &steps {
            for field in &step.fields {
                if !keys.insert(field.key.as_str()) {
                    return Err(SessionError::InvalidQuestionnaire(format!(
                        "field {} appears more than once",
                        field.key
                    )));
                }
                if field.kind.has_options() && field.options.is_empty() {
                    return Err(SessionError::InvalidQuestionnaire(format!(
                        "field {} has no options",
                        field.key
                    )));
                }
            }
            if let Some(key) = &step.override_key {
                if step.field(key).is_none() {
                    return Err(SessionError::InvalidQuestionnaire(format!(
                        "step {} names override {key} but has no such field",
                        step.id
                    )));
                }
            }
            if step.policy == ValidationPolicy::RequireChoiceOrOverride
                && !step.fields.iter().any(|f| f.kind == FieldKind::Choice)
            {
                return Err(SessionError::InvalidQuestionnaire(format!(
                    "step {} needs a choice field for its policy",
                    step.id
                )));
            }
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.steps.iter().find_map(|step| step.field(key))
    }
}

impl Questionnaire {
    /// The seven-step business audit form with titles and labels in `locale`.
    pub fn localized(locale: Locale) -> Self {
        let text = |key| phrase(locale, key).to_string();
        let yes_no = [
            ("yes", text(PhraseKey::OptionYes)),
            ("no", text(PhraseKey::OptionNo)),
        ];
        Self {
            steps: vec![
                choice_step("crm", text(PhraseKey::StepCrm), KEY_HAS_CRM, &yes_no),
                choice_step(
                    "sales_team",
                    text(PhraseKey::StepSalesTeam),
                    KEY_HAS_SALES_TEAM,
                    &yes_no,
                ),
                choice_step(
                    "social",
                    text(PhraseKey::StepSocial),
                    KEY_SOCIAL_STATUS,
                    &[
                        ("good", text(PhraseKey::OptionGood)),
                        ("average", text(PhraseKey::OptionAverage)),
                        ("bad", text(PhraseKey::OptionBad)),
                    ],
                ),
                StepSpec {
                    id: "platform".to_string(),
                    title: text(PhraseKey::StepPlatform),
                    policy: ValidationPolicy::RequireAllMandatory,
                    fields: vec![FieldSpec {
                        key: KEY_PLATFORM.to_string(),
                        kind: FieldKind::Select,
                        mandatory: true,
                        options: options(&[
                            ("Instagram", "Instagram".to_string()),
                            ("Facebook", "Facebook".to_string()),
                            ("Telegram", "Telegram".to_string()),
                            ("Google", "Google Ads".to_string()),
                        ]),
                    }],
                    override_key: None,
                },
                amount_step(
                    "target_income",
                    text(PhraseKey::StepTargetIncome),
                    KEY_TARGET_INCOME,
                    &["1000", "5000", "10000", "50000"],
                ),
                amount_step(
                    "avg_check",
                    text(PhraseKey::StepAvgCheck),
                    KEY_AVG_CHECK,
                    &["10", "50", "100", "500"],
                ),
                amount_step(
                    "conversion",
                    text(PhraseKey::StepConversion),
                    KEY_CONVERSION,
                    &["1", "3", "5", "10"],
                ),
            ],
        }
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::localized(Locale::default())
    }
}

fn options(pairs: &[(&str, String)]) -> Vec<ChoiceOption> {
    pairs
        .iter()
        .map(|(value, label)| ChoiceOption {
            value: (*value).to_string(),
            label: label.clone(),
        })
        .collect()
}

fn choice_step(id: &str, title: String, key: &str, choices: &[(&str, String)]) -> StepSpec {
    StepSpec {
        id: id.to_string(),
        title,
        policy: ValidationPolicy::RequireChoiceOrOverride,
        fields: vec![FieldSpec {
            key: key.to_string(),
            kind: FieldKind::Choice,
            mandatory: false,
            options: options(choices),
        }],
        override_key: None,
    }
}

fn amount_step(id: &str, title: String, key: &str, presets: &[&str]) -> StepSpec {
    let presets = presets
        .iter()
        .map(|p| (*p, (*p).to_string()))
        .collect::<Vec<_>>();
    let mut step = choice_step(id, title, key, &presets);
    let custom = override_key(key);
    step.fields.push(FieldSpec {
        key: custom.clone(),
        kind: FieldKind::Number,
        mandatory: false,
        options: Vec::new(),
    });
    step.override_key = Some(custom);
    step
}
