use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uz,
    En,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::Uz, Self::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::En => "en",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "uz" | "uz-uz" | "uzbek" => Some(Self::Uz),
            "en" | "en-us" | "en-gb" | "english" => Some(Self::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKey {
    CrmMissing,
    CrmPresent,
    SalesTeamMissing,
    SalesTeamPresent,
    SocialBad,
    SocialGood,
    StatusHighRisk,
    StatusStable,
    RecCrmTitle,
    RecCrmBody,
    RecSalesTitle,
    RecSalesBody,
    RecAdsTitle,
    RecAdsBody,
    PlatformFallback,
    WasteWarning,
    HeadingRisk,
    HeadingPlan,
    HeadingRecommendations,
    LabelTarget,
    LabelCustomers,
    LabelLeads,
    LabelBudget,
    PromptStepInvalid,
    PromptFinancialMissing,
    StepCrm,
    StepSalesTeam,
    StepSocial,
    StepPlatform,
    StepTargetIncome,
    StepAvgCheck,
    StepConversion,
    OptionYes,
    OptionNo,
    OptionGood,
    OptionAverage,
    OptionBad,
    PromptFinancialInvalid,
    PromptCalculationFailed,
}

impl PhraseKey {
    pub fn id(self) -> &'static str {
        match self {
            Self::CrmMissing => "factor.crm.missing",
            Self::CrmPresent => "factor.crm.present",
            Self::SalesTeamMissing => "factor.sales_team.missing",
            Self::SalesTeamPresent => "factor.sales_team.present",
            Self::SocialBad => "factor.social.bad",
            Self::SocialGood => "factor.social.good",
            Self::StatusHighRisk => "status.high_risk",
            Self::StatusStable => "status.stable",
            Self::RecCrmTitle => "rec.crm.title",
            Self::RecCrmBody => "rec.crm.body",
            Self::RecSalesTitle => "rec.sales.title",
            Self::RecSalesBody => "rec.sales.body",
            Self::RecAdsTitle => "rec.ads.title",
            Self::RecAdsBody => "rec.ads.body",
            Self::PlatformFallback => "rec.ads.platform_fallback",
            Self::WasteWarning => "plan.waste_warning",
            Self::HeadingRisk => "heading.risk",
            Self::HeadingPlan => "heading.plan",
            Self::HeadingRecommendations => "heading.recommendations",
            Self::LabelTarget => "label.target",
            Self::LabelCustomers => "label.customers",
            Self::LabelLeads => "label.leads",
            Self::LabelBudget => "label.budget",
            Self::PromptStepInvalid => "prompt.step_invalid",
            Self::PromptFinancialMissing => "prompt.financial_missing",
            Self::StepCrm => "step.crm",
            Self::StepSalesTeam => "step.sales_team",
            Self::StepSocial => "step.social",
            Self::StepPlatform => "step.platform",
            Self::StepTargetIncome => "step.target_income",
            Self::StepAvgCheck => "step.avg_check",
            Self::StepConversion => "step.conversion",
            Self::OptionYes => "option.yes",
            Self::OptionNo => "option.no",
            Self::OptionGood => "option.good",
            Self::OptionAverage => "option.average",
            Self::OptionBad => "option.bad",
            Self::PromptFinancialInvalid => "prompt.financial_invalid",
            Self::PromptCalculationFailed => "prompt.calculation_failed",
        }
    }
}

/// One catalog entry. Templates use `{platform}` and `{amount}` placeholders.
#[derive(Debug, Clone, Copy)]
pub struct Phrase {
    pub key: PhraseKey,
    pub uz: &'static str,
    pub en: &'static str,
}

impl Phrase {
    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Uz => self.uz,
            Locale::En => self.en,
        }
    }
}

static PHRASES: [Phrase; 39] = [
    Phrase {
        key: PhraseKey::CrmMissing,
        uz: "CRM Tizimi mavjud emas",
        en: "No CRM system in place",
    },
    Phrase {
        key: PhraseKey::CrmPresent,
        uz: "CRM Tizimi mavjud",
        en: "CRM system in place",
    },
    Phrase {
        key: PhraseKey::SalesTeamMissing,
        uz: "Alohida sotuv bo'limi yo'q",
        en: "No dedicated sales team",
    },
    Phrase {
        key: PhraseKey::SalesTeamPresent,
        uz: "Sotuv bo'limi shakllangan",
        en: "Sales team is established",
    },
    Phrase {
        key: PhraseKey::SocialBad,
        uz: "Ijtimoiy tarmoqlar holati qoniqarsiz",
        en: "Social media presence is weak",
    },
    Phrase {
        key: PhraseKey::SocialGood,
        uz: "Ijtimoiy tarmoqlar yaxshi holatda",
        en: "Social media presence is healthy",
    },
    Phrase {
        key: PhraseKey::StatusHighRisk,
        uz: "Yuqori Xavf",
        en: "High risk",
    },
    Phrase {
        key: PhraseKey::StatusStable,
        uz: "Barqaror",
        en: "Stable",
    },
    Phrase {
        key: PhraseKey::RecCrmTitle,
        uz: "CRM Joriy qiling",
        en: "Adopt a CRM",
    },
    Phrase {
        key: PhraseKey::RecCrmBody,
        uz: "Mijozlar bazasini yo'qotmaslik uchun AmoCRM yoki Bitrix24 o'rnating.",
        en: "Set up AmoCRM or Bitrix24 so the customer base is not lost.",
    },
    Phrase {
        key: PhraseKey::RecSalesTitle,
        uz: "Sotuv menejeri yollang",
        en: "Hire a sales manager",
    },
    Phrase {
        key: PhraseKey::RecSalesBody,
        uz: "Siz biznesni rivojlantirish bilan shug'ullaning, sotuvni profesionallarga topshiring.",
        en: "Focus on growing the business and hand sales over to professionals.",
    },
    Phrase {
        key: PhraseKey::RecAdsTitle,
        uz: "Reklama Strategiyasi",
        en: "Advertising strategy",
    },
    Phrase {
        key: PhraseKey::RecAdsBody,
        uz: "{platform} platformasida byudjetni kichik summadan boshlab (CPL test), lid narxi aniqlangach masshtab qiling.",
        en: "Start {platform} with a small budget (CPL test) and scale once the cost per lead is known.",
    },
    Phrase {
        key: PhraseKey::PlatformFallback,
        uz: "Tanlangan",
        en: "the chosen platform",
    },
    Phrase {
        key: PhraseKey::WasteWarning,
        uz: "Tizim yo'qligi sababli ${amount} ortiqcha sarflashingiz mumkin!",
        en: "Without these systems you may overspend by ${amount}!",
    },
    Phrase {
        key: PhraseKey::HeadingRisk,
        uz: "Biznes Holati",
        en: "Business status",
    },
    Phrase {
        key: PhraseKey::HeadingPlan,
        uz: "Moliyaviy Reja",
        en: "Financial plan",
    },
    Phrase {
        key: PhraseKey::HeadingRecommendations,
        uz: "Asosiy Tavsiyalar",
        en: "Key recommendations",
    },
    Phrase {
        key: PhraseKey::LabelTarget,
        uz: "Maqsad",
        en: "Target",
    },
    Phrase {
        key: PhraseKey::LabelCustomers,
        uz: "Kerakli Mijozlar",
        en: "Customers needed",
    },
    Phrase {
        key: PhraseKey::LabelLeads,
        uz: "Kerakli Lidlar",
        en: "Leads needed",
    },
    Phrase {
        key: PhraseKey::LabelBudget,
        uz: "Reklama Byudjeti",
        en: "Ad budget",
    },
    Phrase {
        key: PhraseKey::PromptStepInvalid,
        uz: "Iltimos, variantlardan birini tanlang yoki o'z qiymatingizni kiriting!",
        en: "Please pick one of the options or enter your own value!",
    },
    Phrase {
        key: PhraseKey::PromptFinancialMissing,
        uz: "Iltimos, moliyaviy ma'lumotlarni kiriting!",
        en: "Please enter the financial details!",
    },
    Phrase {
        key: PhraseKey::StepCrm,
        uz: "Sizda CRM tizimi bormi?",
        en: "Do you use a CRM system?",
    },
    Phrase {
        key: PhraseKey::StepSalesTeam,
        uz: "Alohida sotuv bo'limingiz bormi?",
        en: "Do you have a dedicated sales team?",
    },
    Phrase {
        key: PhraseKey::StepSocial,
        uz: "Ijtimoiy tarmoqlaringiz qanday holatda?",
        en: "How are your social media accounts doing?",
    },
    Phrase {
        key: PhraseKey::StepPlatform,
        uz: "Reklama uchun asosiy platforma",
        en: "Main advertising platform",
    },
    Phrase {
        key: PhraseKey::StepTargetIncome,
        uz: "Oylik maqsadli daromad ($)",
        en: "Monthly target income ($)",
    },
    Phrase {
        key: PhraseKey::StepAvgCheck,
        uz: "O'rtacha chek ($)",
        en: "Average check ($)",
    },
    Phrase {
        key: PhraseKey::StepConversion,
        uz: "Liddan mijozga konversiya (%)",
        en: "Lead-to-customer conversion (%)",
    },
    Phrase {
        key: PhraseKey::OptionYes,
        uz: "Ha",
        en: "Yes",
    },
    Phrase {
        key: PhraseKey::OptionNo,
        uz: "Yo'q",
        en: "No",
    },
    Phrase {
        key: PhraseKey::OptionGood,
        uz: "Yaxshi",
        en: "Good",
    },
    Phrase {
        key: PhraseKey::OptionAverage,
        uz: "O'rtacha",
        en: "Average",
    },
    Phrase {
        key: PhraseKey::OptionBad,
        uz: "Yomon",
        en: "Bad",
    },
    Phrase {
        key: PhraseKey::PromptFinancialInvalid,
        uz: "Iltimos, moliyaviy ko'rsatkichlarni musbat son sifatida kiriting!",
        en: "Please enter the financial details as positive numbers!",
    },
    Phrase {
        key: PhraseKey::PromptCalculationFailed,
        uz: "Kiritilgan qiymatlar bo'yicha hisob-kitob qilib bo'lmadi.",
        en: "The plan could not be calculated for these values.",
    },
];

pub fn phrases() -> &'static [Phrase] {
    &PHRASES
}

pub fn phrase(locale: Locale, key: PhraseKey) -> &'static str {
    PHRASES
        .iter()
        .find(|entry| entry.key == key)
        .map_or_else(|| key.id(), |entry| entry.text(locale))
}

/// Substitutes a single `{name}` placeholder in a catalog template.
pub fn fill(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}
