use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerSet, FinancialField, KEY_AVG_CHECK, KEY_CONVERSION, KEY_TARGET_INCOME};
use crate::error::AuditError;

/// Largest integer an `f64` represents exactly.
const MAX_EXACT_COUNT: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialInput {
    TargetIncome,
    AvgCheck,
    Conversion,
}

impl FinancialInput {
    pub fn key(self) -> &'static str {
        match self {
            Self::TargetIncome => KEY_TARGET_INCOME,
            Self::AvgCheck => KEY_AVG_CHECK,
            Self::Conversion => KEY_CONVERSION,
        }
    }
}

impl fmt::Display for FinancialInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    pub target_income: f64,
    pub avg_check: f64,
    /// Positive percentage; rates above 100 are taken as given.
    pub conversion_pct: f64,
}

impl FinancialInputs {
    /// Merges overrides and parses the three numeric answers. Reports every
    /// blank field at once before looking at the values.
    pub fn from_answers(answers: &AnswerSet) -> Result<Self, AuditError> {
        let fields = [
            (FinancialInput::TargetIncome, &answers.target_income),
            (FinancialInput::AvgCheck, &answers.avg_check),
            (FinancialInput::Conversion, &answers.conversion),
        ];

        let missing = fields
            .iter()
            .filter(|(_, field)| field.merged().is_none())
            .map(|(input, _)| *input)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(AuditError::MissingFinancialInput(missing));
        }

        let [target, check, conversion] = fields.map(|(input, field)| parse_field(input, field));
        let inputs = Self {
            target_income: target?,
            avg_check: check?,
            conversion_pct: conversion?,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    pub fn validate(&self) -> Result<(), AuditError> {
        if self.target_income <= 0.0 {
            return Err(AuditError::OutOfRange {
                input: FinancialInput::TargetIncome,
                value: self.target_income,
            });
        }
        if self.avg_check <= 0.0 {
            return Err(AuditError::OutOfRange {
                input: FinancialInput::AvgCheck,
                value: self.avg_check,
            });
        }
        if self.conversion_pct <= 0.0 {
            return Err(AuditError::OutOfRange {
                input: FinancialInput::Conversion,
                value: self.conversion_pct,
            });
        }
        Ok(())
    }
}

fn parse_field(input: FinancialInput, field: &FinancialField) -> Result<f64, AuditError> {
    let raw = field.merged().unwrap_or_default();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AuditError::NotANumber {
            input,
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPlan {
    pub target_income: f64,
    pub avg_check: f64,
    pub conversion_pct: f64,
    pub cost_per_lead: f64,
    pub required_customers: u64,
    pub required_leads: u64,
    pub min_budget: u64,
    pub efficiency_loss_pct: u32,
    pub wasted_budget: u64,
    pub total_budget: u64,
}

impl FinancialPlan {
    pub fn budget_range(&self) -> RangeInclusive<u64> {
        self.min_budget..=self.total_budget
    }

    pub fn has_waste_warning(&self) -> bool {
        self.efficiency_loss_pct > 0
    }
}

pub fn compute_plan(
    inputs: &FinancialInputs,
    efficiency_loss_pct: u32,
    cost_per_lead: f64,
) -> Result<FinancialPlan, AuditError> {
    inputs.validate()?;

    let required_customers = ceil_count(
        inputs.target_income / inputs.avg_check,
        "required customers",
    )?;
    let required_leads = ceil_count(
        to_f64(required_customers) / (inputs.conversion_pct / 100.0),
        "required leads",
    )?;
    let min_budget = ceil_count(to_f64(required_leads) * cost_per_lead, "minimum budget")?;
    // Integer ceiling of min_budget * pct / 100 keeps the waste exact.
    let wasted_budget = min_budget
        .checked_mul(u64::from(efficiency_loss_pct))
        .map(|scaled| scaled.div_ceil(100))
        .ok_or(AuditError::Overflow("wasted budget"))?;
    let total_budget = min_budget
        .checked_add(wasted_budget)
        .ok_or(AuditError::Overflow("total budget"))?;

    Ok(FinancialPlan {
        target_income: inputs.target_income,
        avg_check: inputs.avg_check,
        conversion_pct: inputs.conversion_pct,
        cost_per_lead,
        required_customers,
        required_leads,
        min_budget,
        efficiency_loss_pct,
        wasted_budget,
        total_budget,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_count(value: f64, what: &'static str) -> Result<u64, AuditError> {
    let ceiled = value.ceil();
    if !ceiled.is_finite() || ceiled < 0.0 || ceiled > MAX_EXACT_COUNT {
        return Err(AuditError::Overflow(what));
    }
    Ok(ceiled as u64)
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(count: u64) -> f64 {
    count as f64
}
