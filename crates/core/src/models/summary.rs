use serde::{Deserialize, Serialize};

use super::asset::AssetType;
use super::month::YearMonth;

/// Income and expenses for the current calendar month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub income: f64,
    pub expenses: f64,
    /// income - expenses
    pub profit_loss: f64,
}

/// One month of the performance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: YearMonth,

    /// Chart label, e.g. "Mar 25"
    pub label: String,

    pub income: f64,
    pub expenses: f64,

    /// income - expenses
    pub net: f64,
}

impl MonthlySummary {
    pub fn new(month: YearMonth, income: f64, expenses: f64) -> Self {
        Self {
            month,
            label: month.label(),
            income,
            expenses,
            net: income - expenses,
        }
    }

    /// A month with no activity.
    pub fn empty(month: YearMonth) -> Self {
        Self::new(month, 0.0, 0.0)
    }
}

/// Total current value held in one asset type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub name: AssetType,
    pub value: f64,
}

/// Gain/loss row for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPerformance {
    pub asset_name: String,
    pub asset_type: AssetType,
    pub current_value: f64,
    pub gain_loss: f64,
    /// Fraction of the invested amount, 0 when nothing was invested
    pub gain_loss_pct: f64,
}
