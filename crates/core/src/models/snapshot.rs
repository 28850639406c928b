use serde::{Deserialize, Serialize};

use super::asset::AssetType;

/// The aggregated view of a user's finances at the moment of computation.
///
/// Serialized as camelCase JSON, this is the exact payload handed to an
/// insight generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub current_month: MonthFigures,
    pub previous_month: MonthFigures,
    pub net_worth: f64,
    /// Categories with non-zero spending this month, sorted by name
    pub spending_by_category: Vec<CategorySpending>,
    /// One entry per asset type held, largest value first
    pub portfolio_allocation: Vec<AllocationShare>,
    pub trends: Trends,
}

/// Income/expense figures for one month. Zero when the month has no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthFigures {
    pub income: f64,
    pub expenses: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,

    /// This month's spending in the category
    pub amount: f64,

    /// Fractional change against last month. `1.0` when last month was zero.
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationShare {
    pub asset_type: AssetType,
    pub value: f64,
    /// value / net worth, or 0 when net worth is not positive
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    /// Consecutive most-recent months with strictly increasing expenses
    pub expense_growth_streak: u32,
}
