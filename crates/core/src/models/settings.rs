use serde::{Deserialize, Serialize};

/// User-configurable settings, stored inside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The currency all amounts are recorded in (e.g., "USD", "EUR").
    pub default_currency: String,

    /// How many entries the "recent transactions" listing returns.
    #[serde(default = "default_recent_limit")]
    pub recent_transactions_limit: usize,

    #[serde(default)]
    pub insight_thresholds: InsightThresholds,
}

fn default_recent_limit() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            recent_transactions_limit: default_recent_limit(),
            insight_thresholds: InsightThresholds::default(),
        }
    }
}

/// Trigger levels for the rule-based insight generator.
///
/// Ratios are fractions: `0.15` means a 15% month-over-month increase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Minimum category spending change worth mentioning
    pub category_increase: f64,

    /// Share of the portfolio a single asset type must reach to be flagged
    pub allocation_concentration: f64,

    /// Expense growth streak length worth mentioning
    pub expense_growth_streak: u32,

    /// Upper bound on the number of insights returned
    pub max_insights: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            category_increase: 0.15,
            allocation_concentration: 0.60,
            expense_growth_streak: 3,
            max_insights: 3,
        }
    }
}
