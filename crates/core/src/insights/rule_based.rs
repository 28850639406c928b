use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::settings::InsightThresholds;
use crate::models::snapshot::{CategorySpending, FinancialSnapshot};

use super::traits::InsightGenerator;

/// Deterministic generator that applies the insight trigger policy directly:
///
/// - expense growth streak at or above the configured length
/// - a single asset type holding at least the configured share of the portfolio
/// - category spending up by at least the configured fraction, largest first
///
/// Output is capped at `max_insights` sentences, in that priority order.
pub struct RuleBasedInsightGenerator {
    thresholds: InsightThresholds,
}

impl RuleBasedInsightGenerator {
    pub fn new() -> Self {
        Self::with_thresholds(InsightThresholds::default())
    }

    pub fn with_thresholds(thresholds: InsightThresholds) -> Self {
        Self { thresholds }
    }

    fn observations(&self, snapshot: &FinancialSnapshot) -> Vec<String> {
        let t = &self.thresholds;
        let mut out = Vec::new();

        let streak = snapshot.trends.expense_growth_streak;
        if t.expense_growth_streak > 0 && streak >= t.expense_growth_streak {
            out.push(format!(
                "Your expenses have grown for {streak} consecutive months."
            ));
        }

        for share in &snapshot.portfolio_allocation {
            if share.percentage >= t.allocation_concentration {
                out.push(format!(
                    "{} makes up {:.0}% of your portfolio.",
                    share.asset_type,
                    share.percentage * 100.0
                ));
            }
        }

        let mut rising: Vec<&CategorySpending> = snapshot
            .spending_by_category
            .iter()
            .filter(|c| c.change >= t.category_increase)
            .collect();
        rising.sort_by(|a, b| {
            b.change
                .partial_cmp(&a.change)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for c in rising {
            out.push(format!(
                "{} spending is up {:.0}% compared to last month.",
                c.category,
                c.change * 100.0
            ));
        }

        out.truncate(t.max_insights);
        out
    }
}

impl Default for RuleBasedInsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightGenerator for RuleBasedInsightGenerator {
    fn name(&self) -> &str {
        "RuleBased"
    }

    async fn generate(&self, snapshot: &FinancialSnapshot) -> Result<Vec<String>, CoreError> {
        Ok(self.observations(snapshot))
    }
}
