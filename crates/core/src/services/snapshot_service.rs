use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::asset::Asset;
use crate::models::month::YearMonth;
use crate::models::snapshot::{
    AllocationShare, CategorySpending, FinancialSnapshot, MonthFigures, Trends,
};
use crate::models::summary::MonthlySummary;
use crate::models::transaction::{Transaction, TransactionType};
use crate::services::summary_service::SummaryService;

/// Builds the [`FinancialSnapshot`] handed to insight generators.
///
/// Everything is recomputed from the input records on every call; the same
/// inputs and `now` always produce the same snapshot.
pub struct SnapshotService {
    summary_service: SummaryService,
}

impl SnapshotService {
    pub fn new() -> Self {
        Self {
            summary_service: SummaryService::new(),
        }
    }

    /// Compute the full snapshot relative to the calendar month containing `now`.
    pub fn create_financial_snapshot(
        &self,
        transactions: &[Transaction],
        assets: &[Asset],
        now: DateTime<Utc>,
    ) -> FinancialSnapshot {
        let current = YearMonth::of(&now);
        let performance = self.summary_service.monthly_performance(transactions);
        let net_worth = self.summary_service.net_worth(assets);

        let snapshot = FinancialSnapshot {
            current_month: Self::month_figures(&performance, current),
            previous_month: Self::month_figures(&performance, current.previous()),
            net_worth,
            spending_by_category: self.spending_by_category(transactions, current),
            portfolio_allocation: self.allocation_shares(assets, net_worth),
            trends: Trends {
                expense_growth_streak: self.expense_growth_streak(&performance),
            },
        };

        tracing::debug!(
            month = %current,
            months = performance.len(),
            categories = snapshot.spending_by_category.len(),
            asset_types = snapshot.portfolio_allocation.len(),
            streak = snapshot.trends.expense_growth_streak,
            "Computed financial snapshot"
        );

        snapshot
    }

    /// Per-category spending for `month` with the change against the month before.
    ///
    /// Only categories with non-zero spending in `month` are returned, sorted
    /// by category name. A category that disappeared this month is omitted.
    pub fn spending_by_category(
        &self,
        transactions: &[Transaction],
        month: YearMonth,
    ) -> Vec<CategorySpending> {
        let previous = month.previous();
        let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

        for tx in transactions {
            if tx.transaction_type != TransactionType::Expense {
                continue;
            }
            match tx.month() {
                Some(m) if m == month => {
                    totals.entry(tx.category.as_str()).or_default().0 += tx.amount;
                }
                Some(m) if m == previous => {
                    totals.entry(tx.category.as_str()).or_default().1 += tx.amount;
                }
                _ => {}
            }
        }

        totals
            .into_iter()
            .filter(|(_, (current, _))| *current > 0.0)
            .map(|(category, (current, previous))| CategorySpending {
                category: category.to_string(),
                amount: current,
                change: category_change(current, previous),
            })
            .collect()
    }

    /// Allocation by asset type with each type's share of `net_worth`,
    /// largest value first.
    pub fn allocation_shares(&self, assets: &[Asset], net_worth: f64) -> Vec<AllocationShare> {
        let mut shares: Vec<AllocationShare> = self
            .summary_service
            .portfolio_allocation(assets)
            .into_iter()
            .map(|slice| AllocationShare {
                asset_type: slice.name,
                value: slice.value,
                percentage: if net_worth > 0.0 {
                    slice.value / net_worth
                } else {
                    0.0
                },
            })
            .collect();

        shares.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.asset_type.cmp(&b.asset_type))
        });
        shares
    }

    /// Number of most-recent months with strictly increasing expenses.
    ///
    /// Walks the (sparse, ascending) series from the newest entry backwards
    /// while each month's expenses exceed the next older month's. The newest
    /// month alone counts as 1 if it has any expenses; an empty series or a
    /// newest month without expenses yields 0. An older month without
    /// expenses ends the streak and is not counted.
    pub fn expense_growth_streak(&self, series: &[MonthlySummary]) -> u32 {
        let mut newest_first = series.iter().rev();
        let Some(newest) = newest_first.next() else {
            return 0;
        };
        if newest.expenses <= 0.0 {
            return 0;
        }

        let mut streak = 1;
        let mut later = newest.expenses;
        for older in newest_first {
            if older.expenses > 0.0 && later > older.expenses {
                streak += 1;
                later = older.expenses;
            } else {
                break;
            }
        }
        streak
    }

    fn month_figures(performance: &[MonthlySummary], month: YearMonth) -> MonthFigures {
        performance
            .binary_search_by_key(&month, |m| m.month)
            .ok()
            .map(|idx| {
                let m = &performance[idx];
                MonthFigures {
                    income: m.income,
                    expenses: m.expenses,
                    net_cash_flow: m.net,
                }
            })
            .unwrap_or_default()
    }
}

impl Default for SnapshotService {
    fn default() -> Self {
        Self::new()
    }
}

/// Month-over-month change as a fraction of last month's spending.
///
/// New spending (nothing last month) counts as a 100% increase rather than an
/// undefined ratio.
pub fn category_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous
    } else {
        1.0
    }
}
