use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::models::asset::Asset;
use crate::models::month::YearMonth;
use crate::models::summary::{AllocationSlice, AssetPerformance, MonthSummary, MonthlySummary};
use crate::models::transaction::{Transaction, TransactionType};

/// Dashboard aggregates over raw transactions and assets.
///
/// Pure business logic: no I/O, no shared state, never fails. Records whose
/// date cannot be normalized are left out of every month-bucketed figure.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Sum of `current_value` over all assets. Zero for an empty portfolio.
    pub fn net_worth(&self, assets: &[Asset]) -> f64 {
        assets.iter().map(|a| a.current_value).sum()
    }

    /// Income, expenses and profit/loss for the calendar month containing `now`.
    ///
    /// Investment transactions and undated records are ignored.
    pub fn current_month_summary(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> MonthSummary {
        let current = YearMonth::of(&now);

        let (income, expenses) = transactions
            .iter()
            .filter(|tx| tx.month() == Some(current))
            .fold((0.0, 0.0), |(income, expenses), tx| match tx.transaction_type {
                TransactionType::Income => (income + tx.amount, expenses),
                TransactionType::Expense => (income, expenses + tx.amount),
                TransactionType::Investment => (income, expenses),
            });

        MonthSummary {
            income,
            expenses,
            profit_loss: income - expenses,
        }
    }

    /// Group income and expense transactions by calendar month.
    ///
    /// Returns one entry per month that has data, oldest first. Months with no
    /// transactions are NOT synthesized; see [`SummaryService::fill_month_gaps`].
    pub fn monthly_performance(&self, transactions: &[Transaction]) -> Vec<MonthlySummary> {
        let mut buckets: BTreeMap<YearMonth, (f64, f64)> = BTreeMap::new();
        let mut undated = 0usize;

        for tx in transactions {
            if tx.transaction_type == TransactionType::Investment {
                continue;
            }
            let Some(month) = tx.month() else {
                undated += 1;
                continue;
            };

            let (income, expenses) = buckets.entry(month).or_default();
            match tx.transaction_type {
                TransactionType::Income => *income += tx.amount,
                TransactionType::Expense => *expenses += tx.amount,
                TransactionType::Investment => {}
            }
        }

        if undated > 0 {
            tracing::warn!(undated, "Skipped transactions without a usable date");
        }

        buckets
            .into_iter()
            .map(|(month, (income, expenses))| MonthlySummary::new(month, income, expenses))
            .collect()
    }

    /// Insert zero entries for calendar months missing between the first and
    /// last entry of an ascending performance series.
    pub fn fill_month_gaps(&self, series: &[MonthlySummary]) -> Vec<MonthlySummary> {
        let mut filled: Vec<MonthlySummary> = Vec::with_capacity(series.len());

        for entry in series {
            if let Some(mut month) = filled.last().map(|last| last.month.next()) {
                while month < entry.month {
                    filled.push(MonthlySummary::empty(month));
                    month = month.next();
                }
            }
            filled.push(entry.clone());
        }

        filled
    }

    /// Total current value per asset type, in order of first appearance.
    /// Types with no assets get no entry.
    pub fn portfolio_allocation(&self, assets: &[Asset]) -> Vec<AllocationSlice> {
        let mut slices: Vec<AllocationSlice> = Vec::new();

        for asset in assets {
            match slices.iter_mut().find(|s| s.name == asset.asset_type) {
                Some(slice) => slice.value += asset.current_value,
                None => slices.push(AllocationSlice {
                    name: asset.asset_type,
                    value: asset.current_value,
                }),
            }
        }

        slices
    }

    /// The `limit` most recent transactions, newest first.
    /// Undated records sort after every dated one.
    pub fn recent_transactions<'a>(
        &self,
        transactions: &'a [Transaction],
        limit: usize,
    ) -> Vec<&'a Transaction> {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        sorted.truncate(limit);
        sorted
    }

    /// Gain/loss per asset, in input order.
    pub fn asset_performance(&self, assets: &[Asset]) -> Vec<AssetPerformance> {
        assets
            .iter()
            .map(|asset| AssetPerformance {
                asset_name: asset.asset_name.clone(),
                asset_type: asset.asset_type,
                current_value: asset.current_value,
                gain_loss: asset.gain_loss(),
                gain_loss_pct: asset.gain_loss_pct(),
            })
            .collect()
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}
