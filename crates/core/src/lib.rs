pub mod errors;
pub mod insights;
pub mod models;
pub mod services;

use chrono::{DateTime, Utc};
use models::{
    asset::{Asset, AssetType},
    ledger::Ledger,
    settings::{InsightThresholds, Settings},
    snapshot::FinancialSnapshot,
    summary::{AllocationSlice, AssetPerformance, MonthSummary, MonthlySummary},
    transaction::{DateSource, Transaction, TransactionType},
};
use insights::traits::InsightGenerator;
use services::{
    insight_service::InsightService, ledger_service::LedgerService,
    snapshot_service::SnapshotService, summary_service::SummaryService,
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the finance snapshot core library.
/// Holds one user's ledger and the services that operate on it.
#[must_use]
pub struct FinanceTracker {
    ledger: Ledger,
    ledger_service: LedgerService,
    summary_service: SummaryService,
    snapshot_service: SnapshotService,
    insight_service: InsightService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for FinanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("transactions", &self.ledger.transactions.len())
            .field("assets", &self.ledger.assets.len())
            .field("settings", &self.ledger.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl FinanceTracker {
    /// Create an empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Wrap an already loaded ledger (e.g. read by the storage layer).
    /// Rejects the whole ledger if any record fails validation.
    pub fn from_ledger(ledger: Ledger) -> Result<Self, CoreError> {
        LedgerService::new().validate_ledger(&ledger)?;
        Ok(Self::build(ledger))
    }

    /// Load a ledger previously produced by [`FinanceTracker::to_json`].
    pub fn import_from_json(json: &str) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_str(json)?;
        Self::from_ledger(ledger)
    }

    /// Serialize the whole ledger (transactions, assets, settings) as JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns `true` if the ledger has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Clear the unsaved-changes flag once the caller has persisted the ledger.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Record a transaction. Returns its generated ID.
    pub fn add_transaction(
        &mut self,
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<DateSource>,
    ) -> Result<Uuid, CoreError> {
        self.insert_transaction(Transaction::new(transaction_type, category, amount, date))
    }

    /// Record a transaction with notes attached.
    pub fn add_transaction_with_notes(
        &mut self,
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<DateSource>,
        notes: impl Into<String>,
    ) -> Result<Uuid, CoreError> {
        self.insert_transaction(Transaction::with_notes(
            transaction_type,
            category,
            amount,
            date,
            notes,
        ))
    }

    /// Add multiple transactions at once. All are validated first;
    /// if any fails, none are added (all-or-nothing).
    pub fn add_transactions(&mut self, transactions: Vec<Transaction>) -> Result<Vec<Uuid>, CoreError> {
        let mut temp = self.ledger.clone();
        let mut ids = Vec::with_capacity(transactions.len());

        for tx in transactions {
            ids.push(tx.id);
            self.ledger_service.add_transaction(&mut temp, tx)?;
        }

        self.ledger = temp;
        self.dirty = true;
        Ok(ids)
    }

    /// Import a JSON array of transactions (all-or-nothing).
    /// Returns the number of transactions imported.
    pub fn import_transactions_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let transactions: Vec<Transaction> = serde_json::from_str(json)?;
        let count = transactions.len();
        self.add_transactions(transactions)?;
        Ok(count)
    }

    /// Remove a transaction by ID, returning it.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction, CoreError> {
        let removed = self.ledger_service.remove_transaction(&mut self.ledger, id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Set or clear notes on an existing transaction.
    pub fn set_transaction_notes(&mut self, id: Uuid, notes: Option<String>) -> Result<(), CoreError> {
        self.ledger_service
            .set_transaction_notes(&mut self.ledger, id, notes)?;
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn get_transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions, newest first. Undated records come last.
    #[must_use]
    pub fn get_transactions(&self) -> Vec<&Transaction> {
        self.summary_service
            .recent_transactions(&self.ledger.transactions, self.ledger.transactions.len())
    }

    /// Transactions of one type, newest first.
    #[must_use]
    pub fn get_transactions_by_type(&self, transaction_type: TransactionType) -> Vec<&Transaction> {
        self.get_transactions()
            .into_iter()
            .filter(|t| t.transaction_type == transaction_type)
            .collect()
    }

    /// The most recent transactions, capped at the configured limit.
    #[must_use]
    pub fn recent_transactions(&self) -> Vec<&Transaction> {
        self.summary_service.recent_transactions(
            &self.ledger.transactions,
            self.ledger.settings.recent_transactions_limit,
        )
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    // ── Assets ──────────────────────────────────────────────────────

    /// Record an asset. Returns its generated ID.
    pub fn add_asset(
        &mut self,
        asset_type: AssetType,
        asset_name: impl Into<String>,
        invested_amount: f64,
        current_value: f64,
    ) -> Result<Uuid, CoreError> {
        let asset = Asset::new(asset_type, asset_name, invested_amount, current_value);
        let id = asset.id;
        self.ledger_service.add_asset(&mut self.ledger, asset)?;
        self.dirty = true;
        Ok(id)
    }

    /// Refresh an asset's current market value.
    pub fn update_asset_value(&mut self, id: Uuid, current_value: f64) -> Result<(), CoreError> {
        self.ledger_service
            .update_asset_value(&mut self.ledger, id, current_value)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove an asset by ID, returning it.
    pub fn remove_asset(&mut self, id: Uuid) -> Result<Asset, CoreError> {
        let removed = self.ledger_service.remove_asset(&mut self.ledger, id)?;
        self.dirty = true;
        Ok(removed)
    }

    #[must_use]
    pub fn get_asset(&self, id: Uuid) -> Option<&Asset> {
        self.ledger.assets.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn get_assets(&self) -> &[Asset] {
        &self.ledger.assets
    }

    // ── Summaries ───────────────────────────────────────────────────

    /// Sum of current values of all assets.
    #[must_use]
    pub fn net_worth(&self) -> f64 {
        self.summary_service.net_worth(&self.ledger.assets)
    }

    /// Income, expenses and profit/loss for this calendar month (UTC).
    #[must_use]
    pub fn current_month_summary(&self) -> MonthSummary {
        self.current_month_summary_at(Utc::now())
    }

    #[must_use]
    pub fn current_month_summary_at(&self, now: DateTime<Utc>) -> MonthSummary {
        self.summary_service
            .current_month_summary(&self.ledger.transactions, now)
    }

    /// Sparse monthly income/expense series, oldest first.
    #[must_use]
    pub fn monthly_performance(&self) -> Vec<MonthlySummary> {
        self.summary_service
            .monthly_performance(&self.ledger.transactions)
    }

    /// Monthly series with empty months between the first and last entry filled in.
    #[must_use]
    pub fn monthly_performance_contiguous(&self) -> Vec<MonthlySummary> {
        let series = self.monthly_performance();
        self.summary_service.fill_month_gaps(&series)
    }

    /// Total value per asset type.
    #[must_use]
    pub fn portfolio_allocation(&self) -> Vec<AllocationSlice> {
        self.summary_service
            .portfolio_allocation(&self.ledger.assets)
    }

    /// Gain/loss per asset.
    #[must_use]
    pub fn asset_performance(&self) -> Vec<AssetPerformance> {
        self.summary_service.asset_performance(&self.ledger.assets)
    }

    // ── Snapshot & Insights ─────────────────────────────────────────

    /// Build the snapshot for the current calendar month.
    #[must_use]
    pub fn financial_snapshot(&self) -> FinancialSnapshot {
        self.financial_snapshot_at(Utc::now())
    }

    #[must_use]
    pub fn financial_snapshot_at(&self, now: DateTime<Utc>) -> FinancialSnapshot {
        self.snapshot_service.create_financial_snapshot(
            &self.ledger.transactions,
            &self.ledger.assets,
            now,
        )
    }

    /// Build the current snapshot and ask `generator` for insights about it.
    ///
    /// Generator failures are logged and reported as
    /// [`CoreError::InsightsUnavailable`].
    pub async fn generate_insights(
        &self,
        generator: &dyn InsightGenerator,
    ) -> Result<Vec<String>, CoreError> {
        self.generate_insights_at(generator, Utc::now()).await
    }

    pub async fn generate_insights_at(
        &self,
        generator: &dyn InsightGenerator,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>, CoreError> {
        let snapshot = self.financial_snapshot_at(now);
        let limit = self.ledger.settings.insight_thresholds.max_insights;
        self.insight_service
            .generate(generator, &snapshot, limit)
            .await
            .map_err(|_| CoreError::InsightsUnavailable)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the ledger currency (e.g., "USD", "EUR").
    /// Currency code must be a 3-letter alphabetic string.
    pub fn set_default_currency(&mut self, currency: String) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., USD, EUR)"
            )));
        }
        self.ledger.settings.default_currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    /// Set how many entries [`FinanceTracker::recent_transactions`] returns.
    pub fn set_recent_transactions_limit(&mut self, limit: usize) -> Result<(), CoreError> {
        if limit == 0 {
            return Err(CoreError::ValidationError(
                "Recent transactions limit must be at least 1".into(),
            ));
        }
        self.ledger.settings.recent_transactions_limit = limit;
        self.dirty = true;
        Ok(())
    }

    /// Replace the insight trigger thresholds.
    pub fn set_insight_thresholds(&mut self, thresholds: InsightThresholds) -> Result<(), CoreError> {
        for (name, value) in [
            ("category_increase", thresholds.category_increase),
            ("allocation_concentration", thresholds.allocation_concentration),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Insight threshold {name} must be a non-negative number, got {value}"
                )));
            }
        }
        if thresholds.max_insights == 0 {
            return Err(CoreError::ValidationError(
                "Insight threshold max_insights must be at least 1".into(),
            ));
        }
        self.ledger.settings.insight_thresholds = thresholds;
        self.dirty = true;
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn insert_transaction(&mut self, tx: Transaction) -> Result<Uuid, CoreError> {
        let id = tx.id;
        self.ledger_service.add_transaction(&mut self.ledger, tx)?;
        self.dirty = true;
        Ok(id)
    }

    fn build(ledger: Ledger) -> Self {
        Self {
            ledger,
            ledger_service: LedgerService::new(),
            summary_service: SummaryService::new(),
            snapshot_service: SnapshotService::new(),
            insight_service: InsightService::new(),
            dirty: false,
        }
    }
}
