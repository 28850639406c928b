use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::ledger::Ledger;
use crate::models::transaction::Transaction;

/// Validates and applies edits to a [`Ledger`].
///
/// In-memory only. Persisting the ledger is the caller's concern.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Add a transaction after validating it. Ids must be unique.
    pub fn add_transaction(&self, ledger: &mut Ledger, tx: Transaction) -> Result<(), CoreError> {
        self.validate_transaction(&tx)?;
        if ledger.transactions.iter().any(|t| t.id == tx.id) {
            return Err(CoreError::ValidationError(format!(
                "Transaction {} already exists",
                tx.id
            )));
        }
        ledger.transactions.push(tx);
        Ok(())
    }

    /// Remove a transaction by id, returning it.
    pub fn remove_transaction(&self, ledger: &mut Ledger, id: Uuid) -> Result<Transaction, CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        Ok(ledger.transactions.remove(idx))
    }

    /// Set or clear the notes on an existing transaction.
    pub fn set_transaction_notes(
        &self,
        ledger: &mut Ledger,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<(), CoreError> {
        let tx = ledger
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))?;
        tx.notes = notes;
        Ok(())
    }

    /// Add an asset after validating it. Ids must be unique.
    pub fn add_asset(&self, ledger: &mut Ledger, asset: Asset) -> Result<(), CoreError> {
        self.validate_asset(&asset)?;
        if ledger.assets.iter().any(|a| a.id == asset.id) {
            return Err(CoreError::ValidationError(format!(
                "Asset {} already exists",
                asset.id
            )));
        }
        ledger.assets.push(asset);
        Ok(())
    }

    /// Replace an asset's current market value.
    pub fn update_asset_value(
        &self,
        ledger: &mut Ledger,
        id: Uuid,
        current_value: f64,
    ) -> Result<(), CoreError> {
        validate_amount("Current value", current_value)?;
        let asset = ledger
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;
        asset.current_value = current_value;
        Ok(())
    }

    /// Remove an asset by id, returning it.
    pub fn remove_asset(&self, ledger: &mut Ledger, id: Uuid) -> Result<Asset, CoreError> {
        let idx = ledger
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AssetNotFound(id.to_string()))?;
        Ok(ledger.assets.remove(idx))
    }

    /// Check a whole ledger loaded from outside (storage, JSON import) against
    /// the same rules the add methods enforce, including id uniqueness.
    pub fn validate_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let mut seen = HashSet::with_capacity(ledger.transactions.len());
        for tx in &ledger.transactions {
            self.validate_transaction(tx)?;
            if !seen.insert(tx.id) {
                return Err(CoreError::ValidationError(format!(
                    "Transaction {} already exists",
                    tx.id
                )));
            }
        }

        let mut seen = HashSet::with_capacity(ledger.assets.len());
        for asset in &ledger.assets {
            self.validate_asset(asset)?;
            if !seen.insert(asset.id) {
                return Err(CoreError::ValidationError(format!(
                    "Asset {} already exists",
                    asset.id
                )));
            }
        }
        Ok(())
    }

    /// Rules:
    /// - Amount must be finite and non-negative (the type carries the sign)
    /// - Category must not be blank
    fn validate_transaction(&self, tx: &Transaction) -> Result<(), CoreError> {
        validate_amount("Transaction amount", tx.amount)?;
        if tx.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction category must not be empty".into(),
            ));
        }
        Ok(())
    }

    fn validate_asset(&self, asset: &Asset) -> Result<(), CoreError> {
        validate_amount("Invested amount", asset.invested_amount)?;
        validate_amount("Current value", asset.current_value)?;
        if asset.asset_name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Asset name must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_amount(label: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "{label} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
