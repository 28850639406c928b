use serde::{Deserialize, Serialize};

use super::asset::Asset;
use super::settings::Settings;
use super::transaction::Transaction;

/// The per-user data container: every transaction and asset plus settings.
///
/// This is what gets exported/imported as JSON. Aggregates are never stored
/// here; they are recomputed from these records on every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Transactions in insertion order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub assets: Vec<Asset>,

    #[serde(default)]
    pub settings: Settings,
}
