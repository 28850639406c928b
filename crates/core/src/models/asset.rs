use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The type/category of a held asset. Allocation is grouped by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    Cash,
    Stock,
    Crypto,
    Forex,
    Other,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetType::Cash => write!(f, "Cash"),
            AssetType::Stock => write!(f, "Stock"),
            AssetType::Crypto => write!(f, "Crypto"),
            AssetType::Forex => write!(f, "Forex"),
            AssetType::Other => write!(f, "Other"),
        }
    }
}

/// A portfolio position.
///
/// Everything except `current_value` is fixed once recorded; the current
/// value is refreshed by whoever owns the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,

    pub asset_type: AssetType,

    /// Human-readable name (e.g., "Checking Account", "AAPL", "Bitcoin")
    pub asset_name: String,

    /// Cost basis
    pub invested_amount: f64,

    /// Current market value. May be zero.
    pub current_value: f64,
}

impl Asset {
    pub fn new(
        asset_type: AssetType,
        asset_name: impl Into<String>,
        invested_amount: f64,
        current_value: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_type,
            asset_name: asset_name.into(),
            invested_amount,
            current_value,
        }
    }

    /// Convenience constructors for common asset types
    pub fn cash(asset_name: impl Into<String>, invested_amount: f64, current_value: f64) -> Self {
        Self::new(AssetType::Cash, asset_name, invested_amount, current_value)
    }

    pub fn stock(asset_name: impl Into<String>, invested_amount: f64, current_value: f64) -> Self {
        Self::new(AssetType::Stock, asset_name, invested_amount, current_value)
    }

    pub fn crypto(asset_name: impl Into<String>, invested_amount: f64, current_value: f64) -> Self {
        Self::new(AssetType::Crypto, asset_name, invested_amount, current_value)
    }

    pub fn forex(asset_name: impl Into<String>, invested_amount: f64, current_value: f64) -> Self {
        Self::new(AssetType::Forex, asset_name, invested_amount, current_value)
    }

    /// Absolute gain/loss: current value minus cost basis.
    pub fn gain_loss(&self) -> f64 {
        self.current_value - self.invested_amount
    }

    /// Gain/loss as a fraction of the cost basis, 0 when nothing was invested.
    pub fn gain_loss_pct(&self) -> f64 {
        if self.invested_amount == 0.0 {
            0.0
        } else {
            self.gain_loss() / self.invested_amount
        }
    }
}
