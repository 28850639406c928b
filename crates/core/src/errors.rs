use thiserror::Error;

/// Unified error type for the finance-snapshot-core library.
///
/// The snapshot computations never fail; this type covers the surfaces
/// around them (ledger edits, JSON import/export, insight generation).
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    // ── Insights ────────────────────────────────────────────────────
    #[error("Insight generation failed ({generator}): {message}")]
    Insights {
        generator: String,
        message: String,
    },

    #[error("Failed to generate insights. Please try again later.")]
    InsightsUnavailable,
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
