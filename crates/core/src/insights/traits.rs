use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::snapshot::FinancialSnapshot;

/// Trait abstraction for anything that turns a snapshot into short
/// observational sentences.
///
/// A remote text-completion backend and the local rule-based generator both
/// implement this; the rest of the crate only ever sees the trait object.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    /// Human-readable name of this generator (for logs/errors).
    fn name(&self) -> &str;

    /// Produce observations about `snapshot`. An empty list is a valid answer.
    async fn generate(&self, snapshot: &FinancialSnapshot) -> Result<Vec<String>, CoreError>;
}
