use crate::errors::CoreError;
use crate::insights::traits::InsightGenerator;
use crate::models::snapshot::FinancialSnapshot;

/// Runs an [`InsightGenerator`] and normalizes what comes back.
///
/// Blank sentences are dropped and the list is capped at `limit`, whatever
/// the generator returned. Generator failures are logged and re-raised as
/// [`CoreError::Insights`].
pub struct InsightService;

impl InsightService {
    pub fn new() -> Self {
        Self
    }

    pub async fn generate(
        &self,
        generator: &dyn InsightGenerator,
        snapshot: &FinancialSnapshot,
        limit: usize,
    ) -> Result<Vec<String>, CoreError> {
        let raw = match generator.generate(snapshot).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(generator = generator.name(), error = %e, "Insight generation failed");
                return Err(match e {
                    err @ CoreError::Insights { .. } => err,
                    other => CoreError::Insights {
                        generator: generator.name().to_string(),
                        message: other.to_string(),
                    },
                });
            }
        };

        let returned = raw.len();
        let insights: Vec<String> = raw
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(limit)
            .collect();

        tracing::info!(
            generator = generator.name(),
            returned,
            kept = insights.len(),
            "Generated insights"
        );

        Ok(insights)
    }
}

impl Default for InsightService {
    fn default() -> Self {
        Self::new()
    }
}
