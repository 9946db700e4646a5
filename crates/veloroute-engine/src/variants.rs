//! Producing several diverse route suggestions for one request.
//!
//! Each variant is an independent convergence search anchored at its own
//! seed window, so successive suggestions differ geometrically instead of
//! being near-duplicates. Variants that fail outright are skipped; the
//! orchestrator fails only when nothing at all could be produced.

use std::time::Duration;

use rand::Rng;

use veloroute_directions::{DirectionsProvider, RoutePlan};

use crate::error::EngineError;
use crate::search::{ParameterSearch, SearchResult, SearchTarget};

const DEFAULT_DESIRED_COUNT: u32 = 3;
const DEFAULT_VARIANT_CAP: u32 = 6;

/// Search runs one variant may burn before being skipped. Separate from the
/// search's own internal attempt budget.
const VARIANT_RETRY_BUDGET: u32 = 2;
const VARIANT_RETRY_BASE_MS: u64 = 300;
const VARIANT_RETRY_STEP_MS: u64 = 200;

/// Seed window width per variant; attempt jitter inside the search stays
/// under this so windows never overlap.
const VARIANT_SEED_STRIDE: u64 = 100;
const VARIANT_SEED_JITTER: u64 = 50;

/// One successful variant: which slot it came from and what the search found.
#[derive(Debug, Clone)]
pub struct VariantRoute {
    pub variant_index: u32,
    pub result: SearchResult,
}

/// Repeats the parameter search across seed windows until enough diverse
/// routes are collected.
pub struct VariantOrchestrator<'a, P> {
    provider: &'a P,
    desired_count: u32,
    variant_cap: u32,
}

impl<'a, P: DirectionsProvider> VariantOrchestrator<'a, P> {
    #[must_use]
    pub fn new(provider: &'a P) -> Self {
        Self::with_limits(provider, DEFAULT_DESIRED_COUNT, DEFAULT_VARIANT_CAP)
    }

    #[must_use]
    pub fn with_limits(provider: &'a P, desired_count: u32, variant_cap: u32) -> Self {
        Self {
            provider,
            desired_count,
            variant_cap,
        }
    }

    /// Runs up to `variant_cap` variants, stopping early once
    /// `desired_count` usable routes are collected. Variants run
    /// sequentially; the provider documents no concurrency allowance, so
    /// pacing stays conservative.
    ///
    /// The GPX export for each collected route is fetched best-effort with
    /// the exact parameters that produced it; an export failure logs a
    /// warning and leaves the payload empty.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AllVariantsFailed`] when every variant's every
    /// search run failed, never because tolerance was unmet.
    pub async fn generate(
        &self,
        target: &SearchTarget,
        plan_template: &RoutePlan,
    ) -> Result<Vec<VariantRoute>, EngineError> {
        let search = ParameterSearch::new(self.provider);
        let mut collected: Vec<VariantRoute> = Vec::new();

        for variant_index in 1..=self.variant_cap {
            if collected.len() >= self.desired_count as usize {
                break;
            }

            let seed_base = u64::from(variant_index) * VARIANT_SEED_STRIDE
                + rand::rng().random_range(0..VARIANT_SEED_JITTER);

            let mut outcome = None;
            for attempt in 0..VARIANT_RETRY_BUDGET {
                match search.run(target, plan_template.clone(), seed_base).await {
                    Ok(result) => {
                        outcome = Some(result);
                        break;
                    }
                    Err(err) => {
                        tracing::warn!(
                            variant_index,
                            attempt = attempt + 1,
                            budget = VARIANT_RETRY_BUDGET,
                            error = %err,
                            "variant search run failed"
                        );
                        if attempt + 1 < VARIANT_RETRY_BUDGET {
                            let delay =
                                VARIANT_RETRY_BASE_MS + VARIANT_RETRY_STEP_MS * u64::from(attempt);
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                        }
                    }
                }
            }

            let Some(mut result) = outcome else {
                tracing::warn!(variant_index, "variant exhausted its retry budget, skipping");
                continue;
            };

            result.candidate.gpx = self.fetch_gpx(plan_template, &result).await;
            collected.push(VariantRoute {
                variant_index,
                result,
            });
        }

        if collected.is_empty() {
            return Err(EngineError::AllVariantsFailed {
                attempted: self.variant_cap,
            });
        }

        tracing::info!(
            collected = collected.len(),
            desired = self.desired_count,
            "variant generation finished"
        );
        Ok(collected)
    }

    async fn fetch_gpx(&self, plan_template: &RoutePlan, result: &SearchResult) -> String {
        let mut plan = plan_template.clone();
        plan.params = result.candidate.params_used;
        match self.provider.export_gpx(&plan).await {
            Ok(gpx) => gpx,
            Err(err) => {
                tracing::warn!(error = %err, "GPX export failed, returning route without export");
                String::new()
            }
        }
    }
}
