//! Batch orchestrator
//!
//! Resolves an arbitrarily long list of logins by planning chunks and
//! fetching them one after another. Chunk failures are recorded in the
//! report; only failing to obtain the initial credential aborts the run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use dunkstats_common::Clock;
use dunkstats_domain::{BatchFailure, BatchRequest, FetchConfig, FetchReport, Result, TwitchUser};
use tracing::{debug, info, warn};

use super::fetcher::RetryingFetcher;
use super::policy::RetryPolicy;
use super::ports::UserLookup;
use crate::auth::TokenRefresher;
use crate::planner::plan_chunks;

/// Sequential chunked lookup with partial-failure reporting.
pub struct BatchOrchestrator {
    lookup: Arc<dyn UserLookup>,
    refresher: TokenRefresher,
    fetcher: RetryingFetcher,
    clock: Arc<dyn Clock>,
    chunk_size: usize,
    inter_batch_delay: Duration,
}

impl std::fmt::Debug for BatchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchOrchestrator")
            .field("fetcher", &self.fetcher)
            .field("chunk_size", &self.chunk_size)
            .field("inter_batch_delay", &self.inter_batch_delay)
            .finish_non_exhaustive()
    }
}

impl BatchOrchestrator {
    /// Build an orchestrator from the fetch configuration.
    pub fn new(
        lookup: Arc<dyn UserLookup>,
        refresher: TokenRefresher,
        clock: Arc<dyn Clock>,
        config: &FetchConfig,
    ) -> Self {
        Self {
            lookup,
            refresher,
            fetcher: RetryingFetcher::new(RetryPolicy::from_config(config), Arc::clone(&clock)),
            clock,
            chunk_size: config.chunk_size,
            inter_batch_delay: config.inter_batch_delay(),
        }
    }

    /// Refresher used for the initial credential and auth recovery.
    pub fn refresher(&self) -> &TokenRefresher {
        &self.refresher
    }

    /// Resolve `identifiers` to user records.
    ///
    /// # Errors
    /// `DunkstatsError::Auth` when no credential can be obtained before the
    /// first lookup. Chunk-level failures are reported in
    /// [`FetchReport::failures`] instead.
    pub async fn fetch_all(&self, identifiers: &[String]) -> Result<FetchReport> {
        if identifiers.is_empty() {
            debug!("no identifiers to resolve");
            return Ok(FetchReport::default());
        }

        self.refresher.ensure_credential().await?;

        let plan = plan_chunks(identifiers, self.chunk_size);
        let total_chunks = plan.len();
        info!(identifiers = identifiers.len(), chunks = total_chunks, "starting batch fetch");

        let mut report = FetchReport::default();

        for (chunk_index, chunk) in plan.enumerate() {
            if chunk_index > 0 {
                self.clock.sleep(self.inter_batch_delay).await;
            }

            let mut request = BatchRequest::new(chunk_index, chunk.to_vec());
            match self.fetcher.fetch_batch(self.lookup.as_ref(), &self.refresher, &mut request).await {
                Ok(records) => {
                    let missing = count_missing(chunk, &records);
                    info!(
                        chunk = chunk_index,
                        attempt = request.attempt,
                        records = records.len(),
                        missing,
                        "chunk fetched"
                    );
                    report.unresolved_count += missing;
                    report.records.extend(records);
                }
                Err(error) => {
                    warn!(
                        chunk = chunk_index,
                        attempt = request.attempt,
                        identifiers = chunk.len(),
                        error = %error,
                        "chunk failed"
                    );
                    report.unresolved_count += chunk.len();
                    report.failures.push(BatchFailure {
                        chunk_index,
                        identifiers: request.identifiers,
                        error,
                    });
                }
            }
        }

        info!(
            records = report.records.len(),
            unresolved = report.unresolved_count,
            failed_chunks = report.failures.len(),
            "batch fetch finished"
        );
        Ok(report)
    }
}

/// Identifiers of `chunk` without a matching record, compared
/// case-insensitively.
fn count_missing(chunk: &[String], records: &[TwitchUser]) -> usize {
    let found: HashSet<String> = records.iter().map(TwitchUser::key).collect();
    chunk.iter().filter(|login| !found.contains(&login.to_lowercase())).count()
}
