use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use phimdex_providers::{ProviderCapabilities, ProviderRegistry};

use crate::error::StoreError;
use crate::store::MovieStore;

/// Counters from one catalog refresh run.
#[derive(Debug, Default, Serialize)]
pub struct CatalogRefreshOutcome {
    pub pages_fetched: u32,
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub enriched: usize,
    pub errors: Vec<String>,
}

/// Walks the master-list provider's latest titles into the movie cache.
///
/// Every candidate goes through the store's merge-upsert, so repeated
/// refreshes converge on one record per title and shallow list payloads
/// never erase previously learned detail fields.
pub struct CatalogService {
    registry: Arc<ProviderRegistry>,
    store: Arc<MovieStore>,
}

impl CatalogService {
    pub fn new(registry: Arc<ProviderRegistry>, store: Arc<MovieStore>) -> Self {
        Self { registry, store }
    }

    /// Fetch `pages` pages of the master list and merge every candidate.
    /// With `enrich`, each candidate's full record (trailer, description,
    /// runtime) is fetched and merged as well.
    ///
    /// Provider failures degrade to fewer pages; only store failures
    /// propagate.
    pub async fn refresh(
        &self,
        pages: u32,
        enrich: bool,
    ) -> Result<CatalogRefreshOutcome, StoreError> {
        let mut outcome = CatalogRefreshOutcome::default();

        let catalog = match self.registry.movie_catalog().and_then(|p| p.as_movie_catalog()) {
            Some(catalog) => catalog,
            None => {
                warn!("No catalog-capable provider registered; nothing to refresh");
                return Ok(outcome);
            }
        };

        for page in 1..=pages {
            let candidates = match catalog.fetch_latest(page).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Catalog page {} failed: {}", page, e);
                    outcome.errors.push(format!("page {}: {}", page, e));
                    continue;
                }
            };
            outcome.pages_fetched += 1;
            debug!("Catalog page {} yielded {} candidate(s)", page, candidates.len());

            for candidate in candidates {
                outcome.fetched += 1;
                let existed = match &candidate.external_id {
                    Some(external_id) => {
                        self.store.get_by_external_id(external_id).await.is_some()
                    }
                    None => false,
                };

                let stored = self.store.merge_save(candidate).await;
                if existed {
                    outcome.updated += 1;
                } else {
                    outcome.created += 1;
                }

                if enrich {
                    if let Some(external_id) = &stored.external_id {
                        match catalog.fetch_detail(external_id, &stored.media_type).await {
                            Ok(Some(detail)) => {
                                self.store.merge_save(detail).await;
                                outcome.enriched += 1;
                            }
                            Ok(None) => {
                                debug!("No detail record for external id {}", external_id)
                            }
                            Err(e) => {
                                warn!(
                                    "Detail fetch for external id {} failed: {}",
                                    external_id, e
                                );
                                outcome
                                    .errors
                                    .push(format!("detail {}: {}", external_id, e));
                            }
                        }
                    }
                }
            }
        }

        self.store.save_if_dirty().await?;
        info!(
            "Catalog refresh done: {} fetched, {} created, {} updated, {} enriched, {} error(s)",
            outcome.fetched,
            outcome.created,
            outcome.updated,
            outcome.enriched,
            outcome.errors.len()
        );
        Ok(outcome)
    }
}
