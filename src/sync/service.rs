use std::{fmt, ops::AddAssign, time::Instant};

use log::{error, info};
use serde::Serialize;
use serde_json::Value;

use super::{
    mapper::{listing_identifier, map_listing},
    upsert::{upsert, PropertyStore, UpsertOutcome},
    walker::{ListingSource, PageWalker},
};
use crate::{
    casafari::SyncFilters,
    config::DEFAULT_PER_PAGE,
    errors::{MappingError, RecordError},
};

/// Counters of one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub total: u32,
    pub created: u32,
    pub updated: u32,
    pub errors: u32,
    /// The walk stopped early because a page could not be fetched.
    pub fetch_failed: bool,
}

impl SyncStats {
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && !self.fetch_failed
    }
}

impl AddAssign for SyncStats {
    fn add_assign(&mut self, other: SyncStats) {
        self.total += other.total;
        self.created += other.created;
        self.updated += other.updated;
        self.errors += other.errors;
        self.fetch_failed |= other.fetch_failed;
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} created={} updated={} errors={}",
            self.total, self.created, self.updated, self.errors
        )?;
        if self.fetch_failed {
            write!(f, " (stopped on fetch failure)")?;
        }
        Ok(())
    }
}

/// Pulls listings from a [`ListingSource`] into a [`PropertyStore`].
pub struct SyncService<S, P> {
    source: S,
    store: P,
    per_page: u32,
}

impl<S: ListingSource, P: PropertyStore> SyncService<S, P> {
    pub fn new(source: S, store: P) -> SyncService<S, P> {
        SyncService {
            source,
            store,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> SyncService<S, P> {
        self.per_page = per_page;
        self
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn into_store(self) -> P {
        self.store
    }

    /// Syncs every listing matching `filters`, page by page and in the order
    /// the API returns them.
    ///
    /// A record that fails to map or to persist is logged and counted in
    /// `errors`, the rest of the run carries on. A failed page fetch ends the
    /// run and sets `fetch_failed`. This never returns an error.
    pub async fn sync_properties(&mut self, filters: &SyncFilters) -> SyncStats {
        info!("Starting Casafari sync ({filters})");
        let start = Instant::now();

        let mut stats = SyncStats::default();
        let mut walker = PageWalker::new(&self.source, filters, self.per_page);

        while let Some(batch) = walker.next_batch().await {
            let records = match batch {
                Ok(records) => records,
                Err(e) => {
                    error!(
                        "Stopping Casafari sync at page {} ({filters}): {e}",
                        walker.pages_fetched()
                    );
                    stats.fetch_failed = true;
                    break;
                }
            };

            for raw in &records {
                stats.total += 1;

                match sync_record(&mut self.store, raw) {
                    Ok(UpsertOutcome::Created(_)) => stats.created += 1,
                    Ok(UpsertOutcome::Updated(_)) => stats.updated += 1,
                    Err(e) => {
                        stats.errors += 1;
                        error!(
                            "Error syncing property {}: {e}",
                            listing_identifier(raw).unwrap_or_else(|| "unknown".to_string())
                        );
                    }
                }
            }
        }

        info!(
            "Finished Casafari sync ({filters}) in {:?}: {stats}",
            start.elapsed()
        );
        stats
    }

    /// Runs [`Self::sync_properties`] for each filter set in turn and adds the
    /// results up. No filter sets means a single unfiltered run.
    pub async fn sync_all(&mut self, filter_sets: &[SyncFilters]) -> SyncStats {
        if filter_sets.is_empty() {
            return self.sync_properties(&SyncFilters::default()).await;
        }

        let mut stats = SyncStats::default();
        for filters in filter_sets {
            stats += self.sync_properties(filters).await;
        }
        stats
    }
}

fn sync_record<P: PropertyStore>(store: &mut P, raw: &Value) -> Result<UpsertOutcome, RecordError> {
    let casafari_id = listing_identifier(raw).ok_or(MappingError::MissingIdentifier)?;
    let fields = map_listing(raw)?;
    Ok(upsert(store, &casafari_id, fields)?)
}
