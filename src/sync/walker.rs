use serde_json::Value;

use crate::{
    casafari::{ListingPage, SyncFilters},
    errors::TransportError,
};

/// Anything that can hand out pages of raw listings.
#[allow(async_fn_in_trait)]
pub trait ListingSource {
    async fn fetch_page(
        &self,
        filters: &SyncFilters,
        page: u32,
        per_page: u32,
    ) -> Result<ListingPage, TransportError>;
}

/// Walks the listing pages for one filter set, starting at page 1.
///
/// The walk ends on an empty page, when the provider reports no next page,
/// or on the first failed fetch. A failed fetch is handed out once as an
/// error and never retried.
pub struct PageWalker<'a, S> {
    source: &'a S,
    filters: &'a SyncFilters,
    per_page: u32,
    next_page: u32,
    exhausted: bool,
}

impl<'a, S: ListingSource> PageWalker<'a, S> {
    pub fn new(source: &'a S, filters: &'a SyncFilters, per_page: u32) -> PageWalker<'a, S> {
        PageWalker {
            source,
            filters,
            per_page,
            next_page: 1,
            exhausted: false,
        }
    }

    /// Number of pages requested so far, failed ones included.
    pub fn pages_fetched(&self) -> u32 {
        self.next_page - 1
    }

    pub async fn next_batch(&mut self) -> Option<Result<Vec<Value>, TransportError>> {
        if self.exhausted {
            return None;
        }

        let page = self.next_page;
        self.next_page += 1;

        let listing_page = match self
            .source
            .fetch_page(self.filters, page, self.per_page)
            .await
        {
            Ok(p) => p,
            Err(e) => {
                self.exhausted = true;
                return Some(Err(e));
            }
        };

        let has_next_page = listing_page.has_next_page();
        let records = listing_page.into_records();

        if records.is_empty() {
            self.exhausted = true;
            return None;
        }

        self.exhausted = !has_next_page;
        Some(Ok(records))
    }
}
