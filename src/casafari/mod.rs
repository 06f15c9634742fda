pub mod client;
pub mod helpers;
pub mod listing;

pub use client::CasafariClient;
pub use listing::{ExternalListing, ListingPage, SyncFilters};
