pub mod mapper;
pub mod service;
pub mod upsert;
pub mod walker;

pub use mapper::{listing_identifier, map_listing};
pub use service::{SyncService, SyncStats};
pub use upsert::{upsert, PropertyStore, UpsertOutcome};
pub use walker::{ListingSource, PageWalker};
