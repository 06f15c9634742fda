pub mod sync_producer;

pub use sync_producer::SyncProducer;
