use reqwest::StatusCode;
use thiserror::Error;

/// Failure while talking to the Casafari API. Ends a page walk.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("api responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode api response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single listing that cannot be turned into a local record.
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("listing has no identifier")]
    MissingIdentifier,

    #[error("listing is not a json object")]
    NotAnObject,

    #[error("malformed listing: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("database connection failed: {0}")]
    Connection(#[from] diesel::ConnectionError),
}

/// Why one record of a page was counted as an error.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
