pub mod memory;
pub mod property;
pub mod schema;

use diesel::{Connection, PgConnection};

use crate::errors::PersistenceError;

pub use memory::MemoryPropertyStore;
pub use property::{PgPropertyStore, PropertyFilter, TrashMode};

pub fn establish_connection(database_url: &str) -> Result<PgConnection, PersistenceError> {
    Ok(PgConnection::establish(database_url)?)
}
