use chrono::Utc;

use crate::{
    errors::PersistenceError,
    models::property::{Property, PropertyFields},
};

/// Storage for synced listings, keyed by the Casafari id.
pub trait PropertyStore {
    /// Exact, case-sensitive match on `casafari_id`. Soft-deleted rows are
    /// returned as well since the id stays unique across them.
    fn find_by_casafari_id(
        &mut self,
        casafari_id: &str,
    ) -> Result<Option<Property>, PersistenceError>;

    fn create(
        &mut self,
        casafari_id: &str,
        fields: &PropertyFields,
    ) -> Result<Property, PersistenceError>;

    /// Replaces every mapped column of row `id` with `fields`. Nothing is
    /// merged: a `None` in `fields` clears the stored value. The row keeps its
    /// id, `casafari_id`, `created_at` and soft-delete state.
    fn update(&mut self, id: i64, fields: &PropertyFields) -> Result<Property, PersistenceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(Property),
    Updated(Property),
}

impl UpsertOutcome {
    pub fn was_created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }

    pub fn property(&self) -> &Property {
        match self {
            UpsertOutcome::Created(p) | UpsertOutcome::Updated(p) => p,
        }
    }

    pub fn into_property(self) -> Property {
        match self {
            UpsertOutcome::Created(p) | UpsertOutcome::Updated(p) => p,
        }
    }
}

/// Creates the listing or overwrites the existing row with the same
/// `casafari_id`, stamping `last_synced_at` either way.
pub fn upsert<S: PropertyStore>(
    store: &mut S,
    casafari_id: &str,
    mut fields: PropertyFields,
) -> Result<UpsertOutcome, PersistenceError> {
    fields.last_synced_at = Some(Utc::now());

    match store.find_by_casafari_id(casafari_id)? {
        Some(existing) => store
            .update(existing.id, &fields)
            .map(UpsertOutcome::Updated),
        None => store
            .create(casafari_id, &fields)
            .map(UpsertOutcome::Created),
    }
}
