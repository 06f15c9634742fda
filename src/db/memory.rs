use chrono::Utc;

use crate::{
    errors::PersistenceError,
    models::property::{Property, PropertyFields},
    sync::upsert::PropertyStore,
};

/// Keeps synced rows in memory. Backs dry runs, where a sync should exercise
/// the whole pipeline without touching the database.
#[derive(Debug, Default)]
pub struct MemoryPropertyStore {
    rows: Vec<Property>,
    next_id: i64,
}

impl MemoryPropertyStore {
    pub fn new() -> MemoryPropertyStore {
        MemoryPropertyStore::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Property] {
        &self.rows
    }

    pub fn get(&self, casafari_id: &str) -> Option<&Property> {
        self.rows.iter().find(|p| p.casafari_id == casafari_id)
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn find_by_casafari_id(
        &mut self,
        casafari_id: &str,
    ) -> Result<Option<Property>, PersistenceError> {
        Ok(self.get(casafari_id).cloned())
    }

    fn create(
        &mut self,
        casafari_id: &str,
        fields: &PropertyFields,
    ) -> Result<Property, PersistenceError> {
        self.next_id += 1;
        let now = Utc::now();
        let property = Property::from_fields(self.next_id, casafari_id, fields.clone(), now, now);
        self.rows.push(property.clone());
        Ok(property)
    }

    fn update(&mut self, id: i64, fields: &PropertyFields) -> Result<Property, PersistenceError> {
        let row = self
            .rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PersistenceError::Query(diesel::result::Error::NotFound))?;

        let mut updated = Property::from_fields(
            row.id,
            &row.casafari_id,
            fields.clone(),
            row.created_at,
            Utc::now(),
        );
        updated.deleted_at = row.deleted_at;
        *row = updated.clone();
        Ok(updated)
    }
}
