use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use log::info;

use super::{establish_connection, schema::casafari_properties, schema::casafari_properties::dsl::*};
use crate::{
    errors::PersistenceError,
    models::property::{Property, PropertyFields},
    sync::upsert::PropertyStore,
};

/// Which soft-deleted rows a listing query returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrashMode {
    #[default]
    Exclude,
    Include,
    Only,
}

#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub active_only: bool,
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub trash: TrashMode,
    pub limit: Option<i64>,
}

/// Postgres-backed store over the `casafari_properties` table.
pub struct PgPropertyStore {
    conn: PgConnection,
}

impl PgPropertyStore {
    pub fn new(conn: PgConnection) -> PgPropertyStore {
        PgPropertyStore { conn }
    }

    pub fn connect(database_url: &str) -> Result<PgPropertyStore, PersistenceError> {
        Ok(PgPropertyStore::new(establish_connection(database_url)?))
    }

    pub fn list(&mut self, filter: &PropertyFilter) -> Result<Vec<Property>, PersistenceError> {
        let mut query = casafari_properties::table
            .select(Property::as_select())
            .order(id.asc())
            .into_boxed();

        query = match filter.trash {
            TrashMode::Exclude => query.filter(deleted_at.is_null()),
            TrashMode::Include => query,
            TrashMode::Only => query.filter(deleted_at.is_not_null()),
        };
        if filter.active_only {
            query = query.filter(is_active.eq(true));
        }
        if let Some(wanted_type) = &filter.property_type {
            query = query.filter(property_type.eq(wanted_type));
        }
        if let Some(wanted_city) = &filter.city {
            query = query.filter(city.eq(wanted_city));
        }
        if let Some(min) = &filter.min_price {
            query = query.filter(price.ge(min));
        }
        if let Some(max) = &filter.max_price {
            query = query.filter(price.le(max));
        }
        if let Some(n) = filter.limit {
            query = query.limit(n);
        }

        Ok(query.load(&mut self.conn)?)
    }

    /// Marks the row as deleted. Returns false when no live row matched.
    pub fn soft_delete(&mut self, target: &str) -> Result<bool, PersistenceError> {
        let n = diesel::update(
            casafari_properties
                .filter(casafari_id.eq(target))
                .filter(deleted_at.is_null()),
        )
        .set(deleted_at.eq(Some(Utc::now())))
        .execute(&mut self.conn)?;

        info!("Soft deleted {n} rows with casafari_id {target}");
        Ok(n > 0)
    }

    /// Brings a soft-deleted row back. Returns false when nothing was trashed.
    pub fn restore(&mut self, target: &str) -> Result<bool, PersistenceError> {
        let n = diesel::update(
            casafari_properties
                .filter(casafari_id.eq(target))
                .filter(deleted_at.is_not_null()),
        )
        .set(deleted_at.eq(None::<chrono::DateTime<Utc>>))
        .execute(&mut self.conn)?;

        info!("Restored {n} rows with casafari_id {target}");
        Ok(n > 0)
    }
}

impl PropertyStore for PgPropertyStore {
    fn find_by_casafari_id(&mut self, target: &str) -> Result<Option<Property>, PersistenceError> {
        Ok(casafari_properties
            .filter(casafari_id.eq(target))
            .select(Property::as_select())
            .first(&mut self.conn)
            .optional()?)
    }

    fn create(
        &mut self,
        new_casafari_id: &str,
        fields: &PropertyFields,
    ) -> Result<Property, PersistenceError> {
        Ok(diesel::insert_into(casafari_properties::table)
            .values((casafari_id.eq(new_casafari_id), fields))
            .returning(Property::as_returning())
            .get_result(&mut self.conn)?)
    }

    fn update(
        &mut self,
        target_id: i64,
        fields: &PropertyFields,
    ) -> Result<Property, PersistenceError> {
        Ok(diesel::update(casafari_properties.find(target_id))
            .set((fields, updated_at.eq(Utc::now())))
            .returning(Property::as_returning())
            .get_result(&mut self.conn)?)
    }
}
