use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use crate::db::schema::casafari_properties;

/// A synced listing as stored locally.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = casafari_properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Property {
    pub id: i64,
    pub casafari_id: String,
    pub reference: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub status: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub currency: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_total: Option<BigDecimal>,
    pub area_built: Option<BigDecimal>,
    pub area_unit: String,
    pub year_built: Option<i32>,
    pub description: Option<String>,
    pub photos: Value,
    pub main_photo_url: Option<String>,
    pub features: Value,
    pub raw_data: Value,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Every column the sync writes. Used both for inserts and for updates; an
/// update writes all of them, so a `None` here clears the stored value.
#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = casafari_properties)]
#[diesel(treat_none_as_null = true)]
pub struct PropertyFields {
    pub reference: Option<String>,
    pub property_type: Option<String>,
    pub listing_type: Option<String>,
    pub status: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<BigDecimal>,
    pub longitude: Option<BigDecimal>,
    pub price: Option<BigDecimal>,
    pub currency: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area_total: Option<BigDecimal>,
    pub area_built: Option<BigDecimal>,
    pub area_unit: String,
    pub year_built: Option<i32>,
    pub description: Option<String>,
    pub photos: Value,
    pub main_photo_url: Option<String>,
    pub features: Value,
    pub raw_data: Value,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Property {
    /// Builds a row from freshly written fields. Stores that do not hand rows
    /// back from the database use this.
    pub fn from_fields(
        id: i64,
        casafari_id: &str,
        fields: PropertyFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Property {
        Property {
            id,
            casafari_id: casafari_id.to_string(),
            reference: fields.reference,
            property_type: fields.property_type,
            listing_type: fields.listing_type,
            status: fields.status,
            address: fields.address,
            city: fields.city,
            region: fields.region,
            postal_code: fields.postal_code,
            country: fields.country,
            latitude: fields.latitude,
            longitude: fields.longitude,
            price: fields.price,
            currency: fields.currency,
            bedrooms: fields.bedrooms,
            bathrooms: fields.bathrooms,
            area_total: fields.area_total,
            area_built: fields.area_built,
            area_unit: fields.area_unit,
            year_built: fields.year_built,
            description: fields.description,
            photos: fields.photos,
            main_photo_url: fields.main_photo_url,
            features: fields.features,
            raw_data: fields.raw_data,
            last_synced_at: fields.last_synced_at,
            is_active: fields.is_active,
            created_at,
            updated_at,
            deleted_at: None,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Price with thousands separators and currency, e.g. "250,000.00 EUR".
    pub fn formatted_price(&self) -> Option<String> {
        self.price
            .as_ref()
            .map(|price| format!("{} {}", format_amount(price), self.currency))
    }

    /// Non-empty address parts joined with ", ".
    pub fn full_address(&self) -> String {
        [
            &self.address,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .filter_map(|part| part.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join(", ")
    }
}

fn format_amount(amount: &BigDecimal) -> String {
    let rendered = amount.round(2).with_scale(2).to_string();
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}
