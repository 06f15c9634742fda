use bigdecimal::{BigDecimal, RoundingMode};
use serde::Deserialize;
use serde_json::Value;

use crate::{casafari::ExternalListing, errors::MappingError, models::property::PropertyFields};

pub const DEFAULT_STATUS: &str = "active";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_AREA_UNIT: &str = "m2";

const COORDINATE_SCALE: i64 = 7;
const AMOUNT_SCALE: i64 = 2;

// Ties go away from zero, as NUMERIC columns round them
fn round_to(scale: i64, value: BigDecimal) -> BigDecimal {
    value.with_scale_round(scale, RoundingMode::HalfUp)
}

/// The listing's Casafari id, if it has a usable one.
pub fn listing_identifier(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Maps one raw Casafari listing onto the local columns.
///
/// Missing optional values fall back to null or to the column defaults
/// (`status` "active", `currency` "EUR", `area_unit` "m2", `is_active` true).
/// The untouched listing is kept in `raw_data`. The identifier is not read
/// here, callers check it with [`listing_identifier`] first.
pub fn map_listing(raw: &Value) -> Result<PropertyFields, MappingError> {
    if !raw.is_object() {
        return Err(MappingError::NotAnObject);
    }

    let listing = ExternalListing::deserialize(raw)?;

    let address = listing.address.unwrap_or_default();
    let coordinates = listing.coordinates.unwrap_or_default();
    let price = listing.price.unwrap_or_default();
    let details = listing.details.unwrap_or_default();

    let photos = listing.photos.unwrap_or_else(|| Value::Array(Vec::new()));
    let main_photo_url = listing.main_photo.or_else(|| {
        photos
            .get(0)
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    Ok(PropertyFields {
        reference: listing.reference,
        property_type: listing.property_type,
        listing_type: listing.listing_type,
        status: listing.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        address: address.street,
        city: address.city,
        region: address.region,
        postal_code: address.postal_code,
        country: address.country,
        latitude: coordinates.latitude.map(|v| round_to(COORDINATE_SCALE, v)),
        longitude: coordinates.longitude.map(|v| round_to(COORDINATE_SCALE, v)),
        price: price.amount.map(|v| round_to(AMOUNT_SCALE, v)),
        currency: price.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        bedrooms: details.bedrooms,
        bathrooms: details.bathrooms,
        area_total: details.area_total.map(|v| round_to(AMOUNT_SCALE, v)),
        area_built: details.area_built.map(|v| round_to(AMOUNT_SCALE, v)),
        area_unit: details
            .area_unit
            .unwrap_or_else(|| DEFAULT_AREA_UNIT.to_string()),
        year_built: details.year_built,
        description: listing.description,
        photos,
        main_photo_url,
        features: listing.features.unwrap_or_else(|| Value::Array(Vec::new())),
        raw_data: raw.clone(),
        last_synced_at: None,
        is_active: listing.is_active.unwrap_or(true),
    })
}
