use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::helpers::{decimal, flag, integer, is_truthy, object_or_empty, string_or_number};

/// Query filters accepted by the listings endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SyncFilters {
    pub fn country(country: &str) -> SyncFilters {
        SyncFilters {
            country: Some(country.to_string()),
            ..SyncFilters::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.city.is_none()
            && self.property_type.is_none()
            && self.location.is_none()
    }
}

impl fmt::Display for SyncFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "no filters");
        }
        let parts: Vec<String> = [
            ("country", &self.country),
            ("city", &self.city),
            ("type", &self.property_type),
            ("location", &self.location),
        ]
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// One page of the listings endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<Value>,
    #[serde(default)]
    pub next_page: Option<Value>,
}

impl ListingPage {
    pub fn has_next_page(&self) -> bool {
        self.pagination
            .as_ref()
            .and_then(|p| p.next_page.as_ref())
            .map_or(false, is_truthy)
    }

    pub fn records(&self) -> &[Value] {
        self.data.as_deref().unwrap_or_default()
    }

    pub fn into_records(self) -> Vec<Value> {
        self.data.unwrap_or_default()
    }
}

/// A listing as delivered by Casafari. The identifier is read separately,
/// everything else lands here.
#[derive(Debug, Default, Deserialize)]
pub struct ExternalListing {
    #[serde(default, deserialize_with = "string_or_number")]
    pub reference: Option<String>,
    #[serde(default, rename = "type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub price: Option<Price>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub details: Option<Details>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Option<Value>,
    #[serde(default)]
    pub main_photo: Option<String>,
    #[serde(default)]
    pub features: Option<Value>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "decimal")]
    pub latitude: Option<BigDecimal>,
    #[serde(default, deserialize_with = "decimal")]
    pub longitude: Option<BigDecimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Price {
    #[serde(default, deserialize_with = "decimal")]
    pub amount: Option<BigDecimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Details {
    #[serde(default, deserialize_with = "integer")]
    pub bedrooms: Option<i32>,
    #[serde(default, deserialize_with = "integer")]
    pub bathrooms: Option<i32>,
    #[serde(default, deserialize_with = "decimal")]
    pub area_total: Option<BigDecimal>,
    #[serde(default, deserialize_with = "decimal")]
    pub area_built: Option<BigDecimal>,
    #[serde(default)]
    pub area_unit: Option<String>,
    #[serde(default, deserialize_with = "integer")]
    pub year_built: Option<i32>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn next_page_follows_pagination_block() {
        let page: ListingPage = serde_json::from_value(json!({
            "data": [{"id": "a"}],
            "pagination": {"current_page": 1, "next_page": 2}
        }))
        .unwrap();
        assert!(page.has_next_page());
        assert_eq!(page.records().len(), 1);

        let last: ListingPage = serde_json::from_value(json!({
            "data": [{"id": "a"}],
            "pagination": {"current_page": 2, "next_page": null}
        }))
        .unwrap();
        assert!(!last.has_next_page());

        let bare: ListingPage = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(!bare.has_next_page());
        assert!(bare.into_records().is_empty());
    }

    #[test]
    fn filters_serialize_only_set_keys() {
        let filters = SyncFilters {
            country: Some("PT".to_string()),
            property_type: Some("apartment".to_string()),
            ..SyncFilters::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"country": "PT", "type": "apartment"})
        );
        assert_eq!(filters.to_string(), "country=PT type=apartment");
        assert_eq!(SyncFilters::default().to_string(), "no filters");
    }
}
