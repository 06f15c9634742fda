mod common;

#[cfg(test)]
mod upsert_by_casafari_id {
    use bigdecimal::BigDecimal;
    use casafari_sync::{
        db::MemoryPropertyStore,
        sync::{map_listing, upsert, PropertyStore},
    };
    use serde_json::json;

    use crate::common::full_listing;

    #[test]
    fn first_call_creates_second_call_updates() {
        let mut store = MemoryPropertyStore::new();
        let fields = map_listing(&full_listing("test-id-1")).unwrap();

        let first = upsert(&mut store, "test-id-1", fields.clone()).unwrap();
        let second = upsert(&mut store, "test-id-1", fields).unwrap();

        assert!(first.was_created());
        assert!(!second.was_created());
        assert_eq!(store.len(), 1);
        assert_eq!(first.property().id, second.property().id);
        assert_eq!(first.property().created_at, second.property().created_at);
    }

    #[test]
    fn repeated_upsert_changes_nothing_but_the_sync_time() {
        let mut store = MemoryPropertyStore::new();
        let fields = map_listing(&full_listing("test-id-1")).unwrap();

        let first = upsert(&mut store, "test-id-1", fields.clone()).unwrap().into_property();
        let second = upsert(&mut store, "test-id-1", fields).unwrap().into_property();

        assert_eq!(first.price, second.price);
        assert_eq!(first.raw_data, second.raw_data);
        assert_eq!(first.city, second.city);
        assert!(second.last_synced_at >= first.last_synced_at);
    }

    #[test]
    fn new_price_overwrites_the_existing_row() {
        let mut store = MemoryPropertyStore::new();
        let initial = json!({
            "id": "test-id-1",
            "type": "apartment",
            "price": {"amount": 250000, "currency": "EUR"},
            "address": {"city": "Lisbon"}
        });
        let created = upsert(&mut store, "test-id-1", map_listing(&initial).unwrap())
            .unwrap()
            .into_property();
        assert_eq!(created.price, Some(BigDecimal::from(250000)));

        let mut changed = initial.clone();
        changed["price"]["amount"] = json!(275000);
        let updated = upsert(&mut store, "test-id-1", map_listing(&changed).unwrap())
            .unwrap()
            .into_property();

        assert_eq!(store.len(), 1);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.price, Some(BigDecimal::from(275000)));
        assert_eq!(
            store.get("test-id-1").unwrap().price,
            Some(BigDecimal::from(275000))
        );
    }

    #[test]
    fn update_replaces_fields_instead_of_merging() {
        let mut store = MemoryPropertyStore::new();
        upsert(
            &mut store,
            "test-id-1",
            map_listing(&full_listing("test-id-1")).unwrap(),
        )
        .unwrap();

        let sparse = json!({"id": "test-id-1", "type": "house"});
        let updated = upsert(&mut store, "test-id-1", map_listing(&sparse).unwrap())
            .unwrap()
            .into_property();

        assert_eq!(updated.property_type.as_deref(), Some("house"));
        assert_eq!(updated.city, None);
        assert_eq!(updated.price, None);
        assert_eq!(updated.bedrooms, None);
        assert_eq!(updated.main_photo_url, None);
        assert_eq!(updated.currency, "EUR");
        assert_eq!(updated.photos, json!([]));
        assert_eq!(updated.raw_data, sparse);
    }

    #[test]
    fn ids_match_case_sensitively() {
        let mut store = MemoryPropertyStore::new();
        let fields = map_listing(&full_listing("abc-1")).unwrap();

        upsert(&mut store, "abc-1", fields.clone()).unwrap();
        let other = upsert(&mut store, "ABC-1", fields).unwrap();

        assert!(other.was_created());
        assert_eq!(store.len(), 2);
        assert!(store.find_by_casafari_id("Abc-1").unwrap().is_none());
    }

    #[test]
    fn stamps_last_synced_at() {
        let mut store = MemoryPropertyStore::new();
        let fields = map_listing(&full_listing("abc-1")).unwrap();
        assert!(fields.last_synced_at.is_none());

        let outcome = upsert(&mut store, "abc-1", fields).unwrap();
        assert!(outcome.property().last_synced_at.is_some());
    }
}
