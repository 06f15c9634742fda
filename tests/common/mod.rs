#![allow(dead_code)]

use std::sync::Mutex;

use casafari_sync::{
    casafari::{ListingPage, SyncFilters},
    db::MemoryPropertyStore,
    errors::{PersistenceError, TransportError},
    models::property::{Property, PropertyFields},
    sync::{ListingSource, PropertyStore},
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

pub fn full_listing(id: &str) -> Value {
    json!({
        "id": id,
        "reference": "REF-001",
        "type": "apartment",
        "listing_type": "sale",
        "status": "active",
        "address": {
            "street": "123 Main St",
            "city": "Lisbon",
            "region": "Lisboa",
            "postal_code": "1000-001",
            "country": "PT"
        },
        "coordinates": {
            "latitude": 38.7223,
            "longitude": -9.1393
        },
        "price": {
            "amount": 250000,
            "currency": "EUR"
        },
        "details": {
            "bedrooms": 2,
            "bathrooms": 1,
            "area_total": 80,
            "area_built": 75,
            "area_unit": "m2",
            "year_built": 1998
        },
        "description": "Beautiful apartment",
        "photos": ["photo1.jpg", "photo2.jpg"],
        "features": ["balcony", "parking"],
        "is_active": true
    })
}

pub fn page(records: Vec<Value>, next_page: Option<u32>) -> ListingPage {
    serde_json::from_value(json!({
        "data": records,
        "pagination": {"next_page": next_page}
    }))
    .unwrap()
}

pub enum Scripted {
    Page(ListingPage),
    Fail(StatusCode),
}

/// Hands out pre-built pages in order and records every request.
pub struct ScriptedSource {
    pages: Mutex<Vec<Scripted>>,
    requests: Mutex<Vec<(SyncFilters, u32, u32)>>,
}

impl ScriptedSource {
    pub fn new(mut pages: Vec<Scripted>) -> ScriptedSource {
        pages.reverse();
        ScriptedSource {
            pages: Mutex::new(pages),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn pages(pages: Vec<ListingPage>) -> ScriptedSource {
        ScriptedSource::new(pages.into_iter().map(Scripted::Page).collect())
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.1).collect()
    }

    pub fn requests(&self) -> Vec<(SyncFilters, u32, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ListingSource for ScriptedSource {
    async fn fetch_page(
        &self,
        filters: &SyncFilters,
        page: u32,
        per_page: u32,
    ) -> Result<ListingPage, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((filters.clone(), page, per_page));

        match self.pages.lock().unwrap().pop() {
            Some(Scripted::Page(p)) => Ok(p),
            Some(Scripted::Fail(status)) => Err(TransportError::Status {
                status,
                body: "scripted failure".to_string(),
            }),
            None => Ok(ListingPage::default()),
        }
    }
}

/// Memory store that refuses to write the listed ids.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryPropertyStore,
    pub reject: Vec<String>,
}

impl FlakyStore {
    fn check(&self, casafari_id: &str) -> Result<(), PersistenceError> {
        if self.reject.iter().any(|r| r == casafari_id) {
            return Err(PersistenceError::Query(DieselError::DatabaseError(
                DatabaseErrorKind::CheckViolation,
                Box::new(format!("rejected {casafari_id}")),
            )));
        }
        Ok(())
    }
}

impl PropertyStore for FlakyStore {
    fn find_by_casafari_id(
        &mut self,
        casafari_id: &str,
    ) -> Result<Option<Property>, PersistenceError> {
        self.inner.find_by_casafari_id(casafari_id)
    }

    fn create(
        &mut self,
        casafari_id: &str,
        fields: &PropertyFields,
    ) -> Result<Property, PersistenceError> {
        self.check(casafari_id)?;
        self.inner.create(casafari_id, fields)
    }

    fn update(&mut self, id: i64, fields: &PropertyFields) -> Result<Property, PersistenceError> {
        self.inner.update(id, fields)
    }
}

/// Serves the given responses, one connection each, and returns the raw
/// requests it saw once all of them were answered.
pub async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            seen.push(String::from_utf8_lossy(&request).to_string());

            let response = format!(
                "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
        seen
    });

    (base_url, handle)
}

/// Accepts connections and reads the requests but never answers them.
pub async fn serve_silent() -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            open.push(socket);
        }
    });

    (base_url, handle)
}
