#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Local, NaiveDate};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use wildstays_api::storage::ImageStore;
use wildstays_api::{AppStateInner, router};
use wildstays_db::Database;

pub const MAX_IMAGE_BYTES: usize = 1024;

pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let images = ImageStore::new(uploads.path().to_path_buf()).await.unwrap();
        let state = Arc::new(AppStateInner {
            db: Database::open_in_memory().unwrap(),
            images,
            jwt_secret: "integration-test-secret".into(),
            max_image_bytes: MAX_IMAGE_BYTES,
        });
        Self { router: router(state), uploads }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.call(request).await
    }

    pub async fn send_bytes(&self, uri: &str, token: &str, bytes: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(bytes))
            .unwrap();
        self.call(request).await
    }

    pub async fn get_raw(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Register a user and return their bearer token.
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "username": username, "password": "correct horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a listing owned by `token` and return its id.
    pub async fn create_listing(&self, token: &str, place: &str, guests: u32, price: u32) -> i64 {
        let (status, body) = self
            .send(Method::POST, "/me/listings", Some(token), Some(listing_body(place, guests, price)))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

pub fn listing_body(place: &str, guests: u32, price: u32) -> Value {
    json!({
        "name": format!("{place} hideaway"),
        "description": "Sauna and lake view",
        "type": "Cabin",
        "place": place,
        "price": price,
        "guests": guests,
        "bedrooms": 2,
        "bathrooms": 1,
        "start_date": "2024-01-01",
        "end_date": "2030-12-31",
    })
}

/// A date `days` from today, as the API expects it.
pub fn days_from_now(days: i64) -> String {
    let date: NaiveDate = Local::now().date_naive() + Duration::days(days);
    date.to_string()
}

pub fn ids(listings: &Value) -> Vec<i64> {
    listings
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}
