//! Fixtures shared by the state holder tests.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use tote_core::{Money, Product};
use tote_db::{Database, DbConfig};
use tote_remote::{CatalogSettings, CatalogSource};
use tote_repo::ShoppingRepository;

/// Nothing listens here, so every catalog call fails with `Network`.
pub const OFFLINE_URL: &str = "http://127.0.0.1:1";

/// Serves a two-product catalog and returns its base URL.
pub async fn serve_catalog() -> String {
    let router = Router::new()
        .route(
            "/products",
            get(|| async {
                Json(json!([
                    { "id": 1, "title": "Backpack", "price": 109.95,
                      "category": "men's clothing", "image": "b.jpg" },
                    { "id": 7, "title": "Ring", "price": 9.99,
                      "category": "jewelery", "image": "r.jpg" }
                ]))
            }),
        )
        .route(
            "/products/categories",
            get(|| async { Json(json!(["jewelery", "men's clothing"])) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn shopping(base_url: &str) -> (Database, ShoppingRepository) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let catalog = CatalogSource::new(&CatalogSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap();
    let repo = ShoppingRepository::new(catalog, &db);
    (db, repo)
}

pub fn product(id: i64, cents: i64) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        price: Money::from_cents(cents),
        description: String::new(),
        category: "jewelery".to_string(),
        image_url: format!("https://img.example/{id}.jpg"),
        rating: None,
    }
}
