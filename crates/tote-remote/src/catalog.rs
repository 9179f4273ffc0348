//! # Catalog Source
//!
//! Read-only REST client for the product catalog.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog REST API                                  │
//! │                                                                         │
//! │  GET {base}/products/categories   ──►  ["electronics", "jewelery", ..] │
//! │  GET {base}/products              ──►  [{ id, title, price,             │
//! │                                           description, category,        │
//! │                                           image, rating{rate,count} }]  │
//! │                                                                         │
//! │  connect / timeout / send failure  ──►  Failure(Network)               │
//! │  non-2xx status                    ──►  Failure(Unknown)               │
//! │  malformed body or price           ──►  Failure(Unknown)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No retry, no pagination, no caching: the shopping repository decides what
//! to do with the result.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;

use tote_core::{guard, Money, Product, Rating, Response};

use crate::config::CatalogSettings;
use crate::error::{RemoteError, RemoteResult};

// =============================================================================
// Wire Format
// =============================================================================

/// A price as sent by the catalog: usually a JSON number, sometimes text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceDto {
    Number(serde_json::Number),
    Text(String),
}

impl PriceDto {
    fn to_money(&self) -> RemoteResult<Money> {
        let parsed = match self {
            PriceDto::Number(n) => Money::parse_decimal(&n.to_string()),
            PriceDto::Text(s) => Money::parse_decimal(s),
        };
        parsed.map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct RatingDto {
    rate: f64,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct ProductDto {
    id: i64,
    title: String,
    price: PriceDto,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default, rename = "image")]
    image_url: String,
    #[serde(default)]
    rating: Option<RatingDto>,
}

impl TryFrom<ProductDto> for Product {
    type Error = RemoteError;

    fn try_from(dto: ProductDto) -> RemoteResult<Self> {
        Ok(Product {
            id: dto.id,
            price: dto.price.to_money()?,
            title: dto.title,
            description: dto.description,
            category: dto.category,
            image_url: dto.image_url,
            rating: dto.rating.map(|r| Rating {
                rate: r.rate,
                count: r.count,
            }),
        })
    }
}

// =============================================================================
// Catalog Source
// =============================================================================

/// HTTP client for the remote catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    client: Client,
    base_url: String,
}

impl CatalogSource {
    /// Creates a catalog client. The base URL must be absolute http(s).
    pub fn new(settings: &CatalogSettings) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()?;
        Self::with_client(client, &settings.base_url)
    }

    /// Creates a catalog client around an existing `reqwest::Client`.
    pub fn with_client(client: Client, base_url: &str) -> RemoteResult<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| RemoteError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }

        Ok(CatalogSource {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists the catalog's category names.
    pub async fn categories(&self) -> Response<Vec<String>> {
        guard(self.get_json::<Vec<String>>("products/categories")).await
    }

    /// Fetches every product.
    pub async fn products(&self) -> Response<Vec<Product>> {
        guard(self.try_products()).await
    }

    async fn try_products(&self) -> RemoteResult<Vec<Product>> {
        let dtos: Vec<ProductDto> = self.get_json("products").await?;
        let products = dtos
            .into_iter()
            .map(Product::try_from)
            .collect::<RemoteResult<Vec<_>>>()?;

        info!(count = products.len(), "Fetched catalog");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Catalog request");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| RemoteError::BodyInterrupted { url, source })?;
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use tote_core::ErrorKind;

    /// Serves `router` on an ephemeral port and returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn catalog(base_url: &str) -> CatalogSource {
        CatalogSource::new(&CatalogSettings {
            base_url: base_url.to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn fixture() -> Value {
        json!([
            {
                "id": 1,
                "title": "Fjallraven Backpack",
                "price": 109.95,
                "description": "Fits 15 inch laptops",
                "category": "men's clothing",
                "image": "https://fakestore.test/img/1.jpg",
                "rating": { "rate": 3.9, "count": 120 }
            },
            {
                "id": 7,
                "title": "White Gold Ring",
                "price": "9.99",
                "description": "Classic ring",
                "category": "jewelery",
                "image": "https://fakestore.test/img/7.jpg"
            }
        ])
    }

    #[tokio::test]
    async fn test_products_are_decoded() {
        let base = serve(Router::new().route("/products", get(|| async { Json(fixture()) }))).await;

        let products = catalog(&base).products().await.success().unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price, Money::from_cents(10995));
        assert_eq!(products[0].image_url, "https://fakestore.test/img/1.jpg");
        assert_eq!(products[0].rating, Some(Rating { rate: 3.9, count: 120 }));
        assert_eq!(products[1].price, Money::from_cents(999));
        assert_eq!(products[1].rating, None);
    }

    #[tokio::test]
    async fn test_categories_are_decoded() {
        let router = Router::new().route(
            "/products/categories",
            get(|| async { Json(json!(["electronics", "jewelery"])) }),
        );
        let base = serve(router).await;

        assert_eq!(
            catalog(&base).categories().await,
            Response::Success(vec!["electronics".to_string(), "jewelery".to_string()])
        );
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let base = serve(Router::new().route("/products", get(|| async { Json(json!([])) }))).await;

        let source = catalog(&format!("{base}/"));
        assert_eq!(source.products().await, Response::Success(vec![]));
    }

    #[tokio::test]
    async fn test_server_error_is_unknown() {
        let router = Router::new().route(
            "/products",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(router).await;

        assert_eq!(
            catalog(&base).products().await,
            Response::Failure(ErrorKind::Unknown)
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_unknown() {
        let router = Router::new().route("/products", get(|| async { "<html>not json</html>" }));
        let base = serve(router).await;

        assert_eq!(
            catalog(&base).products().await,
            Response::Failure(ErrorKind::Unknown)
        );
    }

    #[tokio::test]
    async fn test_unparseable_price_is_unknown() {
        let router = Router::new().route(
            "/products",
            get(|| async { Json(json!([{ "id": 2, "title": "Odd", "price": "12.999" }])) }),
        );
        let base = serve(router).await;

        assert_eq!(
            catalog(&base).products().await,
            Response::Failure(ErrorKind::Unknown)
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        let source = catalog("http://127.0.0.1:1");

        assert_eq!(source.products().await, Response::Failure(ErrorKind::Network));
        assert_eq!(source.categories().await, Response::Failure(ErrorKind::Network));
    }

    #[tokio::test]
    async fn test_connection_dropped_mid_body_is_network() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\n\
                      content-type: application/json\r\n\
                      content-length: 1000\r\n\r\n\
                      [\"electro",
                )
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let source = catalog(&format!("http://{addr}"));
        assert_eq!(source.categories().await, Response::Failure(ErrorKind::Network));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = CatalogSource::with_client(Client::new(), "not a url").unwrap_err();
        assert!(matches!(err, RemoteError::InvalidUrl(_)));
    }
}
