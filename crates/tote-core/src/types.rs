//! # Domain Types
//!
//! Records shared by the local store, the remote sources and the state
//! holders.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │  UserProfile    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  product_id PK  │   │  uid            │       │
//! │  │  title, price   │   │  title, price   │   │  display_name   │       │
//! │  │  category       │   │  image_url      │   │  email          │       │
//! │  │  rating?        │   │  quantity 1..10 │   │  phone_number   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  FavoriteProduct = Product (row existence is the favorite flag)         │
//! │  UserDetail      = remote document { address?, birthdate? }             │
//! │  CartSummary     = totals derived from cart lines                       │
//! │  Receipt         = result of the mock checkout                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// Average score and number of votes for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: i64,
}

/// A product from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier, unique.
    pub id: i64,

    pub title: String,

    pub price: Money,

    pub description: String,

    pub category: String,

    pub image_url: String,

    /// Missing for products the catalog has never rated.
    pub rating: Option<Rating>,
}

/// A favorited product. Existence of the favorites row is the whole signal.
pub type FavoriteProduct = Product;

// =============================================================================
// Cart
// =============================================================================

/// One line of the cart; at most one line per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub product_id: i64,

    pub title: String,

    /// Unit price frozen when the line was created.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents", try_from = "i64"))]
    pub price: Money,

    pub image_url: String,

    /// Kept within `MIN_CART_QUANTITY..=MAX_CART_QUANTITY`.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a line for a product with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id,
            title: product.title.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: crate::MIN_CART_QUANTITY,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Result<Money, CoreError> {
        self.price
            .checked_mul(self.quantity)
            .ok_or(CoreError::AmountOverflow { what: "line total" })
    }
}

/// Totals derived from the cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    /// Number of distinct products.
    pub line_count: usize,
    /// Sum of quantities.
    pub item_count: i64,
    pub subtotal: Money,
}

impl CartSummary {
    /// Fails when a line total or the subtotal overflows.
    pub fn from_lines(lines: &[CartLine]) -> Result<Self, CoreError> {
        let mut subtotal = Money::zero();
        for line in lines {
            subtotal = subtotal
                .checked_add(line.line_total()?)
                .ok_or(CoreError::AmountOverflow { what: "subtotal" })?;
        }

        Ok(CartSummary {
            line_count: lines.len(),
            item_count: lines.iter().map(|l| l.quantity).sum(),
            subtotal,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }
}

/// Result of the mock checkout. Nothing is charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
}

impl Receipt {
    pub fn new(lines: Vec<CartLine>) -> Result<Self, CoreError> {
        let summary = CartSummary::from_lines(&lines)?;
        Ok(Receipt {
            order_id: Uuid::new_v4(),
            placed_at: Utc::now(),
            lines,
            summary,
        })
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The signed-in user as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub email_verified: bool,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
}

/// Per-user document fields. Absent fields are left untouched on merge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<i64>,
}

impl UserDetail {
    /// Birthdate as a calendar date (UTC).
    pub fn birthdate_date(&self) -> Option<NaiveDate> {
        self.birthdate
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive())
    }

    /// Sets the birthdate from a calendar date (midnight UTC).
    pub fn with_birthdate(mut self, date: NaiveDate) -> Self {
        self.birthdate = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.birthdate.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn backpack() -> Product {
        Product {
            id: 1,
            title: "Fjallraven Backpack".to_string(),
            price: Money::from_cents(10995),
            description: "Fits 15 inch laptops".to_string(),
            category: "men's clothing".to_string(),
            image_url: "https://example.test/1.jpg".to_string(),
            rating: Some(Rating {
                rate: 3.9,
                count: 120,
            }),
        }
    }

    #[test]
    fn test_cart_line_from_product() {
        let line = CartLine::from_product(&backpack());
        assert_eq!(line.product_id, 1);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.price.cents(), 10995);
    }

    #[test]
    fn test_cart_summary() {
        let mut a = CartLine::from_product(&backpack());
        a.quantity = 2;
        let b = CartLine {
            product_id: 2,
            title: "T-shirt".to_string(),
            price: Money::from_cents(2230),
            image_url: String::new(),
            quantity: 3,
        };

        let summary = CartSummary::from_lines(&[a, b]).unwrap();
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.item_count, 5);
        assert_eq!(summary.subtotal.cents(), 2 * 10995 + 3 * 2230);
        assert!(CartSummary::from_lines(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_cart_summary_overflow_is_an_error() {
        let mut huge = CartLine::from_product(&backpack());
        huge.price = Money::parse_decimal("92233720368547758.07").unwrap();
        huge.quantity = 2;
        assert!(matches!(
            huge.line_total(),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert!(CartSummary::from_lines(&[huge.clone()]).is_err());

        // Each line fits, the sum does not.
        huge.quantity = 1;
        let mut second = huge.clone();
        second.product_id = 2;
        assert!(matches!(
            CartSummary::from_lines(&[huge.clone(), second]),
            Err(CoreError::AmountOverflow { what: "subtotal" })
        ));
        assert!(Receipt::new(vec![huge.clone(), huge]).is_err());
    }

    #[test]
    fn test_receipt_carries_summary() {
        let receipt = Receipt::new(vec![CartLine::from_product(&backpack())]).unwrap();
        assert_eq!(receipt.summary.subtotal.cents(), 10995);
        assert_eq!(receipt.lines.len(), 1);
    }

    #[test]
    fn test_user_detail_birthdate_round_trip() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 17).unwrap();
        let detail = UserDetail::default().with_birthdate(date);
        assert_eq!(detail.birthdate_date(), Some(date));
    }

    #[test]
    fn test_user_detail_skips_absent_fields() {
        let detail = UserDetail::default().with_address("221B Baker Street");
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json, serde_json::json!({ "address": "221B Baker Street" }));
    }
}
