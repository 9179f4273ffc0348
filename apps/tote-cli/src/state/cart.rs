//! # Cart State
//!
//! Cart screen: lines, totals and the mock checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  User Action            State Method           Repository Call          │
//! │  ───────────            ────────────           ───────────────          │
//! │                                                                         │
//! │  Add product ─────────► add_product() ───────► add_to_cart() or        │
//! │                                                increment_quantity()     │
//! │                                                                         │
//! │  + / − ───────────────► increment() ─────────► increment_quantity()    │
//! │                         decrement()            decrement_quantity()     │
//! │                         (1..=10 checked here and again in SQL)         │
//! │                                                                         │
//! │  Remove ──────────────► remove() ────────────► remove_from_cart()      │
//! │                                                                         │
//! │  Checkout ────────────► checkout() ──────────► cart_lines()            │
//! │                                                clear_cart()            │
//! │                                                                         │
//! │  Every method ends by re-reading the lines.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use tote_core::{
    guard_sync, CartLine, CartSummary, ErrorKind, Locale, Product, Receipt, Response,
    MAX_CART_QUANTITY, MIN_CART_QUANTITY,
};
use tote_repo::ShoppingRepository;

use super::UserMessage;

#[derive(Debug)]
pub struct CartState {
    repo: ShoppingRepository,
    locale: Locale,
    lines: Vec<CartLine>,
    summary: CartSummary,
    message: Option<UserMessage>,
}

impl CartState {
    pub fn new(repo: ShoppingRepository, locale: Locale) -> Self {
        CartState {
            repo,
            locale,
            lines: Vec::new(),
            summary: CartSummary::default(),
            message: None,
        }
    }

    pub async fn refresh(&mut self) {
        match self.repo.cart_lines().await {
            Response::Success(lines) => {
                match guard_sync(CartSummary::from_lines(&lines)) {
                    Response::Success(summary) => self.summary = summary,
                    Response::Failure(kind) => self.show(kind),
                }
                self.lines = lines;
            }
            Response::Failure(kind) => self.show(kind),
        }
    }

    /// Adds a line for `product`, or bumps the existing line by one.
    pub async fn add_product(&mut self, product: &Product) {
        match self.repo.find_cart_line(product.id).await {
            Response::Success(Some(line)) if line.quantity >= MAX_CART_QUANTITY => {
                self.show(ErrorKind::QuantityOutOfRange)
            }
            Response::Success(Some(_)) => {
                let response = self.repo.increment_quantity(product.id).await;
                self.settle(response);
            }
            Response::Success(None) => {
                let response = self.repo.add_to_cart(&CartLine::from_product(product)).await;
                self.settle(response);
            }
            Response::Failure(kind) => self.show(kind),
        }
        self.refresh().await;
    }

    pub async fn increment(&mut self, product_id: i64) {
        match self.repo.find_cart_line(product_id).await {
            Response::Success(Some(line)) if line.quantity >= MAX_CART_QUANTITY => {
                self.show(ErrorKind::QuantityOutOfRange)
            }
            Response::Success(Some(_)) => {
                let response = self.repo.increment_quantity(product_id).await;
                self.settle(response);
            }
            Response::Success(None) => {}
            Response::Failure(kind) => self.show(kind),
        }
        self.refresh().await;
    }

    pub async fn decrement(&mut self, product_id: i64) {
        match self.repo.find_cart_line(product_id).await {
            Response::Success(Some(line)) if line.quantity <= MIN_CART_QUANTITY => {
                self.show(ErrorKind::QuantityOutOfRange)
            }
            Response::Success(Some(_)) => {
                let response = self.repo.decrement_quantity(product_id).await;
                self.settle(response);
            }
            Response::Success(None) => {}
            Response::Failure(kind) => self.show(kind),
        }
        self.refresh().await;
    }

    pub async fn remove(&mut self, product_id: i64) {
        let response = self.repo.remove_from_cart(product_id).await;
        self.settle(response);
        self.refresh().await;
    }

    /// Mock checkout: summarises the cart and empties it.
    ///
    /// Nothing is charged. An empty cart yields no receipt.
    pub async fn checkout(&mut self) -> Option<Receipt> {
        let lines = match self.repo.cart_lines().await {
            Response::Success(lines) => lines,
            Response::Failure(kind) => {
                self.show(kind);
                return None;
            }
        };
        if lines.is_empty() {
            return None;
        }

        let receipt = match guard_sync(Receipt::new(lines)) {
            Response::Success(receipt) => receipt,
            Response::Failure(kind) => {
                self.show(kind);
                return None;
            }
        };
        let cleared = self.repo.clear_cart().await;
        let placed = self.settle(cleared);
        self.refresh().await;

        if !placed {
            return None;
        }
        info!(
            order_id = %receipt.order_id,
            items = receipt.summary.item_count,
            subtotal = %receipt.summary.subtotal,
            "Checkout complete"
        );
        Some(receipt)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn summary(&self) -> CartSummary {
        self.summary
    }

    pub fn take_message(&mut self) -> Option<UserMessage> {
        self.message.take()
    }

    /// Shows the failure, if any. Returns true on success.
    fn settle(&mut self, response: Response<()>) -> bool {
        match response {
            Response::Success(()) => true,
            Response::Failure(kind) => {
                self.show(kind);
                false
            }
        }
    }

    fn show(&mut self, kind: ErrorKind) {
        self.message = Some(UserMessage::new(kind, self.locale));
    }
}
