//! Cart commands.

use tote_core::Locale;
use tote_repo::ShoppingRepository;

use super::{cached_product, fail_on};
use crate::cli::CartAction;
use crate::error::AppResult;
use crate::state::CartState;

pub async fn run(repo: ShoppingRepository, locale: Locale, action: CartAction) -> AppResult<()> {
    let mut state = CartState::new(repo.clone(), locale);

    match action {
        CartAction::Add { product_id } => {
            let product = cached_product(&repo, product_id, locale).await?;
            state.add_product(&product).await;
        }
        CartAction::List => state.refresh().await,
        CartAction::Inc { product_id } => state.increment(product_id).await,
        CartAction::Dec { product_id } => state.decrement(product_id).await,
        CartAction::Remove { product_id } => state.remove(product_id).await,
        CartAction::Checkout => {
            let receipt = state.checkout().await;
            fail_on(state.take_message())?;
            match receipt {
                Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
                None => eprintln!("Cart is empty"),
            }
            return Ok(());
        }
    }

    fail_on(state.take_message())?;
    print_cart(&state);
    Ok(())
}

fn print_cart(state: &CartState) {
    for line in state.lines() {
        println!(
            "{:>5}  {:<48}  {:>3} × {:>10}  {:>10}",
            line.product_id,
            line.title,
            line.quantity,
            line.price.to_string(),
            line.line_total()
                .map_or_else(|_| "overflow".to_string(), |total| total.to_string())
        );
    }
    let summary = state.summary();
    println!(
        "{} lines, {} items, subtotal {}",
        summary.line_count, summary.item_count, summary.subtotal
    );
}
