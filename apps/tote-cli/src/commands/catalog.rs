//! Catalog commands.

use tote_core::Locale;
use tote_repo::ShoppingRepository;

use super::{fail_on, print_product, warn_user};
use crate::cli::CatalogAction;
use crate::error::AppResult;
use crate::state::CatalogState;

pub async fn run(repo: ShoppingRepository, locale: Locale, action: CatalogAction) -> AppResult<()> {
    let mut state = CatalogState::new(repo, locale);

    match action {
        CatalogAction::Refresh => {
            state.load().await;
            let message = state.take_message();
            if state.is_from_cache() && state.visible_products().is_empty() {
                return fail_on(message);
            }
            warn_user(message);
            print_products(&state);
        }
        CatalogAction::List { category } => {
            state.load_cached().await;
            fail_on(state.take_message())?;
            state.select_category(category);
            print_products(&state);
        }
        CatalogAction::Categories => {
            state.load_categories().await;
            fail_on(state.take_message())?;
            for category in state.categories() {
                println!("{category}");
            }
        }
    }
    Ok(())
}

fn print_products(state: &CatalogState) {
    let products = state.visible_products();
    for product in &products {
        print_product(product);
    }
    if state.is_from_cache() {
        eprintln!("{} products (cached)", products.len());
    } else {
        eprintln!("{} products", products.len());
    }
}
