//! Favorites commands.

use tote_core::Locale;
use tote_repo::ShoppingRepository;

use super::{cached_product, fail_on, print_product};
use crate::cli::FavoritesAction;
use crate::error::AppResult;
use crate::state::FavoritesState;

pub async fn run(
    repo: ShoppingRepository,
    locale: Locale,
    action: FavoritesAction,
) -> AppResult<()> {
    let mut state = FavoritesState::new(repo.clone(), locale);

    match action {
        FavoritesAction::Toggle { product_id } => {
            let product = cached_product(&repo, product_id, locale).await?;
            let favorite = state.toggle(&product).await;
            fail_on(state.take_message())?;
            let verb = if favorite { "Added" } else { "Removed" };
            println!("{verb} favorite: {}", product.title);
        }
        FavoritesAction::List => {
            state.refresh().await;
            fail_on(state.take_message())?;
            for product in state.favorites() {
                print_product(product);
            }
        }
    }
    Ok(())
}
