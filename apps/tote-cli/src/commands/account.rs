//! Account commands.
//!
//! The in-memory backend lives for one process, so `register` runs the
//! whole sign-up flow in a single invocation.

use serde_json::json;

use tote_core::{Locale, UserDetail};
use tote_repo::AccountRepository;

use super::{fail_on, warn_user};
use crate::cli::AccountAction;
use crate::error::AppResult;
use crate::state::AccountState;

pub async fn run(repo: AccountRepository, locale: Locale, action: AccountAction) -> AppResult<()> {
    let mut state = AccountState::new(repo, locale);

    match action {
        AccountAction::Register {
            email,
            password,
            name,
            address,
            birthdate,
        } => {
            let created = state.sign_up(&email, &password).await;
            let message = state.take_message();
            if !created {
                return fail_on(message);
            }
            warn_user(message);

            if let Some(name) = name {
                state.update_display_name(&name).await;
                fail_on(state.take_message())?;
            }

            let mut detail = UserDetail {
                address,
                ..UserDetail::default()
            };
            if let Some(date) = birthdate {
                detail = detail.with_birthdate(date);
            }
            if !detail.is_empty() {
                state.save_detail(&detail).await;
                fail_on(state.take_message())?;
            }

            let output = json!({
                "profile": state.profile(),
                "detail": state.detail(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
