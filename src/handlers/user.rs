use crate::console::Console;
use crate::error::WardenError;
use crate::handlers::{CHOICE_PROMPT, INVALID_CHOICE, ask, ask_secret, render_account};
use crate::router::{MenuEvent, UserChoice};
use crate::service::{AuthService, Identity, PasswordHasher};
use tracing::warn;

/// One round of the user menu. Every action here applies to `identity` only.
pub async fn handle<H: PasswordHasher>(
    auth: &AuthService<H>,
    console: &mut impl Console,
    identity: &Identity,
) -> Result<Option<MenuEvent>, WardenError> {
    let choice = ask(console, CHOICE_PROMPT)?;
    match choice.parse::<UserChoice>() {
        Ok(UserChoice::ShowAccount) => {
            let account = auth.own_account(identity).await?;
            console.print(&render_account(&account))?;
            Ok(None)
        }
        Ok(UserChoice::ChangePassword) => {
            let password = ask_secret(console, "New password: ")?;
            auth.change_password(identity.username(), &password).await?;
            console.print("Password changed.")?;
            Ok(None)
        }
        Ok(UserChoice::Leave) => Ok(Some(MenuEvent::Leave)),
        Err(()) => {
            console.print(INVALID_CHOICE)?;
            warn!(username = identity.username(), choice = %choice, "invalid user menu option");
            Ok(None)
        }
    }
}
