use crate::console::Console;
use crate::error::WardenError;
use crate::handlers::{CHOICE_PROMPT, INVALID_CHOICE, ask, ask_secret};
use crate::router::{MainChoice, MenuEvent};
use crate::service::{AuthService, PasswordHasher};
use tracing::{info, warn};

/// One round of the main menu.
pub async fn handle<H: PasswordHasher>(
    auth: &AuthService<H>,
    console: &mut impl Console,
) -> Result<Option<MenuEvent>, WardenError> {
    let choice = ask(console, CHOICE_PROMPT)?;
    match choice.parse::<MainChoice>() {
        Ok(MainChoice::Register) => {
            let username = ask(console, "Username: ")?;
            let password = ask_secret(console, "Password: ")?;
            auth.register(&username, &password).await?;
            console.print(&format!("User '{}' registered.", username.trim()))?;
            Ok(None)
        }
        Ok(MainChoice::Login) => {
            let username = ask(console, "Username: ")?;
            let password = ask_secret(console, "Password: ")?;
            let identity = auth.login(&username, &password).await?;
            console.print(&format!("Welcome, {}!", identity.username()))?;
            Ok(Some(MenuEvent::LoggedIn(identity)))
        }
        Ok(MainChoice::Quit) => {
            console.print("Thanks for using the application. Goodbye!")?;
            info!("application closing");
            Ok(Some(MenuEvent::Shutdown))
        }
        Err(()) => {
            console.print(INVALID_CHOICE)?;
            warn!(choice = %choice, "invalid main menu option");
            Ok(None)
        }
    }
}
