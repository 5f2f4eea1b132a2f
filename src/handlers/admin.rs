use crate::console::Console;
use crate::db::Role;
use crate::error::WardenError;
use crate::handlers::{CHOICE_PROMPT, INVALID_CHOICE, ask, ask_secret, render_account};
use crate::router::{AdminChoice, MenuEvent};
use crate::service::{AuthService, Identity, PasswordHasher};
use tracing::warn;

/// One round of the admin menu.
pub async fn handle<H: PasswordHasher>(
    auth: &AuthService<H>,
    console: &mut impl Console,
    identity: &Identity,
) -> Result<Option<MenuEvent>, WardenError> {
    let grant = identity.admin_grant()?;
    let choice = ask(console, CHOICE_PROMPT)?;
    match choice.parse::<AdminChoice>() {
        Ok(AdminChoice::AddUser) => {
            let username = ask(console, "Username: ")?;
            let password = ask_secret(console, "Password: ")?;
            let role = read_role(console)?;
            let id = auth.create_account(&grant, &username, &password, role).await?;
            console.print(&format!(
                "User '{}' added with id {id} and role '{role}'.",
                username.trim()
            ))?;
        }
        Ok(AdminChoice::DeleteUser) => {
            let username = ask(console, "Username to delete: ")?;
            auth.delete_account(&grant, &username).await?;
            console.print(&format!("User '{}' deleted.", username.trim()))?;
        }
        Ok(AdminChoice::ChangePassword) => {
            let username = ask(console, "Username to modify: ")?;
            let password = ask_secret(console, "New password: ")?;
            auth.change_password(&username, &password).await?;
            console.print(&format!("Password of '{}' changed.", username.trim()))?;
        }
        Ok(AdminChoice::ListUsers) => {
            let accounts = auth.list_accounts(&grant).await?;
            console.print(&format!("Users ({}):", accounts.len()))?;
            for account in &accounts {
                console.print(&render_account(account))?;
            }
        }
        Ok(AdminChoice::ShowUserById) => {
            let raw = ask(console, "User id: ")?;
            let id: i64 = raw
                .trim()
                .parse()
                .map_err(|_| WardenError::InvalidInput(format!("'{}' is not an id", raw.trim())))?;
            let account = auth.get_account(&grant, id).await?;
            console.print(&render_account(&account))?;
        }
        Ok(AdminChoice::ChangeRole) => {
            let username = ask(console, "Username: ")?;
            let role = read_role(console)?;
            auth.change_role(&grant, &username, role).await?;
            console.print(&format!(
                "Role of '{}' changed to '{role}'.",
                username.trim()
            ))?;
        }
        Ok(AdminChoice::EnterUserMenu) => return Ok(Some(MenuEvent::EnterUserMenu)),
        Ok(AdminChoice::Leave) => return Ok(Some(MenuEvent::Leave)),
        Err(()) => {
            console.print(INVALID_CHOICE)?;
            warn!(admin = identity.username(), choice = %choice, "invalid admin menu option");
        }
    }
    Ok(None)
}

fn read_role(console: &mut impl Console) -> Result<Role, WardenError> {
    ask(console, "Role [user/admin]: ")?.parse()
}
