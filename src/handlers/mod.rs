//! Console handlers: prompt for input, call the [`AuthService`](crate::service::AuthService),
//! print the outcome, and tell the router which [`MenuEvent`](crate::router::MenuEvent)
//! (if any) happened.

pub mod admin;
pub mod session;
pub mod user;

use crate::console::Console;
use crate::db::Account;
use crate::error::WardenError;
use std::io;

pub(crate) const CHOICE_PROMPT: &str = "Choose an option: ";
pub(crate) const INVALID_CHOICE: &str = "Invalid option, please try again.";

/// Read one line; end of input becomes an `UnexpectedEof` I/O error.
pub(crate) fn ask(console: &mut impl Console, prompt: &str) -> Result<String, WardenError> {
    console
        .read_line(prompt)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into())
}

pub(crate) fn ask_secret(console: &mut impl Console, prompt: &str) -> Result<String, WardenError> {
    console
        .read_secret(prompt)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into())
}

pub(crate) fn render_account(account: &Account) -> String {
    format!(
        "
            User {id}
====================================================
        User id:  {id}
        Username: {username}
        Password: {digest}
        Role:     {role}
====================================================",
        id = account.id,
        username = account.username,
        digest = account.password_digest,
        role = account.role,
    )
}
