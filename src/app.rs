use crate::console::Console;
use crate::error::WardenError;
use crate::handlers;
use crate::router::MenuState;
use crate::service::{AuthService, PasswordHasher};
use std::io;
use tracing::{error, info, warn};

/// The interactive session: a console, the auth service and the current menu state.
pub struct Application<C, H> {
    auth: AuthService<H>,
    console: C,
    state: MenuState,
}

impl<C: Console, H: PasswordHasher> Application<C, H> {
    pub fn new(auth: AuthService<H>, console: C) -> Self {
        Self {
            auth,
            console,
            state: MenuState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Run menus until the user quits from the main menu or input ends.
    ///
    /// The store must already be initialized.
    ///
    /// Errors from individual actions are printed and the loop continues; only a
    /// console failure is returned.
    pub async fn run(&mut self) -> Result<(), WardenError> {
        info!(database = %self.auth.store().path().display(), "application started");

        while let Some(menu) = self.state.menu_text() {
            self.console.print(menu)?;

            let outcome = match &self.state {
                MenuState::Unauthenticated => {
                    handlers::session::handle(&self.auth, &mut self.console).await
                }
                MenuState::AdminMenu(identity) => {
                    handlers::admin::handle(&self.auth, &mut self.console, identity).await
                }
                MenuState::UserMenu { identity, .. } => {
                    handlers::user::handle(&self.auth, &mut self.console, identity).await
                }
                MenuState::Terminated => break,
            };

            match outcome {
                Ok(Some(event)) => {
                    let current = std::mem::replace(&mut self.state, MenuState::Terminated);
                    self.state = current.on(event);
                }
                Ok(None) => {}
                Err(WardenError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("input closed; leaving");
                    self.state = MenuState::Terminated;
                }
                Err(e) if e.is_recoverable() => {
                    if let WardenError::StoreUnavailable(ref source) = e {
                        error!(error = %source, "account store failure");
                    } else {
                        warn!(error = %e, "action failed");
                    }
                    self.console.print(&format!("Error: {e}"))?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
