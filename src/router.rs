//! Role-based menu routing.
//!
//! [`MenuState`] is a pure state machine: the application feeds it [`MenuEvent`]s and
//! renders whatever state comes back. Which actions exist in each state is decided
//! here, not by the handlers.

use crate::db::Role;
use crate::service::Identity;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    Unauthenticated,
    AdminMenu(Identity),
    UserMenu {
        identity: Identity,
        /// Set when an admin entered the user menu; leaving returns to the admin menu.
        from_admin: bool,
    },
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    LoggedIn(Identity),
    EnterUserMenu,
    Leave,
    Shutdown,
}

impl MenuState {
    pub fn on(self, event: MenuEvent) -> MenuState {
        match (self, event) {
            (MenuState::Unauthenticated, MenuEvent::LoggedIn(identity)) => match identity.role() {
                Role::Admin => MenuState::AdminMenu(identity),
                Role::User => MenuState::UserMenu {
                    identity,
                    from_admin: false,
                },
            },
            (MenuState::Unauthenticated, MenuEvent::Shutdown) => MenuState::Terminated,
            (MenuState::AdminMenu(identity), MenuEvent::EnterUserMenu) => MenuState::UserMenu {
                identity,
                from_admin: true,
            },
            (MenuState::AdminMenu(_), MenuEvent::Leave) => MenuState::Unauthenticated,
            (
                MenuState::UserMenu {
                    identity,
                    from_admin: true,
                },
                MenuEvent::Leave,
            ) => MenuState::AdminMenu(identity),
            (MenuState::UserMenu { .. }, MenuEvent::Leave) => MenuState::Unauthenticated,
            (state, _) => state,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            MenuState::AdminMenu(identity) | MenuState::UserMenu { identity, .. } => Some(identity),
            MenuState::Unauthenticated | MenuState::Terminated => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, MenuState::Terminated)
    }

    /// Menu text for the state, `None` once terminated.
    pub fn menu_text(&self) -> Option<&'static str> {
        match self {
            MenuState::Unauthenticated => Some(MAIN_MENU),
            MenuState::AdminMenu(_) => Some(ADMIN_MENU),
            MenuState::UserMenu { .. } => Some(USER_MENU),
            MenuState::Terminated => None,
        }
    }
}

pub const MAIN_MENU: &str = "
====================================
         MAIN MENU
====================================
1. Register
2. Log in
3. Quit";

pub const ADMIN_MENU: &str = "
====================================
         ADMIN MENU
====================================
1. Add a user
2. Delete a user
3. Change a user's password
4. List all users
5. Show a user by id
6. Change a user's role
7. Open the user menu
8. Leave the admin menu";

pub const USER_MENU: &str = "
====================================
         USER MENU
====================================
1. Show my account
2. Change my password
3. Leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainChoice {
    Register,
    Login,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminChoice {
    AddUser,
    DeleteUser,
    ChangePassword,
    ListUsers,
    ShowUserById,
    ChangeRole,
    EnterUserMenu,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    ShowAccount,
    ChangePassword,
    Leave,
}

impl FromStr for MainChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(MainChoice::Register),
            "2" => Ok(MainChoice::Login),
            "3" => Ok(MainChoice::Quit),
            _ => Err(()),
        }
    }
}

impl FromStr for AdminChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(AdminChoice::AddUser),
            "2" => Ok(AdminChoice::DeleteUser),
            "3" => Ok(AdminChoice::ChangePassword),
            "4" => Ok(AdminChoice::ListUsers),
            "5" => Ok(AdminChoice::ShowUserById),
            "6" => Ok(AdminChoice::ChangeRole),
            "7" => Ok(AdminChoice::EnterUserMenu),
            "8" => Ok(AdminChoice::Leave),
            _ => Err(()),
        }
    }
}

impl FromStr for UserChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(UserChoice::ShowAccount),
            "2" => Ok(UserChoice::ChangePassword),
            "3" => Ok(UserChoice::Leave),
            _ => Err(()),
        }
    }
}
