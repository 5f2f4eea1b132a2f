use crate::db::{Account, Role, UserStore};
use crate::error::WardenError;
use crate::service::hasher::{PasswordHasher, Sha256Hasher};
use tracing::{info, warn};

pub const MAX_USERNAME_CHARS: usize = 30;

/// An authenticated session: who logged in and with which role.
///
/// Only [`AuthService::login`] creates one. The role is a snapshot taken at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    role: Role,
}

impl Identity {
    pub(crate) fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Proof of admin privilege, required by every administrative operation.
    pub fn admin_grant(&self) -> Result<AdminGrant<'_>, WardenError> {
        if self.is_admin() {
            Ok(AdminGrant { identity: self })
        } else {
            Err(WardenError::Forbidden)
        }
    }
}

/// Borrowed evidence that the acting session holds the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminGrant<'a> {
    identity: &'a Identity,
}

impl AdminGrant<'_> {
    pub fn acting_as(&self) -> &str {
        self.identity.username()
    }
}

/// Registration, login and account administration over a [`UserStore`].
#[derive(Clone)]
pub struct AuthService<H = Sha256Hasher> {
    store: UserStore,
    hasher: H,
}

impl AuthService<Sha256Hasher> {
    pub fn new(store: UserStore) -> Self {
        Self::with_hasher(store, Sha256Hasher)
    }
}

impl<H: PasswordHasher> AuthService<H> {
    pub fn with_hasher(store: UserStore, hasher: H) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Self-registration. Always creates a `user` account.
    pub async fn register(&self, username: &str, password: &str) -> Result<i64, WardenError> {
        let username = validate_username(username)?;
        validate_password(password)?;
        let digest = self.hasher.digest(password);
        let id = self
            .store
            .create(username, &digest, Role::User)
            .await
            .inspect_err(|e| warn!(username, error = %e, "registration refused"))?;
        info!(id, username, "account registered");
        Ok(id)
    }

    /// Unknown usernames and wrong passwords produce the same error and log line.
    ///
    /// The username is matched byte for byte, surrounding whitespace included.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, WardenError> {
        let digest = self.hasher.digest(password);
        match self.store.find_by_credentials(username, &digest).await? {
            Some(account) => {
                info!(username = %account.username, role = %account.role, "login succeeded");
                Ok(Identity::new(account.username, account.role))
            }
            None => {
                warn!(username, "login failed");
                Err(WardenError::AuthenticationFailure)
            }
        }
    }

    /// Replace the stored digest. Not privileged by itself: the admin menu may call it
    /// for any user, the user menu only for the logged-in username.
    pub async fn change_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<(), WardenError> {
        validate_password(new_password)?;
        let digest = self.hasher.digest(new_password);
        let affected = self.store.update_password(username.trim(), &digest).await?;
        expect_one(affected, username)?;
        info!(username, "password changed");
        Ok(())
    }

    pub async fn change_role(
        &self,
        grant: &AdminGrant<'_>,
        username: &str,
        role: Role,
    ) -> Result<(), WardenError> {
        let username = username.trim();
        if role != Role::Admin && username == grant.acting_as() {
            warn!(admin = grant.acting_as(), "refused to demote the acting admin");
            return Err(WardenError::InvalidInput(
                "an admin cannot remove their own admin role".to_string(),
            ));
        }
        let affected = self.store.update_role(username, role).await?;
        expect_one(affected, username)
            .inspect_err(|_| warn!(username, %role, "role change matched no account"))?;
        info!(admin = grant.acting_as(), username, %role, "role changed");
        Ok(())
    }

    pub async fn delete_account(
        &self,
        grant: &AdminGrant<'_>,
        username: &str,
    ) -> Result<(), WardenError> {
        let username = username.trim();
        if username == grant.acting_as() {
            warn!(admin = grant.acting_as(), "refused to delete the acting admin");
            return Err(WardenError::InvalidInput(
                "an admin cannot delete their own account".to_string(),
            ));
        }
        let affected = self.store.delete(username).await?;
        expect_one(affected, username)
            .inspect_err(|_| warn!(username, "delete matched no account"))?;
        info!(admin = grant.acting_as(), username, "account deleted");
        Ok(())
    }

    /// Admin-side account creation; unlike [`register`](Self::register) the role is chosen.
    pub async fn create_account(
        &self,
        grant: &AdminGrant<'_>,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<i64, WardenError> {
        let username = validate_username(username)?;
        validate_password(password)?;
        let digest = self.hasher.digest(password);
        let id = self.store.create(username, &digest, role).await?;
        info!(admin = grant.acting_as(), id, username, %role, "account created");
        Ok(id)
    }

    pub async fn list_accounts(
        &self,
        _grant: &AdminGrant<'_>,
    ) -> Result<Vec<Account>, WardenError> {
        let accounts = self.store.list_all().await?;
        info!(count = accounts.len(), "accounts listed");
        Ok(accounts)
    }

    pub async fn get_account(
        &self,
        _grant: &AdminGrant<'_>,
        id: i64,
    ) -> Result<Account, WardenError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| WardenError::NotFound(format!("id {id}")))
    }

    /// The caller's own row, as shown by the user menu.
    pub async fn own_account(&self, identity: &Identity) -> Result<Account, WardenError> {
        self.store
            .find_by_username(identity.username())
            .await?
            .ok_or_else(|| WardenError::NotFound(identity.username().to_string()))
    }

    /// Make sure `username` exists with the admin role, unless some admin already exists.
    ///
    /// Returns `true` when an account was created or promoted. A promoted account also
    /// gets the configured password, so a self-registered account with the same name
    /// cannot keep a password of its own choosing.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, WardenError> {
        if self.store.count_admins().await? > 0 {
            return Ok(false);
        }
        let username = validate_username(username)?;
        validate_password(password)?;
        let digest = self.hasher.digest(password);
        if self.store.update_password(username, &digest).await? == 1 {
            self.store.update_role(username, Role::Admin).await?;
            warn!(username, "existing account promoted to admin; password reset to configured one");
        } else {
            self.store.create(username, &digest, Role::Admin).await?;
            info!(username, "bootstrap admin created");
        }
        Ok(true)
    }
}

fn expect_one(affected: u64, username: &str) -> Result<(), WardenError> {
    if affected == 0 {
        Err(WardenError::NotFound(username.trim().to_string()))
    } else {
        Ok(())
    }
}

fn validate_username(username: &str) -> Result<&str, WardenError> {
    let username = username.trim();
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_CHARS {
        return Err(WardenError::InvalidInput(format!(
            "username must be 1 to {MAX_USERNAME_CHARS} characters"
        )));
    }
    Ok(username)
}

fn validate_password(password: &str) -> Result<(), WardenError> {
    if password.is_empty() {
        return Err(WardenError::InvalidInput("password must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn service() -> (TempDir, AuthService) {
        let dir = TempDir::new().unwrap();
        let store = UserStore::new(dir.path().join("app.sqlite3"));
        store.initialize().await.unwrap();
        (dir, AuthService::new(store))
    }

    async fn admin_identity(svc: &AuthService) -> Identity {
        svc.ensure_admin("root", "toor").await.unwrap();
        svc.login("root", "toor").await.unwrap()
    }

    #[tokio::test]
    async fn register_then_login_yields_user_role() {
        let (_dir, svc) = service().await;
        svc.register("alice", "pw1").await.unwrap();
        let id = svc.login("alice", "pw1").await.unwrap();
        assert_eq!(id.username(), "alice");
        assert_eq!(id.role(), Role::User);
    }

    #[tokio::test]
    async fn stored_digest_is_not_plaintext() {
        let (_dir, svc) = service().await;
        svc.register("alice", "pw1").await.unwrap();
        let row = svc.store().find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(row.password_digest, Sha256Hasher.digest("pw1"));
        assert_ne!(row.password_digest, "pw1");
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (_dir, svc) = service().await;
        svc.register("alice", "pw1").await.unwrap();

        let wrong_pw = svc.login("alice", "nope").await.unwrap_err();
        let unknown = svc.login("mallory", "pw1").await.unwrap_err();
        assert!(matches!(wrong_pw, WardenError::AuthenticationFailure));
        assert!(matches!(unknown, WardenError::AuthenticationFailure));
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn username_length_is_bounded() {
        let (_dir, svc) = service().await;
        let long = "x".repeat(MAX_USERNAME_CHARS + 1);
        assert!(matches!(
            svc.register(&long, "pw").await,
            Err(WardenError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.register("   ", "pw").await,
            Err(WardenError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.register("alice", "").await,
            Err(WardenError::InvalidInput(_))
        ));
        svc.register(&"é".repeat(MAX_USERNAME_CHARS), "pw").await.unwrap();
    }

    #[tokio::test]
    async fn change_password_requires_existing_account() {
        let (_dir, svc) = service().await;
        svc.register("alice", "pw1").await.unwrap();
        svc.change_password("alice", "pw2").await.unwrap();
        assert!(svc.login("alice", "pw1").await.is_err());
        assert!(svc.login("alice", "pw2").await.is_ok());

        assert!(matches!(
            svc.change_password("ghost", "pw").await,
            Err(WardenError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn user_identity_cannot_obtain_grant() {
        let (_dir, svc) = service().await;
        svc.register("bob", "pw2").await.unwrap();
        let bob = svc.login("bob", "pw2").await.unwrap();
        assert!(matches!(bob.admin_grant(), Err(WardenError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_operations_report_missing_accounts() {
        let (_dir, svc) = service().await;
        let root = admin_identity(&svc).await;
        let grant = root.admin_grant().unwrap();

        assert!(matches!(
            svc.change_role(&grant, "ghost", Role::Admin).await,
            Err(WardenError::NotFound(_))
        ));
        assert!(matches!(
            svc.delete_account(&grant, "ghost").await,
            Err(WardenError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_account(&grant, 999).await,
            Err(WardenError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn admin_can_create_accounts_with_role() {
        let (_dir, svc) = service().await;
        let root = admin_identity(&svc).await;
        let grant = root.admin_grant().unwrap();

        let id = svc
            .create_account(&grant, "carol", "pw3", Role::Admin)
            .await
            .unwrap();
        let carol = svc.get_account(&grant, id).await.unwrap();
        assert_eq!(carol.role, Role::Admin);
        assert!(matches!(
            svc.create_account(&grant, "carol", "pw3", Role::User).await,
            Err(WardenError::ConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn ensure_admin_runs_once() {
        let (_dir, svc) = service().await;
        assert!(svc.ensure_admin("root", "toor").await.unwrap());
        assert!(!svc.ensure_admin("other", "pw").await.unwrap());
        assert_eq!(svc.store().count_admins().await.unwrap(), 1);
        assert!(svc.store().find_by_username("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ensure_admin_takes_over_preregistered_name() {
        let (_dir, svc) = service().await;
        svc.register("root", "attacker").await.unwrap();
        assert!(svc.ensure_admin("root", "configured-secret").await.unwrap());

        assert!(matches!(
            svc.login("root", "attacker").await,
            Err(WardenError::AuthenticationFailure)
        ));
        let root = svc.login("root", "configured-secret").await.unwrap();
        assert!(root.is_admin());
        assert_eq!(svc.store().list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn login_matches_username_exactly() {
        let (_dir, svc) = service().await;
        let digest = Sha256Hasher.digest("pw");
        svc.store().create(" spaced ", &digest, Role::User).await.unwrap();

        assert_eq!(svc.login(" spaced ", "pw").await.unwrap().username(), " spaced ");
        assert!(matches!(
            svc.login("spaced", "pw").await,
            Err(WardenError::AuthenticationFailure)
        ));
    }

    #[tokio::test]
    async fn admin_cannot_delete_or_demote_itself() {
        let (_dir, svc) = service().await;
        let root = admin_identity(&svc).await;
        let grant = root.admin_grant().unwrap();

        assert!(matches!(
            svc.delete_account(&grant, " root ").await,
            Err(WardenError::InvalidInput(_))
        ));
        assert!(matches!(
            svc.change_role(&grant, "root", Role::User).await,
            Err(WardenError::InvalidInput(_))
        ));
        svc.change_role(&grant, "root", Role::Admin).await.unwrap();

        let row = svc.store().find_by_username("root").await.unwrap().unwrap();
        assert_eq!(row.role, Role::Admin);
        assert_eq!(svc.store().count_admins().await.unwrap(), 1);
    }
}
