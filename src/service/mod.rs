pub mod auth;
pub mod hasher;

pub use auth::{AdminGrant, AuthService, Identity};
pub use hasher::{PasswordHasher, Sha256Hasher};
