pub mod app;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod telemetry;

pub use app::Application;
pub use error::WardenError;
pub use service::{AuthService, Identity};
