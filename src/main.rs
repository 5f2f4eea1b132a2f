use mimalloc::MiMalloc;
use tracing::{info, warn};
use warden::config::Config;
use warden::console::StdConsole;
use warden::db::UserStore;
use warden::{Application, AuthService};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::from_env()?;
    warden::telemetry::init(&cfg);

    info!(
        database_path = %cfg.database_path.display(),
        log_path = %cfg.log_path.display(),
        loglevel = %cfg.loglevel
    );

    let store = UserStore::new(&cfg.database_path);
    store.initialize().await?;
    let auth = AuthService::new(store);

    if let Some((username, password)) = cfg.bootstrap_admin() {
        match auth.ensure_admin(username, password).await {
            Ok(true) => info!(username, "bootstrap admin ensured"),
            Ok(false) => {}
            Err(e) => warn!(username, error = %e, "bootstrap admin failed"),
        }
    }

    let mut app = Application::new(auth, StdConsole::new());
    app.run().await?;
    Ok(())
}
