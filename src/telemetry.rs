use crate::config::Config;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing::warn;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

/// Install the process-wide subscriber. Call once before the first log line.
///
/// Logs are appended to `cfg.log_path`; when that file cannot be opened they go to
/// stderr instead. A second call is a no-op.
pub fn init(cfg: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));

    let file = cfg
        .log_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&cfg.log_path)
        });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()));

    match file {
        Ok(file) => {
            let _ = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer.with_ansi(false).with_writer(Mutex::new(file)))
                .try_init();
        }
        Err(e) => {
            let installed = tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer.with_writer(std::io::stderr))
                .try_init()
                .is_ok();
            if installed {
                warn!(
                    path = %cfg.log_path.display(),
                    error = %e,
                    "log file unavailable; logging to stderr"
                );
            }
        }
    }
}
