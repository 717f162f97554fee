use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogSettings;

const LOG_ENV: &str = "TAGWALL_LOG";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// The wall owns the terminal, so it only logs when a file is configured.
pub fn init_for_wall(settings: &LogSettings) {
    let Some(path) = settings.file.as_deref() else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("tagwall: cannot open log file {}: {e}", path.display());
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(&settings.filter))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

pub fn init_stderr(settings: &LogSettings) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(&settings.filter))
        .with_writer(std::io::stderr)
        .try_init();
}
