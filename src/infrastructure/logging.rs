use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

const LOG_FILE_PREFIX: &str = "form-filler.log";

// sqlx reports every statement at info
const QUIET_DIRECTIVES: &[&str] = &["sqlx=warn"];

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Console output goes to stderr so stdout stays reserved for notices and
/// exported data. The log file keeps the full record of every session.
pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| build_filter(&config.logging.level));

        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        let console_layer = fmt::layer()
            .compact()
            .without_time()
            .with_writer(io::stderr)
            .with_target(false);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        tracing::debug!(
            logs = %paths.logs_dir.display(),
            db = %paths.db_path.display(),
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}

/// Filter for `LOG_LEVEL`, falling back to `info` when the level does not
/// parse.
fn build_filter(level: &str) -> EnvFilter {
    let base = EnvFilter::try_new(level.trim()).unwrap_or_else(|_| EnvFilter::new("info"));
    QUIET_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}
