use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

const FALLBACK_LEVEL: &str = "warn";

/// Фильтр из уже выбранного уровня (`LOG_LEVEL`, затем `RUST_LOG`).
/// Некорректная строка заменяется на `warn`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL))
}

/// Логи идут в stderr, чтобы не смешиваться с выводом команд.
pub fn init_logging(level: &str) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
