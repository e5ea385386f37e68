use anyhow::{bail, Context, Result};
use flexi_logger::{Logger, LoggerHandle};

const DEFAULT_LEVEL: &str = "warn";

/// Start logging to stderr. An explicit level wins over `RUST_LOG`.
pub fn init_logging(level: Option<&str>) -> Result<LoggerHandle> {
    let logger = match level {
        Some(level) => Logger::try_with_str(normalize_level(level)?),
        None => Logger::try_with_env_or_str(DEFAULT_LEVEL),
    }
    .context("invalid log specification")?;

    logger
        .log_to_stderr()
        .format_for_stderr(flexi_logger::default_format)
        .start()
        .context("failed to start logger")
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => bail!("unsupported log level `{other}`; expected trace|debug|info|warn|error|off"),
    }
}
