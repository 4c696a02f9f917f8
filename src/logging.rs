//! Log sink setup
//!
//! Two tracing layers: a console layer for operator feedback and an append-only
//! file layer for the deployment audit trail. The file layer is pinned to WARN
//! so per-command INFO noise never reaches the persisted log; the success audit
//! line is emitted at WARN and is the only thing a normal run appends.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Initialize console and file logging.
///
/// Console level comes from the LOGGING or LOG_LEVEL env vars
/// (LOGGING=debug,info,warn,error or just LOGGING=debug), falling back to
/// debug when `verbose` is set and info otherwise. The file layer appends to
/// `log_file` at WARN regardless of the console level.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });
    let console_filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false) // Disable ANSI escape codes for cleaner output
        .with_filter(console_filter);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(AuditFormat)
        .with_writer(Arc::new(file))
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Legacy audit file format: `YYYY-MM-DD HH:MM:SS - LEVEL - message`.
struct AuditFormat;

impl<S, N> FormatEvent<S, N> for AuditFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level_name(*event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Existing log consumers expect WARN spelled out as WARNING.
fn level_name(level: Level) -> &'static str {
    if level == Level::ERROR {
        "ERROR"
    } else if level == Level::WARN {
        "WARNING"
    } else if level == Level::INFO {
        "INFO"
    } else if level == Level::DEBUG {
        "DEBUG"
    } else {
        "TRACE"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_names_match_legacy_format() {
        assert_eq!(level_name(Level::WARN), "WARNING");
        assert_eq!(level_name(Level::ERROR), "ERROR");
        assert_eq!(level_name(Level::INFO), "INFO");
        assert_eq!(level_name(Level::DEBUG), "DEBUG");
        assert_eq!(level_name(Level::TRACE), "TRACE");
    }
}
