//! Glycorisk: diabetes risk decision support
//!
//! Main entry point for the console application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glycorisk::adapters::sanitize::SanitizingMakeWriter;
use glycorisk::console::App;

/// Where log lines go. Stdout is reserved for the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    File,
    Stderr,
}

/// `file` and `stderr` (or `stdout`, kept as an alias) force a target;
/// anything else logs to a file on an interactive terminal and to stderr
/// otherwise.
fn log_target(mode: &str, interactive: bool) -> LogTarget {
    match mode {
        "file" => LogTarget::File,
        "stderr" | "stdout" => LogTarget::Stderr,
        // auto
        _ if interactive => LogTarget::File,
        _ => LogTarget::Stderr,
    }
}

fn main() -> Result<()> {
    let log_mode = std::env::var("GLYCORISK_LOG_MODE").unwrap_or_else(|_| "auto".to_string());
    let target = log_target(&log_mode, std::io::stdout().is_terminal());

    let (writer, _guard) = if target == LogTarget::File {
        let log_file =
            std::env::var("GLYCORISK_LOG_FILE").unwrap_or_else(|_| "glycorisk.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: open() below reports the real failure.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting Glycorisk...");

    let app = App::new()?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    app.run(&mut stdin.lock(), &mut stdout)?;

    tracing::info!("Glycorisk shutdown complete.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_target() {
        assert_eq!(log_target("auto", true), LogTarget::File);
        assert_eq!(log_target("auto", false), LogTarget::Stderr);
        assert_eq!(log_target("file", false), LogTarget::File);
        assert_eq!(log_target("stdout", true), LogTarget::Stderr);
        assert_eq!(log_target("stderr", true), LogTarget::Stderr);
    }
}
