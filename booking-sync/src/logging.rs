//! Logging Infrastructure
//!
//! - console output, human-readable or JSON
//! - optional daily rotating files under `LOG_DIR/app` (kept 14 days)
//! - `security` target (rejected webhook calls) written to `LOG_DIR/security`,
//!   never cleaned up

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::Layered;
use tracing_subscriber::{EnvFilter, Layer, Registry, filter, fmt, prelude::*};

/// Target used for authentication failures
pub const SECURITY_TARGET: &str = "security";

const APP_LOG_RETENTION_DAYS: i64 = 14;

type Base = Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Base> + Send + Sync>;

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = vec![if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    }];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        let app_log_dir = log_dir.join("app");
        let security_log_dir = log_dir.join(SECURITY_TARGET);
        fs::create_dir_all(&app_log_dir)?;
        fs::create_dir_all(&security_log_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, &app_log_dir, "app");
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(filter::filter_fn(|meta| meta.target() != SECURITY_TARGET))
                .boxed(),
        );

        let security_log =
            RollingFileAppender::new(Rotation::DAILY, &security_log_dir, SECURITY_TARGET);
        layers.push(
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(security_log))
                .with_filter(filter::filter_fn(|meta| meta.target() == SECURITY_TARGET))
                .boxed(),
        );

        tokio::spawn(periodic_cleanup(app_log_dir));
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    Ok(())
}

/// Delete `app.YYYY-MM-DD` files older than the retention window
pub fn cleanup_old_logs(app_log_dir: &Path) -> anyhow::Result<()> {
    let cutoff = chrono::Local::now().date_naive() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);

    if !app_log_dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(date) = name
            .strip_prefix("app.")
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            && date < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }
    Ok(())
}

async fn periodic_cleanup(app_log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        if let Err(e) = cleanup_old_logs(&app_log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
        sleep(Duration::from_secs(3600)).await;
    }
}
