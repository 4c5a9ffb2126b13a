//! Process-wide tracing setup.
//!
//! Application events go to `log_dir/log_file` (plus stdout in text mode).
//! Request lines from the gateway are emitted under [`ACCESS_TARGET`] and,
//! when `access_log_file` is configured, land in their own rolling file
//! instead of the application log.

use crate::config::AppConfig;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, fmt, prelude::*};

/// Target of the per-request access log lines.
pub const ACCESS_TARGET: &str = "etherdoc::access";

/// Flushes the file writers when dropped. Hold it for the process lifetime.
pub struct LogGuards {
    _app: WorkerGuard,
    _access: Option<WorkerGuard>,
}

fn appender(config: &AppConfig, file: &str) -> RollingFileAppender {
    match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, file),
        _ => tracing_appender::rolling::never(&config.log_dir, file),
    }
}

/// Global filter directives. Outbound HTTP internals are noisy at debug
/// level, and access lines stay at info under a quieter `log_level`.
pub fn filter_directives(log_level: &str) -> String {
    format!("{},hyper=warn,reqwest=warn,{}=info", log_level, ACCESS_TARGET)
}

/// Targets the application log accepts. Access lines are left out once
/// they have a file of their own.
pub fn app_targets(split_access: bool) -> Targets {
    let targets = Targets::new().with_default(Level::TRACE);
    if split_access {
        targets.with_target(ACCESS_TARGET, LevelFilter::OFF)
    } else {
        targets
    }
}

pub fn access_targets() -> Targets {
    Targets::new().with_target(ACCESS_TARGET, Level::INFO)
}

fn file_layer<S>(writer: NonBlocking, json: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    }
}

/// Install the global subscriber.
pub fn init_logging(config: &AppConfig) -> LogGuards {
    let (app_writer, app_guard) =
        tracing_appender::non_blocking(appender(config, &config.log_file));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.log_level)));

    let (access_writer, access_guard) = match config.access_log_file.as_deref() {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(appender(config, file));
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };
    let split_access = access_writer.is_some();

    let app_layer = file_layer(app_writer, config.use_json).with_filter(app_targets(split_access));
    let access_layer = access_writer
        .map(|writer| file_layer(writer, config.use_json).with_filter(access_targets()));
    let stdout_layer = (!config.use_json).then(|| fmt::layer().with_target(false).with_ansi(true));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(access_layer)
        .with(stdout_layer)
        .init();

    LogGuards {
        _app: app_guard,
        _access: access_guard,
    }
}
