use tracing_appender::{non_blocking::WorkerGuard, rolling::Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::LoggingConfig;

const CRATES: &[&str] = &["common", "datastore", "precompiles", "types", "kettle"];

pub fn init_tracing_log(config: &LoggingConfig) -> WorkerGuard {
    let format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_thread_ids(false)
        .with_target(true)
        .compact();

    let log_level = std::env::var("RUST_LOG")
        .map(|lev| lev.parse().expect("invalid RUST_LOG, change to eg 'info'"))
        .unwrap_or(tracing::Level::INFO);

    let (writer, guard) = match config {
        LoggingConfig::Console => tracing_appender::non_blocking(std::io::stdout()),
        LoggingConfig::File { dir_path, file_name } => {
            let file_appender = tracing_appender::rolling::Builder::new()
                .filename_prefix(file_name)
                .max_log_files(14)
                .rotation(Rotation::DAILY)
                .build(dir_path)
                .expect("failed to create file log appender");

            tracing_appender::non_blocking(file_appender)
        }
    };

    let layer = tracing_subscriber::fmt::layer()
        .event_format(format)
        .with_writer(writer)
        .with_filter(get_crate_filter(log_level));

    tracing_subscriber::registry().with(layer).init();
    guard
}

fn get_crate_filter(crates_level: tracing::Level) -> EnvFilter {
    let mut env_filter = EnvFilter::new("info");

    for crate_name in CRATES {
        env_filter =
            env_filter.add_directive(format!("suave_{crate_name}={crates_level}").parse().unwrap())
    }

    env_filter
}
