use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::Format};

/// `RUST_LOG`, when set, wins over `--log-level`.
pub fn setup_tracing(log_level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .event_format(
            Format::default()
                .with_ansi(true)
                .with_level(true)
                .with_target(false)
                .compact(),
        )
        .init();
}
