use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Effective verbosity: the larger of the `-v` count and the environment override
///
/// An unparsable override is ignored.
pub fn effective_verbosity(flag_count: u8, env_value: Option<&str>) -> u8 {
    let from_env = env_value
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(0);
    flag_count.max(from_env)
}

/// Map verbosity to the most detailed level shown
///
/// - 0: errors only
/// - 1: info and warnings
/// - 2: debug
/// - 3+: trace
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber writing to stderr
pub fn init(verbosity: u8) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}
