//! Log subscriber setup
//!
//! Logs go to stderr so stdout carries only the CSV report. `RUST_LOG`
//! controls filtering unless `-v` is given, which forces `debug` (`-vv`:
//! `trace`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level directive for a verbosity count, `None` when `RUST_LOG` should decide
pub fn level_for(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Install the global subscriber
///
/// A second call is a no-op.
pub fn init(verbose: u8) {
    let env_filter = match level_for(verbose) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default(0, None)]
    #[case::debug(1, Some("debug"))]
    #[case::trace(2, Some("trace"))]
    #[case::saturates(7, Some("trace"))]
    fn test_level_for(#[case] verbose: u8, #[case] expected: Option<&str>) {
        assert_eq!(level_for(verbose), expected);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(1);
        init(0);
    }
}
