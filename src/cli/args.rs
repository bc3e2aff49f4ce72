use crate::config::{StoreConfig, DEFAULT_REMOTE_TIMEOUT_SECS};
use crate::core::view::{SortOrder, TypeFilter};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Replay storefront actions and report the resulting state
#[derive(Parser, Debug)]
#[command(name = "sn-storefront")]
#[command(about = "Replay storefront actions and report the resulting state", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing storefront actions
    #[arg(value_name = "INPUT", help = "Path to the action CSV file")]
    pub input_file: PathBuf,

    #[arg(
        long = "remote-url",
        value_name = "URL",
        help = "Base URL of the hosted tables, overrides STOREFRONT_REMOTE_URL"
    )]
    pub remote_url: Option<String>,

    #[arg(
        long = "remote-key",
        value_name = "KEY",
        help = "Project key for the hosted tables, overrides STOREFRONT_REMOTE_KEY"
    )]
    pub remote_key: Option<String>,

    #[arg(
        long = "remote-timeout",
        value_name = "SECS",
        default_value_t = DEFAULT_REMOTE_TIMEOUT_SECS,
        help = "Remote request timeout in seconds"
    )]
    pub remote_timeout_secs: u64,

    #[arg(
        long = "cache-dir",
        value_name = "DIR",
        help = "Directory of the local state cache, overrides STOREFRONT_CACHE_DIR"
    )]
    pub cache_dir: Option<PathBuf>,

    /// Keep state in memory only; takes precedence over any cache directory
    #[arg(long = "ephemeral")]
    pub ephemeral: bool,

    /// Refuse to cancel orders whose payment was confirmed
    #[arg(long = "strict-cancellation")]
    pub strict_cancellation: bool,

    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "catalog",
        help = "Report printed after replay: 'catalog' or 'orders'"
    )]
    pub report: ReportKind,

    #[arg(
        long = "type",
        value_name = "TYPE",
        default_value = "all",
        help = "Catalog report filter: all, zoquete, 1/4 or 3/4"
    )]
    pub type_filter: TypeFilter,

    #[arg(
        long = "sort",
        value_name = "ORDER",
        default_value = "newest",
        help = "Catalog report order: newest, price-asc, price-desc or best-sellers"
    )]
    pub sort: SortOrder,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Report printed after replay
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Catalog,
    Orders,
}

impl CliArgs {
    /// Layer the CLI flags over a base configuration
    ///
    /// `base` is normally [`StoreConfig::from_env`]. Flags that were given
    /// replace the matching base values; `--ephemeral` drops the cache
    /// directory whatever its source.
    pub fn to_config(&self, base: StoreConfig) -> StoreConfig {
        let cache_dir = if self.ephemeral {
            None
        } else {
            self.cache_dir.clone().or(base.cache_dir)
        };

        StoreConfig {
            remote_url: self.remote_url.clone().unwrap_or(base.remote_url),
            remote_key: self.remote_key.clone().unwrap_or(base.remote_key),
            cache_dir,
            remote_timeout: Duration::from_secs(self.remote_timeout_secs),
            allow_paid_cancellation: !self.strict_cancellation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CACHE_DIR_VAR, REMOTE_KEY_VAR, REMOTE_URL_VAR};
    use crate::types::SockType;
    use rstest::rstest;

    #[rstest]
    #[case::default_report(&["program", "actions.csv"], ReportKind::Catalog)]
    #[case::catalog(&["program", "--report", "catalog", "actions.csv"], ReportKind::Catalog)]
    #[case::orders(&["program", "--report", "orders", "actions.csv"], ReportKind::Orders)]
    fn test_report_parsing(#[case] args: &[&str], #[case] expected: ReportKind) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.report, expected);
    }

    #[rstest]
    #[case::defaults(&["program", "actions.csv"], TypeFilter::All, SortOrder::Newest)]
    #[case::quarter(&["program", "--type", "1/4", "actions.csv"], TypeFilter::Only(SockType::Quarter), SortOrder::Newest)]
    #[case::best_sellers(
        &["program", "--type", "zoquete", "--sort", "best-sellers", "actions.csv"],
        TypeFilter::Only(SockType::Zoquete),
        SortOrder::BestSellers
    )]
    fn test_view_options(
        #[case] args: &[&str],
        #[case] filter: TypeFilter,
        #[case] sort: SortOrder,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.type_filter, filter);
        assert_eq!(parsed.sort, sort);
    }

    #[rstest]
    #[case::quiet(&["program", "actions.csv"], 0)]
    #[case::debug(&["program", "-v", "actions.csv"], 1)]
    #[case::trace(&["program", "-vv", "actions.csv"], 2)]
    fn test_verbosity(#[case] args: &[&str], #[case] expected: u8) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.verbose, expected);
    }

    #[test]
    fn test_config_from_flags() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--remote-url",
            "https://x.supabase.co",
            "--remote-key",
            "anon",
            "--remote-timeout",
            "3",
            "--cache-dir",
            "/tmp/sn",
            "--strict-cancellation",
            "actions.csv",
        ])
        .unwrap();

        let config = parsed.to_config(StoreConfig::default());

        assert!(config.remote_enabled());
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/sn")));
        assert_eq!(config.remote_timeout, Duration::from_secs(3));
        assert!(!config.allow_paid_cancellation);
    }

    #[rstest]
    #[case::flag_only(&["program", "--ephemeral", "actions.csv"])]
    #[case::with_cache_dir(&["program", "--ephemeral", "--cache-dir", "/tmp/sn", "actions.csv"])]
    fn test_ephemeral_config_has_no_cache_dir(#[case] args: &[&str]) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let base = StoreConfig {
            cache_dir: Some(PathBuf::from("/var/lib/storefront")),
            ..StoreConfig::default()
        };

        let config = parsed.to_config(base);

        assert_eq!(config.cache_dir, None);
        assert!(config.allow_paid_cancellation);
    }

    #[test]
    fn test_environment_values_apply_when_flags_are_absent() {
        let parsed = CliArgs::try_parse_from(["program", "actions.csv"]).unwrap();
        let base = StoreConfig::from_lookup(|name| match name {
            REMOTE_URL_VAR => Some("https://x.supabase.co".to_string()),
            REMOTE_KEY_VAR => Some("anon".to_string()),
            CACHE_DIR_VAR => Some("/var/lib/storefront".to_string()),
            _ => None,
        });

        let config = parsed.to_config(base);

        assert!(config.remote_enabled());
        assert_eq!(config.cache_dir, Some(PathBuf::from("/var/lib/storefront")));
    }

    #[test]
    fn test_flags_override_environment_values() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--remote-url",
            "https://y.supabase.co",
            "--cache-dir",
            "/tmp/sn",
            "actions.csv",
        ])
        .unwrap();
        let base = StoreConfig {
            remote_url: "https://x.supabase.co".to_string(),
            remote_key: "anon".to_string(),
            cache_dir: Some(PathBuf::from("/var/lib/storefront")),
            ..StoreConfig::default()
        };

        let config = parsed.to_config(base);

        assert_eq!(config.remote_url, "https://y.supabase.co");
        assert_eq!(config.remote_key, "anon");
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/sn")));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_report(&["program", "--report", "invalid", "actions.csv"])]
    #[case::invalid_type(&["program", "--type", "5/4", "actions.csv"])]
    #[case::invalid_sort(&["program", "--sort", "cheapest", "actions.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
