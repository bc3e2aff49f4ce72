//! Storefront action replay CLI
//!
//! Hydrates a storefront from its configured stores, replays a CSV of user
//! actions against it, and prints a CSV report of the resulting state.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- actions.csv > catalog.csv
//! cargo run -- --ephemeral --report orders actions.csv > orders.csv
//! cargo run -- --type 1/4 --sort best-sellers actions.csv
//! STOREFRONT_REMOTE_URL=https://xyz.supabase.co STOREFRONT_REMOTE_KEY=... cargo run -- actions.csv
//! ```
//!
//! Logs are written to stderr (`RUST_LOG`, or `-v` / `-vv`).
//!
//! # Exit Codes
//!
//! - 0: Success (rejected actions are logged, not fatal)
//! - 1: Error (missing arguments, input not readable, cache directory not
//!   writable, report not writable)

use sn_storefront::cli;
use sn_storefront::core::Storefront;
use sn_storefront::logging;
use sn_storefront::replay::{self, ReportOptions};
use sn_storefront::StoreConfig;
use std::process;
use tracing::error;

fn main() {
    // Loads .env first, so RUST_LOG from it reaches the subscriber too
    let env_config = StoreConfig::from_env();

    let args = cli::parse_args();
    logging::init(args.verbose);

    let config = args.to_config(env_config);
    let options = ReportOptions {
        kind: args.report,
        filter: args.type_filter,
        sort: args.sort,
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to start async runtime");
            process::exit(1);
        }
    };

    let mut store = match runtime.block_on(Storefront::open(&config)) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to open storefront");
            process::exit(1);
        }
    };

    // Remote uploads are spawned onto this runtime during replay
    let result = {
        let _guard = runtime.enter();
        replay::replay(&mut store, &args.input_file).and_then(|_| {
            let mut output = std::io::stdout();
            replay::write_report(&store, &options, &mut output)
        })
    };

    runtime.block_on(store.flush());

    if let Err(e) = result {
        error!(error = %e, "Replay failed");
        process::exit(1);
    }
}
