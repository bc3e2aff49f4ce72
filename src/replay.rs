//! Action replay
//!
//! Orchestrates a replay run by coordinating the `ActionReader` (CSV input),
//! the `Storefront` (business logic) and the csv_format report writers.
//!
//! # Error Handling
//!
//! Fatal errors (input file missing or unreadable, report not writable) are
//! returned. Malformed rows and rejected actions are logged at warn and
//! counted, and the replay continues with the next row.

use crate::cli::ReportKind;
use crate::core::view::{SortOrder, TypeFilter};
use crate::core::Storefront;
use crate::io::csv_format::{write_catalog_csv, write_orders_csv};
use crate::io::ActionReader;
use crate::types::{OrderStatus, StoreError};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Counters for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Actions the storefront accepted
    pub applied: usize,

    /// Well-formed actions the storefront rejected
    pub rejected: usize,

    /// Rows that could not be parsed into an action
    pub malformed: usize,

    /// Accepted actions that went through a durable commit
    pub commits: usize,
}

/// What to print once the replay is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub kind: ReportKind,
    pub filter: TypeFilter,
    pub sort: SortOrder,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            kind: ReportKind::Catalog,
            filter: TypeFilter::All,
            sort: SortOrder::Newest,
        }
    }
}

/// Replay every action in `input_path` against `store`
///
/// # Errors
///
/// Returns an error only if the input file cannot be opened.
pub fn replay(store: &mut Storefront, input_path: &Path) -> Result<ReplaySummary, StoreError> {
    let reader = ActionReader::new(input_path)?;
    let mut summary = ReplaySummary::default();

    for row in reader {
        let action = match row {
            Ok(action) => action,
            Err(e) => {
                warn!(error = %e, "Skipping malformed action row");
                summary.malformed += 1;
                continue;
            }
        };

        let name = action.name();
        let durable = action.mutates_state();
        match store.apply(action) {
            Ok(()) => {
                debug!(action = name, "Action applied");
                summary.applied += 1;
                if durable {
                    summary.commits += 1;
                }
            }
            Err(e) if e.is_precondition() => {
                warn!(action = name, error = %e, "Action rejected");
                summary.rejected += 1;
            }
            Err(e) => {
                error!(action = name, error = %e, "Action failed, state unchanged");
                summary.rejected += 1;
            }
        }
    }

    let snapshot = store.snapshot();
    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        malformed = summary.malformed,
        commits = summary.commits,
        stock = snapshot.catalog.total_stock(),
        pending = snapshot.orders.count_with_status(OrderStatus::Pendiente),
        "Replay finished"
    );
    Ok(summary)
}

/// Write the requested report for the current store state
///
/// # Errors
///
/// Returns `IoError` if the output cannot be written.
pub fn write_report(
    store: &Storefront,
    options: &ReportOptions,
    output: &mut dyn Write,
) -> Result<(), StoreError> {
    match options.kind {
        ReportKind::Catalog => write_catalog_csv(&store.view(options.filter, options.sort), output),
        ReportKind::Orders => write_orders_csv(store.orders(), output),
    }
}
