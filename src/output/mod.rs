//! Output module for everything a run reports
//!
//! This module handles:
//! - JSON status messages on stdout
//! - Recording finished collector runs in the ledger
//! - Printing run history

mod recorder;
mod stats;
mod status;

pub use recorder::{run_id, CollectionRunRecorder, TIMESTAMP_FORMAT};
pub use stats::{load_history, print_history, RunHistory};
pub use status::{Status, StatusMessage};
