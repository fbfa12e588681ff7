/// Console output adapters
mod readiness_printer;

pub use readiness_printer::{ReadinessPrinter, SyncSummary};
