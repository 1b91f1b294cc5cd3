//! CLI command handlers, one per file.

mod fetch;
mod localize;
mod scan;

pub use fetch::run_fetch;
pub use localize::{run_localize, LocalizeOptions};
pub use scan::run_scan;
