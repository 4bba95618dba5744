pub mod export;
pub mod formatter;

pub use export::{write_report, ReportDocument};
pub use formatter::print_report;
