//! Report rendering and user-facing notices

pub mod formatter;
pub mod report;
pub mod status;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::AnalysisReport;
pub use status::{Notice, NoticeLevel, StatusPrinter};
