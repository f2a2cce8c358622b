//! Block parsing for the SA_SPAMEAS and MS_PROCESS_MEAS measurement tables.

pub mod block;
pub mod parse;
pub mod row;

pub use parse::{BlockPolicy, extract};
pub use row::{MeasStore, ProcessMeasRecord, ReportTime, SpaMeasRecord};
