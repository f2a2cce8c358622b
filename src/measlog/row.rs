use serde::Serialize;
use std::fmt;

/// Block report time, `YYYY-MM-DD hh:mm`.
///
/// Kept as the text the log prints; rows from different tables are joined on
/// exact equality of this value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportTime(pub String);

impl ReportTime {
    /// Substituted when a block start line carries no timestamp.
    pub const SENTINEL: &'static str = "1970-01-01 12:00";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn sentinel() -> Self {
        Self(Self::SENTINEL.to_string())
    }
}

impl fmt::Display for ReportTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single row from an SA_SPAMEAS block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaMeasRecord {
    pub spa_name: String,
    /// value / count, truncated; 0 when count is 0.
    pub tps: u64,
    pub report_time: ReportTime,
}

impl SpaMeasRecord {
    pub fn new(count: u64, spa_name: impl Into<String>, value: u64, report_time: ReportTime) -> Self {
        Self {
            spa_name: spa_name.into(),
            tps: value.checked_div(count).unwrap_or(0),
            report_time,
        }
    }
}

/// A single row from an MS_PROCESS_MEAS block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessMeasRecord {
    /// `d-d-d` host identifier, e.g. `0-0-4`.
    pub host_id: String,
    pub process_name: String,
    pub cpu_usage: f64,
    pub report_time: ReportTime,
}

/// Every record pulled out of one measurement log, in log order.
#[derive(Debug, Clone, Default)]
pub struct MeasStore {
    pub spa: Vec<SpaMeasRecord>,
    pub process: Vec<ProcessMeasRecord>,
}

impl MeasStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spa.is_empty() && self.process.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tps_is_truncating_division() {
        let rec = SpaMeasRecord::new(10, "EPAYSRV", 105, ReportTime::new("2016-03-08 10:00"));
        assert_eq!(rec.tps, 10);
    }

    #[test]
    fn tps_with_zero_count_is_zero() {
        let rec = SpaMeasRecord::new(0, "EPAYSRV", 100, ReportTime::sentinel());
        assert_eq!(rec.tps, 0);
    }

    #[test]
    fn report_time_serializes_as_plain_string() {
        let json = serde_json::to_string(&ReportTime::new("2016-03-08 10:00")).unwrap();
        assert_eq!(json, "\"2016-03-08 10:00\"");
    }
}
