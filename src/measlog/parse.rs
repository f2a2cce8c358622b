use crate::error::MeasError;
use crate::measlog::block::{self, Block};
use crate::measlog::row::{MeasStore, ProcessMeasRecord, ReportTime, SpaMeasRecord};
use regex::Regex;
use std::sync::LazyLock;

/// Header text opening an SA_SPAMEAS block.
pub const SA_SPAMEAS_HEADER: &str = "Measurements for SA_SPAMEAS table";
/// Header text opening an MS_PROCESS_MEAS block.
pub const MS_PROCESS_MEAS_HEADER: &str = "Measurements for MS_PROCESS_MEAS table";

/// Compiled patterns for the measurement log layout.
pub struct MeasPatterns {
    /// Match: "+++    SWITCH-A  2016-03-08 10:00:00"
    pub block_start: Regex,
    /// Match: "+--    END" (older dumps print "++-")
    pub block_end: Regex,
    /// Match: "2016-03-08 10:00"
    pub report_time: Regex,
    /// Match: "   10  EPAYSRV   100   0"  (count, spa_name, value, _)
    pub spa_row: Regex,
    /// Match: "  299  0-0-9   DIAMCL28I_2    18.89"  (_, host, process, cpu)
    pub process_row: Regex,
}

impl MeasPatterns {
    pub fn new() -> Self {
        Self {
            block_start: Regex::new(r"\+\+\+").expect("Invalid block_start regex"),
            block_end: Regex::new(r"\+[+-]-").expect("Invalid block_end regex"),
            report_time: Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2})")
                .expect("Invalid report_time regex"),
            spa_row: Regex::new(r"(\d+)\s+(\S+)\s+(\d+)\s+\d+").expect("Invalid spa_row regex"),
            process_row: Regex::new(r"\d+\s+(\d+-\d+-\d+)\s+(\S+)\s+(\d+\.\d+)")
                .expect("Invalid process_row regex"),
        }
    }
}

impl Default for MeasPatterns {
    fn default() -> Self {
        Self::new()
    }
}

pub static PATTERNS: LazyLock<MeasPatterns> = LazyLock::new(MeasPatterns::new);

/// The two tables we pull rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    SaSpaMeas,
    MsProcessMeas,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::SaSpaMeas => "SA_SPAMEAS",
            Table::MsProcessMeas => "MS_PROCESS_MEAS",
        }
    }
}

/// What to do when a table header sits in a block without both markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockPolicy {
    /// Warn, skip the header line and keep scanning.
    #[default]
    Skip,
    /// Abort extraction with `MeasError::MalformedBlock`.
    Fail,
}

pub fn is_block_start(line: &str) -> bool {
    PATTERNS.block_start.is_match(line)
}

pub fn is_block_end(line: &str) -> bool {
    PATTERNS.block_end.is_match(line)
}

pub fn report_time_of(line: &str) -> Option<ReportTime> {
    let caps = PATTERNS.report_time.captures(line)?;
    Some(ReportTime::new(caps.get(1)?.as_str()))
}

/// Which table, if any, this line is the header of.
pub fn table_of_header(line: &str) -> Option<Table> {
    if line.contains(SA_SPAMEAS_HEADER) {
        Some(Table::SaSpaMeas)
    } else if line.contains(MS_PROCESS_MEAS_HEADER) {
        Some(Table::MsProcessMeas)
    } else {
        None
    }
}

/// Parse one SA_SPAMEAS row. Non-matching lines (and counters too large for
/// u64) give `None`.
pub fn parse_spa_row(line: &str, report_time: &ReportTime) -> Option<SpaMeasRecord> {
    let caps = PATTERNS.spa_row.captures(line)?;
    let count: u64 = caps.get(1)?.as_str().parse().ok()?;
    let spa_name = caps.get(2)?.as_str();
    let value: u64 = caps.get(3)?.as_str().parse().ok()?;
    Some(SpaMeasRecord::new(count, spa_name, value, report_time.clone()))
}

/// Parse one MS_PROCESS_MEAS row.
pub fn parse_process_row(line: &str, report_time: &ReportTime) -> Option<ProcessMeasRecord> {
    let caps = PATTERNS.process_row.captures(line)?;
    Some(ProcessMeasRecord {
        host_id: caps.get(1)?.as_str().to_string(),
        process_name: caps.get(2)?.as_str().to_string(),
        cpu_usage: caps.get(3)?.as_str().parse().ok()?,
        report_time: report_time.clone(),
    })
}

/// Scan the whole log once and collect rows of both tables into a fresh store.
pub fn extract<S: AsRef<str>>(lines: &[S], policy: BlockPolicy) -> Result<MeasStore, MeasError> {
    let mut store = MeasStore::new();
    extract_into(lines, policy, &mut store)?;
    Ok(store)
}

/// Same as [`extract`], appending to an existing store.
///
/// Every header line triggers a block lookup; rows are read from `begin` up to
/// (not including) `end`, and the scan resumes after `end`.
pub fn extract_into<S: AsRef<str>>(
    lines: &[S],
    policy: BlockPolicy,
    store: &mut MeasStore,
) -> Result<(), MeasError> {
    let mut idx = 0;
    while idx < lines.len() {
        let Some(table) = table_of_header(lines[idx].as_ref()) else {
            idx += 1;
            continue;
        };

        let block = match block::locate(lines, idx) {
            Ok(b) => b,
            Err(err) => match policy {
                BlockPolicy::Fail => return Err(err),
                BlockPolicy::Skip => {
                    log::warn!("skipping {} table: {}", table.name(), err);
                    idx += 1;
                    continue;
                }
            },
        };

        let rows = collect_rows(lines, table, &block, store);
        log::info!(
            "Finished processing [{}] {} table ({} rows)",
            block.report_time,
            table.name(),
            rows
        );

        idx = idx.max(block.end) + 1;
    }

    Ok(())
}

fn collect_rows<S: AsRef<str>>(
    lines: &[S],
    table: Table,
    block: &Block,
    store: &mut MeasStore,
) -> usize {
    let mut rows = 0;
    for line in &lines[block.begin..block.end] {
        let line = line.as_ref();
        match table {
            Table::SaSpaMeas => {
                if let Some(rec) = parse_spa_row(line, &block.report_time) {
                    log::debug!("SA_SPAMEAS row: {:?}", rec);
                    store.spa.push(rec);
                    rows += 1;
                }
            }
            Table::MsProcessMeas => {
                if let Some(rec) = parse_process_row(line, &block.report_time) {
                    log::debug!("MS_PROCESS_MEAS row: {:?}", rec);
                    store.process.push(rec);
                    rows += 1;
                }
            }
        }
    }
    rows
}
