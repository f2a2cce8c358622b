//! Locating the report block around a line.
//!
//! A block opens on a `+++` line that also carries the report time, and closes
//! on the first end-marker line after it:
//!
//! ```text
//! +++    SWITCH-A  2016-03-08 10:00:00
//!        Measurements for SA_SPAMEAS table
//!    10  EPAYSRV   100   0
//! +--    END
//! ```

use crate::error::{Marker, MeasError};
use crate::measlog::parse::{is_block_end, is_block_start, report_time_of};
use crate::measlog::row::ReportTime;

/// Line span `[begin, end]` of one block plus its report time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub begin: usize,
    pub end: usize,
    pub report_time: ReportTime,
}

/// Find the block enclosing `pos`.
///
/// Scans back from `pos` (inclusive) to the start marker and forward from
/// `pos` (inclusive) to the end marker. Running off either edge of `lines`
/// yields `MeasError::MalformedBlock`. A start line without a timestamp is
/// not an error: the block gets `ReportTime::SENTINEL` and a warning is logged.
pub fn locate<S: AsRef<str>>(lines: &[S], pos: usize) -> Result<Block, MeasError> {
    if pos >= lines.len() {
        return Err(MeasError::MalformedBlock {
            line: pos + 1,
            marker: Marker::End,
        });
    }

    let mut begin = pos;
    while !is_block_start(lines[begin].as_ref()) {
        if begin == 0 {
            return Err(MeasError::MalformedBlock {
                line: pos + 1,
                marker: Marker::Start,
            });
        }
        begin -= 1;
    }

    let mut end = pos;
    while !is_block_end(lines[end].as_ref()) {
        end += 1;
        if end == lines.len() {
            return Err(MeasError::MalformedBlock {
                line: pos + 1,
                marker: Marker::End,
            });
        }
    }

    let report_time = match report_time_of(lines[begin].as_ref()) {
        Some(t) => t,
        None => {
            log::warn!(
                "failed to get report time of the block starting at line {}; using {}",
                begin + 1,
                ReportTime::SENTINEL
            );
            ReportTime::sentinel()
        }
    };

    Ok(Block {
        begin,
        end,
        report_time,
    })
}
