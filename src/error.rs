//! Typed errors raised while walking the measurement log.

use std::fmt;

/// Which boundary of a report block could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Start,
    End,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Start => f.write_str("start (+++)"),
            Marker::End => f.write_str("end (++- / +--)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeasError {
    /// `line` is 1-based, pointing at the anchor the scan started from.
    #[error("malformed block at line {line}: no {marker} marker before the log boundary")]
    MalformedBlock { line: usize, marker: Marker },
}
