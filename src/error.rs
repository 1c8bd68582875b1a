//! Error types for the Innkeeper SDK

use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, BookingError>;

/// Booking error types
///
/// Derives `Clone` so a single coalesced ledger failure can be handed to
/// every waiting caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Day key is not a real calendar date (bad month/day or not YYYYMMDD)
    #[error("invalid date key: {0}")]
    InvalidDateFormat(u32),

    /// Check-in/check-out pair violates interval rules
    #[error("invalid stay interval: check-in {check_in}, check-out {check_out}")]
    InvalidInterval { check_in: u32, check_out: u32 },

    /// Ledger returned fewer entries than the requested period requires
    #[error("incomplete statistics data: expected {expected} entries, got {actual}")]
    IncompleteStatisticsData { expected: usize, actual: usize },

    /// The ledger call itself failed (network/contract error)
    #[error("ledger gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// One or more sub-queries in a fan-out failed while others succeeded
    #[error("partial resolution: {failed} of {total} sub-queries failed")]
    PartialResolutionFailure { failed: usize, total: usize },

    /// Rating outside the 1-5 range
    #[error("rating out of range: {0}")]
    InvalidRating(u8),
}

/// A sub-query that failed during a fan-out, keyed by what was being asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedQuery {
    /// Logical key of the failed sub-query (e.g. "hotel 2 room 104")
    pub key: String,
    /// The recovered error
    pub error: BookingError,
}

/// Result of a fan-out that tolerates per-item failures.
///
/// The value holds everything that resolved; `failures` holds what did not,
/// so a caller can distinguish "no data" from "some data missing".
#[derive(Debug, Clone)]
pub struct Partial<T> {
    /// The successfully resolved portion
    pub value: T,
    /// Sub-queries that failed and were recovered
    pub failures: Vec<FailedQuery>,
}

impl<T> Partial<T> {
    /// Wrap a fully resolved value with no failures
    pub fn complete(value: T) -> Self {
        Self { value, failures: Vec::new() }
    }

    /// Whether any sub-query failed
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Record a recovered sub-query failure
    pub fn push_failure(&mut self, key: impl Into<String>, error: BookingError) {
        self.failures.push(FailedQuery { key: key.into(), error });
    }

    /// Escalate the failure list to a `PartialResolutionFailure` signal,
    /// given the total number of sub-queries issued.
    pub fn signal(&self, total: usize) -> Option<BookingError> {
        if self.failures.is_empty() {
            None
        } else {
            Some(BookingError::PartialResolutionFailure {
                failed: self.failures.len(),
                total,
            })
        }
    }
}
