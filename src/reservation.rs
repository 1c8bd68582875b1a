//! Stay intervals and pre-submission reservation validation
//!
//! Validation here is advisory: the ledger remains the final authority and
//! may reject a submission the client considered valid. Its job is to stop
//! obviously broken intervals before any mutating call is issued.

use crate::date::{enumerate_nights, nights_between, DayKey};
use crate::error::{BookingError, Result};
use serde::{Deserialize, Serialize};

/// A half-open stay range `[check_in, check_out)`.
///
/// The constructor enforces `check_in < check_out`, so every interval in
/// circulation covers at least one night. The checkout day itself is not
/// occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayInterval {
    check_in: DayKey,
    check_out: DayKey,
}

impl StayInterval {
    pub fn new(check_in: DayKey, check_out: DayKey) -> Result<StayInterval> {
        if check_in >= check_out {
            return Err(BookingError::InvalidInterval {
                check_in: check_in.raw(),
                check_out: check_out.raw(),
            });
        }
        Ok(StayInterval { check_in, check_out })
    }

    pub fn check_in(&self) -> DayKey {
        self.check_in
    }

    pub fn check_out(&self) -> DayKey {
        self.check_out
    }

    /// Number of occupied nights
    pub fn nights(&self) -> u32 {
        nights_between(self.check_in, self.check_out)
    }

    /// Every occupied night, ascending. Never empty.
    pub fn night_keys(&self) -> Vec<DayKey> {
        // check_in < check_out is a construction invariant
        enumerate_nights(self.check_in, self.check_out).unwrap_or_default()
    }
}

/// Stay length for display and pricing, computed once validity is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayLength {
    pub nights: u32,
}

/// Whether a prospective stay is acceptable for submission.
///
/// All rules must hold: both keys decode to real calendar dates, check-in is
/// not in the past relative to `today`, and the stay covers at least one
/// night. Pure; takes raw keys so malformed input is part of the check.
pub fn is_valid_stay(check_in: u32, check_out: u32, today: u32) -> bool {
    DayKey::decode(check_in).is_ok()
        && DayKey::decode(check_out).is_ok()
        && check_in >= today
        && check_out > check_in
}

/// Stay length wrapper over the night arithmetic.
pub fn compute_stay_length(check_in: DayKey, check_out: DayKey) -> StayLength {
    StayLength {
        nights: nights_between(check_in, check_out),
    }
}
