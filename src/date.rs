//! Calendar date codec
//!
//! Dates travel through the ledger interface as `YYYYMMDD` integers. This
//! module owns the codec for that encoding plus the night arithmetic the
//! booking domain is built on: a stay occupies every night from check-in
//! up to but excluding check-out.

use crate::error::{BookingError, Result};
use serde::{Deserialize, Serialize};

/// A calendar date encoded as `year * 10000 + month * 100 + day`.
///
/// Construction validates: every `DayKey` in circulation decodes to a real
/// calendar date. Numeric ordering matches chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(u32);

impl DayKey {
    /// Encode a calendar date. Fails only for out-of-calendar components.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<DayKey> {
        let raw = year as u32 * 10_000 + month as u32 * 100 + day as u32;
        Self::decode(raw)
    }

    /// Decode a raw `YYYYMMDD` integer, rejecting anything that is not a
    /// real calendar date: the year must be four digits, the month 1-12,
    /// and the day within the month's actual length (leap years respected).
    pub fn decode(raw: u32) -> Result<DayKey> {
        let year = raw / 10_000;
        let month = (raw / 100 % 100) as u8;
        let day = (raw % 100) as u8;

        if !(1000..=9999).contains(&year)
            || !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year as u16, month)
        {
            return Err(BookingError::InvalidDateFormat(raw));
        }
        Ok(DayKey(raw))
    }

    /// Today's date per the local clock
    pub fn today() -> DayKey {
        use chrono::Datelike;
        let now = chrono::Local::now().date_naive();
        // Always a real calendar date within the four-digit year range
        DayKey(now.year() as u32 * 10_000 + now.month() * 100 + now.day())
    }

    /// The raw `YYYYMMDD` integer, as the ledger expects it
    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn year(self) -> u16 {
        (self.0 / 10_000) as u16
    }

    pub fn month(self) -> u8 {
        (self.0 / 100 % 100) as u8
    }

    pub fn day(self) -> u8 {
        (self.0 % 100) as u8
    }

    /// The following calendar day, rolling over month and year boundaries
    pub fn next(self) -> DayKey {
        let (year, month, day) = (self.year(), self.month(), self.day());
        if day < days_in_month(year, month) {
            DayKey(self.0 + 1)
        } else if month < 12 {
            DayKey(year as u32 * 10_000 + (month as u32 + 1) * 100 + 1)
        } else {
            DayKey((year as u32 + 1) * 10_000 + 100 + 1)
        }
    }

    /// Days since the civil epoch (1970-01-01), for day-distance arithmetic
    fn ordinal(self) -> i64 {
        days_from_civil(self.year() as i64, self.month() as i64, self.day() as i64)
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

/// Leap year per the Gregorian rule
pub fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month
pub fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Absolute count of calendar days between two dates. Symmetric, zero iff
/// the dates are equal.
pub fn nights_between(a: DayKey, b: DayKey) -> u32 {
    (a.ordinal() - b.ordinal()).unsigned_abs() as u32
}

/// Every night of a stay: check-in inclusive to check-out exclusive, in
/// ascending order. Empty iff the dates are equal; `InvalidInterval` if
/// check-in is after check-out.
pub fn enumerate_nights(check_in: DayKey, check_out: DayKey) -> Result<Vec<DayKey>> {
    if check_in > check_out {
        return Err(BookingError::InvalidInterval {
            check_in: check_in.raw(),
            check_out: check_out.raw(),
        });
    }
    let mut nights = Vec::with_capacity(nights_between(check_in, check_out) as usize);
    let mut current = check_in;
    while current < check_out {
        nights.push(current);
        current = current.next();
    }
    Ok(nights)
}

// Howard Hinnant's civil-days algorithm: days since 1970-01-01 for a
// proleptic Gregorian date.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_ordinary_dates() {
        for raw in [20250101, 20250731, 19991231, 20241115] {
            let key = DayKey::decode(raw).unwrap();
            let again = DayKey::from_ymd(key.year(), key.month(), key.day()).unwrap();
            assert_eq!(key, again);
            assert_eq!(again.raw(), raw);
        }
    }

    #[test]
    fn round_trips_leap_day() {
        let key = DayKey::decode(20240229).unwrap();
        assert_eq!((key.year(), key.month(), key.day()), (2024, 2, 29));
        assert_eq!(DayKey::from_ymd(2024, 2, 29).unwrap(), key);
        // 2000 is a leap year (divisible by 400), 1900 is not
        assert!(DayKey::decode(20000229).is_ok());
        assert_eq!(
            DayKey::decode(19000229),
            Err(BookingError::InvalidDateFormat(19000229))
        );
    }

    #[test]
    fn rejects_out_of_calendar_keys() {
        assert_eq!(
            DayKey::decode(20250231),
            Err(BookingError::InvalidDateFormat(20250231))
        );
        assert_eq!(
            DayKey::decode(20251301),
            Err(BookingError::InvalidDateFormat(20251301))
        );
        assert_eq!(
            DayKey::decode(20250100),
            Err(BookingError::InvalidDateFormat(20250100))
        );
        // Not structurally YYYYMMDD (three-digit year)
        assert_eq!(
            DayKey::decode(9990101),
            Err(BookingError::InvalidDateFormat(9990101))
        );
    }

    #[test]
    fn next_rolls_month_and_year_boundaries() {
        assert_eq!(DayKey::decode(20250131).unwrap().next().raw(), 20250201);
        assert_eq!(DayKey::decode(20251231).unwrap().next().raw(), 20260101);
        assert_eq!(DayKey::decode(20240228).unwrap().next().raw(), 20240229);
        assert_eq!(DayKey::decode(20240229).unwrap().next().raw(), 20240301);
        assert_eq!(DayKey::decode(20230228).unwrap().next().raw(), 20230301);
    }

    #[test]
    fn nights_between_is_symmetric() {
        let a = DayKey::decode(20250110).unwrap();
        let b = DayKey::decode(20250113).unwrap();
        assert_eq!(nights_between(a, b), 3);
        assert_eq!(nights_between(b, a), 3);
        assert_eq!(nights_between(a, a), 0);

        // Across a year boundary
        let dec = DayKey::decode(20241231).unwrap();
        let jan = DayKey::decode(20250101).unwrap();
        assert_eq!(nights_between(dec, jan), 1);
    }

    #[test]
    fn enumerate_nights_excludes_checkout() {
        let nights = enumerate_nights(
            DayKey::decode(20250110).unwrap(),
            DayKey::decode(20250113).unwrap(),
        )
        .unwrap();
        let raw: Vec<u32> = nights.iter().map(|k| k.raw()).collect();
        assert_eq!(raw, vec![20250110, 20250111, 20250112]);
    }

    #[test]
    fn enumerate_nights_empty_and_reversed() {
        let day = DayKey::decode(20250110).unwrap();
        assert!(enumerate_nights(day, day).unwrap().is_empty());

        let earlier = DayKey::decode(20250103).unwrap();
        let later = DayKey::decode(20250105).unwrap();
        assert_eq!(
            enumerate_nights(later, earlier),
            Err(BookingError::InvalidInterval {
                check_in: 20250105,
                check_out: 20250103,
            })
        );
    }

    #[test]
    fn enumerate_nights_spans_leap_day() {
        let nights = enumerate_nights(
            DayKey::decode(20240228).unwrap(),
            DayKey::decode(20240301).unwrap(),
        )
        .unwrap();
        let raw: Vec<u32> = nights.iter().map(|k| k.raw()).collect();
        assert_eq!(raw, vec![20240228, 20240229]);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }
}
