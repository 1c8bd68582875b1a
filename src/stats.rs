//! Statistics aggregation over ledger reservation counts
//!
//! Folds the ledger's raw count queries into nested, deterministically
//! ordered tables for calendar and chart views. All operations are
//! read-only and idempotent modulo ledger state changes between calls:
//! identical arguments against unchanged state produce structurally
//! identical maps.

use crate::date::{days_in_month, DayKey};
use crate::error::{BookingError, Partial, Result};
use crate::gateway::LedgerGateway;
use futures::future;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Years back from the current year covered by windowed queries.
/// The window is inclusive on both ends, so the default spans 4 years.
pub const DEFAULT_YEARS_BACK: u16 = 3;

/// `month (1..=12) -> year -> count`
pub type MonthlyTotals = BTreeMap<u8, BTreeMap<i32, u64>>;

/// `day (1..=days_in_month) -> count`
pub type DailyTotals = BTreeMap<u8, u64>;

/// `hotel_id -> counts, one per window year ascending`
pub type PerHotelTotals = BTreeMap<u64, Vec<u64>>;

/// Aggregates reservation counts across months, days, years, and hotels.
pub struct StatisticsAggregator<G> {
    gateway: Arc<G>,
    years_back: u16,
}

impl<G: LedgerGateway> StatisticsAggregator<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway, years_back: DEFAULT_YEARS_BACK }
    }

    /// Override the year window depth
    pub fn with_window(gateway: Arc<G>, years_back: u16) -> Self {
        Self { gateway, years_back }
    }

    /// The ascending year window ending at `current_year`
    pub fn year_window(&self, current_year: i32) -> Vec<i32> {
        (current_year - self.years_back as i32..=current_year).collect()
    }

    /// Monthly reservation counts pivoted to `month -> year -> count` over
    /// the year window ending at `current_year`.
    ///
    /// One query per year. A year whose query fails (or returns fewer than
    /// 12 entries) is absent from every month's inner map and reported once
    /// in the failure list, not once per month.
    pub async fn monthly_totals(&self, current_year: i32) -> Partial<MonthlyTotals> {
        let years = self.year_window(current_year);

        let lookups = years
            .iter()
            .map(|&year| async move { self.gateway.monthly_reservations_for_year(year).await });

        let mut totals: MonthlyTotals = (1..=12).map(|m| (m, BTreeMap::new())).collect();
        let mut result = Partial::complete(BTreeMap::new());

        for (year, outcome) in years.iter().zip(future::join_all(lookups).await) {
            let counts = match outcome {
                Ok(counts) if counts.len() >= 12 => counts,
                Ok(counts) => {
                    let error = BookingError::IncompleteStatisticsData {
                        expected: 12,
                        actual: counts.len(),
                    };
                    tracing::warn!(year, %error, "monthly statistics query incomplete");
                    result.push_failure(format!("year {year}"), error);
                    continue;
                }
                Err(error) => {
                    tracing::warn!(year, %error, "monthly statistics query failed");
                    result.push_failure(format!("year {year}"), error);
                    continue;
                }
            };
            for (index, count) in counts.iter().take(12).enumerate() {
                if let Some(by_year) = totals.get_mut(&(index as u8 + 1)) {
                    by_year.insert(*year, *count);
                }
            }
        }

        result.value = totals;
        result
    }

    /// Daily reservation counts for one month, mapped positionally to days
    /// `1..=days_in_month` (leap years respected).
    ///
    /// A returned sequence shorter than the month requires is
    /// `IncompleteStatisticsData`, never padded with zeros.
    pub async fn daily_totals(&self, year: u16, month: u8) -> Result<DailyTotals> {
        if !(1..=12).contains(&month) {
            return Err(BookingError::InvalidDateFormat(
                year as u32 * 10_000 + month as u32 * 100 + 1,
            ));
        }
        let day_count = days_in_month(year, month) as usize;
        let year_month = year as u32 * 100 + month as u32;

        let counts = self
            .gateway
            .daily_reservations_for_month(year_month, day_count as u32)
            .await?;

        if counts.len() < day_count {
            return Err(BookingError::IncompleteStatisticsData {
                expected: day_count,
                actual: counts.len(),
            });
        }

        Ok(counts
            .iter()
            .take(day_count)
            .enumerate()
            .map(|(index, count)| (index as u8 + 1, *count))
            .collect())
    }

    /// Reservation counts per hotel for a fixed calendar date across the
    /// year window, one entry per window year ascending.
    ///
    /// One query per known hotel id. A hotel whose query fails, or whose
    /// result vector does not match the window length, is absent from the
    /// map and reported in the failure list. Reading the hotel count itself
    /// is fatal.
    pub async fn per_hotel_yearly_totals(&self, date: DayKey) -> Result<Partial<PerHotelTotals>> {
        let hotel_count = self.gateway.hotel_count().await?;
        let window_len = self.years_back as usize + 1;

        let lookups = (1..=hotel_count).map(|hotel_id| async move {
            self.gateway.hotel_reservations_for_date(hotel_id, date).await
        });

        let mut result = Partial::complete(BTreeMap::new());
        for (hotel_id, outcome) in (1..=hotel_count).zip(future::join_all(lookups).await) {
            match outcome {
                Ok(counts) if counts.len() == window_len => {
                    result.value.insert(hotel_id, counts);
                }
                Ok(counts) => {
                    let error = BookingError::IncompleteStatisticsData {
                        expected: window_len,
                        actual: counts.len(),
                    };
                    tracing::warn!(hotel_id, %error, "per-hotel statistics vector mismatched");
                    result.push_failure(format!("hotel {hotel_id}"), error);
                }
                Err(error) => {
                    tracing::warn!(hotel_id, %error, "per-hotel statistics query failed");
                    result.push_failure(format!("hotel {hotel_id}"), error);
                }
            }
        }
        Ok(result)
    }
}
