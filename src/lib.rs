//! Innkeeper SDK - Hotel Booking Client Toolkit
//!
//! Client-side booking-domain logic for applications backed by an on-chain
//! reservation ledger. The ledger (a smart contract) is the authoritative
//! state machine for hotels, rooms, reservations, and per-day occupancy;
//! this crate turns its raw answers into calendar-correct availability
//! results and statistical aggregates, and validates reservation submissions
//! before any mutating call is issued.
//!
//! # Architecture
//!
//! - [`date`] - `YYYYMMDD` day-key codec and night arithmetic
//! - [`reservation`] - stay intervals and pre-submission validation
//! - [`availability`] - per-night occupancy fan-out over rooms and hotels
//! - [`stats`] - monthly/daily/per-hotel reservation count aggregation
//! - [`fetch`] - refetch throttling and single-flight query coalescing
//! - [`gateway`] - the ledger method surface, consumed as a trait
//! - [`client`] - session-scoped orchestration over all of the above
//!
//! # Example
//!
//! ```rust,ignore
//! use innkeeper_sdk::{BookingClient, DayKey, Session};
//!
//! let session = Session::connect(wallet_account);
//! let client = BookingClient::new(gateway, session);
//!
//! let check_in = DayKey::decode(20250110)?;
//! let check_out = DayKey::decode(20250113)?;
//!
//! let open = client.availability().available_hotels(check_in, check_out).await?;
//! if open.is_partial() {
//!     // some hotels could not be resolved; the rest are usable
//! }
//!
//! let id = client.reserve(1, 101, check_in, check_out, "ipfs://...").await?;
//! ```

// Calendar date codec
pub mod date;

// Stay validation rules
pub mod reservation;

// Ledger entity snapshots
pub mod types;

// Caller identity for sends
pub mod session;

// Ledger method surface
pub mod gateway;

// Availability resolution
pub mod availability;

// Statistics aggregation
pub mod stats;

// Fetch throttling and coalescing
pub mod fetch;

// Session-scoped orchestration
pub mod client;

// Error types
pub mod error;

// Re-export core date types
pub use date::{days_in_month, enumerate_nights, is_leap_year, nights_between, DayKey};

// Re-export validation types
pub use reservation::{compute_stay_length, is_valid_stay, StayInterval, StayLength};

// Re-export entity snapshots
pub use types::{Hotel, Reservation, ReservationStatus, Room, RoomStatus, StayQuote};

// Re-export resolution and aggregation surfaces
pub use availability::{AvailabilityResolver, AvailableHotel};
pub use stats::{DailyTotals, MonthlyTotals, PerHotelTotals, StatisticsAggregator};

// Re-export coordination types
pub use fetch::{should_fetch, FetchConfig, FetchCoordinator};

// Re-export gateway and client
pub use client::BookingClient;
pub use gateway::LedgerGateway;
pub use session::Session;

// Re-export error types
pub use error::{BookingError, FailedQuery, Partial, Result};
