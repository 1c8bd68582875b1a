//! The ledger method surface
//!
//! The smart contract is the authoritative state machine for hotels, rooms,
//! reservations, and per-day occupancy. This crate consumes it through the
//! narrow trait below and never implements it for production: a concrete
//! gateway (RPC transport, ABI binding) lives with the application shell.
//!
//! Read-only methods are plain calls; mutating methods are identity-attributed
//! sends and take an explicit [`Session`].

use crate::date::DayKey;
use crate::error::Result;
use crate::session::Session;
use crate::types::{Hotel, Reservation, Room};
use async_trait::async_trait;

/// Method-call contract against the reservation ledger.
///
/// Transport failures surface as `BookingError::GatewayUnavailable`. The
/// ledger may reject a send the client considered valid (room taken, rating
/// window closed); that too arrives as a gateway error, and the caller
/// re-queries state rather than assuming the mutation's fate.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Number of hotels ever listed; ids are `1..=hotel_count`
    async fn hotel_count(&self) -> Result<u64>;

    /// Hotel snapshot by id
    async fn hotel(&self, hotel_id: u64) -> Result<Hotel>;

    /// List a new hotel managed by the session account; returns its id
    async fn add_hotel(&self, session: &Session, name: &str, content_ref: &str) -> Result<u64>;

    /// Room numbers of a hotel, in the ledger's listing order
    async fn room_numbers(&self, hotel_id: u64) -> Result<Vec<u64>>;

    /// Room snapshot by `(hotel_id, room_number)`
    async fn room(&self, hotel_id: u64, room_number: u64) -> Result<Room>;

    /// Add a room to a hotel the session account manages
    async fn add_room(
        &self,
        session: &Session,
        hotel_id: u64,
        room_number: u64,
        price: u64,
        content_ref: &str,
    ) -> Result<()>;

    /// Whether the room is free for every night in the list
    async fn is_room_available(
        &self,
        hotel_id: u64,
        room_number: u64,
        nights: &[DayKey],
    ) -> Result<bool>;

    /// Create a reservation, transferring `amount`; returns the reservation id
    #[allow(clippy::too_many_arguments)]
    async fn create_reservation(
        &self,
        session: &Session,
        hotel_id: u64,
        room_number: u64,
        check_in: DayKey,
        check_out: DayKey,
        night_count: u32,
        content_ref: &str,
        amount: u64,
    ) -> Result<u64>;

    /// Cancel an active reservation owned by the session account
    async fn cancel_reservation(&self, session: &Session, reservation_id: u64) -> Result<()>;

    /// Rate a completed stay, 1-5
    async fn rate_reservation(&self, session: &Session, reservation_id: u64, rating: u8)
        -> Result<()>;

    /// Reservation ids belonging to the session account
    async fn user_reservation_ids(&self, session: &Session) -> Result<Vec<u64>>;

    /// Batch reservation lookup
    async fn reservations_by_ids(&self, ids: &[u64]) -> Result<Vec<Reservation>>;

    /// Single reservation lookup
    async fn reservation(&self, reservation_id: u64) -> Result<Reservation>;

    /// Twelve monthly reservation counts for a year, January first
    async fn monthly_reservations_for_year(&self, year: i32) -> Result<Vec<u64>>;

    /// Daily reservation counts for `year * 100 + month`, one per day
    async fn daily_reservations_for_month(&self, year_month: u32, day_count: u32)
        -> Result<Vec<u64>>;

    /// Reservation counts for one hotel on a fixed month/day across the
    /// statistics year window, ascending year order
    async fn hotel_reservations_for_date(&self, hotel_id: u64, date: DayKey) -> Result<Vec<u64>>;
}
