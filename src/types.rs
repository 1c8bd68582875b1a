//! Read snapshots of ledger-owned entities
//!
//! The ledger owns and makes durable everything here; the client holds only
//! transient, re-fetchable projections.

use crate::date::DayKey;
use serde::{Deserialize, Serialize};

/// A hotel listing. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: u64,
    pub name: String,
    /// Account identifier of the managing party
    pub manager: String,
    /// Opaque content reference (hash/URI) for off-ledger detail
    pub content_ref: String,
    pub is_active: bool,
}

/// Operational state of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Reserved,
    NeedsCleaning,
    Maintenance,
}

/// A room within a hotel. Identity is `(hotel_id, room_number)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub hotel_id: u64,
    /// Unique within the hotel
    pub room_number: u64,
    /// Nightly price in the smallest currency unit
    pub price: u64,
    pub content_ref: String,
    pub status: RoomStatus,
}

/// Lifecycle state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    Active,
    Cancelled,
}

/// A reservation as recorded by the ledger.
///
/// Created only via a validated submission; cancellable once while active.
/// The rating window (after stay completion) is ledger policy, not re-derived
/// client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: u64,
    pub hotel_id: u64,
    pub room_number: u64,
    pub check_in: DayKey,
    pub check_out: DayKey,
    /// Number of occupied nights
    pub night_count: u32,
    /// Account identifier of the guest
    pub guest: String,
    /// Total amount in the smallest currency unit
    pub amount: u64,
    pub status: ReservationStatus,
    /// 1-5, set after stay completion
    pub rating: Option<u8>,
}

/// Price quote for a prospective stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayQuote {
    pub hotel_id: u64,
    pub room_number: u64,
    pub check_in: DayKey,
    pub check_out: DayKey,
    pub nights: u32,
    /// Nightly price x nights, smallest currency unit
    pub total_price: u64,
}
