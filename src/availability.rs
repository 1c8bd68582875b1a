//! Availability resolution over per-night occupancy
//!
//! Turns the ledger's per-room occupancy answers into "which rooms (and
//! hotels) are free for this stay". A room qualifies only when every night
//! of the interval is free; one occupied night excludes it.
//!
//! Fan-outs tolerate per-item failures: a room or hotel whose query fails is
//! treated as unavailable and reported in the partial result, never silently
//! dropped and never fatal to the rest of the resolution.

use crate::date::DayKey;
use crate::error::{Partial, Result};
use crate::gateway::LedgerGateway;
use crate::reservation::StayInterval;
use crate::types::{Hotel, Room};
use futures::future;
use std::sync::Arc;

/// A hotel that has at least one free room for the requested stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableHotel {
    pub hotel: Hotel,
    /// How many of its rooms are free for the whole interval
    pub available_room_count: usize,
}

/// Resolves stay intervals against ledger occupancy.
pub struct AvailabilityResolver<G> {
    gateway: Arc<G>,
}

impl<G: LedgerGateway> AvailabilityResolver<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Rooms of `hotel_id` with zero occupied nights in `[check_in, check_out)`,
    /// in the ledger's room listing order.
    ///
    /// Fails up front with `InvalidInterval` for a degenerate interval and
    /// with `GatewayUnavailable` if the room list itself cannot be read.
    pub async fn available_rooms(
        &self,
        hotel_id: u64,
        check_in: DayKey,
        check_out: DayKey,
    ) -> Result<Partial<Vec<Room>>> {
        let stay = StayInterval::new(check_in, check_out)?;
        let nights = stay.night_keys();

        let numbers = self.gateway.room_numbers(hotel_id).await?;

        let lookups = numbers.iter().map(|&room_number| {
            let nights = &nights;
            async move {
                let room = self.gateway.room(hotel_id, room_number).await?;
                let free = self
                    .gateway
                    .is_room_available(hotel_id, room_number, nights)
                    .await?;
                Ok::<_, crate::error::BookingError>((room, free))
            }
        });

        let mut result = Partial::complete(Vec::new());
        for (room_number, outcome) in numbers.iter().zip(future::join_all(lookups).await) {
            match outcome {
                Ok((room, true)) => result.value.push(room),
                Ok((_, false)) => {}
                Err(error) => {
                    tracing::warn!(
                        hotel_id,
                        room_number,
                        %error,
                        "room availability query failed; treating room as unavailable"
                    );
                    result.push_failure(format!("hotel {hotel_id} room {room_number}"), error);
                }
            }
        }
        Ok(result)
    }

    /// Active hotels with at least one free room for the interval, in the
    /// ledger's hotel listing order.
    ///
    /// A hotel whose sub-resolution fails is reported in the partial result;
    /// the remaining hotels still resolve.
    pub async fn available_hotels(
        &self,
        check_in: DayKey,
        check_out: DayKey,
    ) -> Result<Partial<Vec<AvailableHotel>>> {
        // Validate once before fanning out
        StayInterval::new(check_in, check_out)?;

        let count = self.gateway.hotel_count().await?;

        let lookups = (1..=count).map(|hotel_id| async move {
            let hotel = self.gateway.hotel(hotel_id).await?;
            if !hotel.is_active {
                return Ok::<_, crate::error::BookingError>(None);
            }
            let rooms = self.available_rooms(hotel_id, check_in, check_out).await?;
            Ok(Some((hotel, rooms)))
        });

        let mut result = Partial::complete(Vec::new());
        for (hotel_id, outcome) in (1..=count).zip(future::join_all(lookups).await) {
            match outcome {
                Ok(Some((hotel, rooms))) => {
                    result.failures.extend(rooms.failures);
                    if !rooms.value.is_empty() {
                        result.value.push(AvailableHotel {
                            hotel,
                            available_room_count: rooms.value.len(),
                        });
                    }
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        hotel_id,
                        %error,
                        "hotel availability query failed; excluding hotel"
                    );
                    result.push_failure(format!("hotel {hotel_id}"), error);
                }
            }
        }
        Ok(result)
    }
}
