//! Booking client
//!
//! Ties the components together for an application shell: listing reads go
//! through the [`FetchCoordinator`] so repeated and concurrent listings
//! collapse, and every mutating call is validated locally before it reaches
//! the ledger.
//!
//! A gateway failure during a send is surfaced unmodified and never retried;
//! the caller re-queries reservation state rather than assuming the mutation
//! did or did not take effect.

use crate::availability::AvailabilityResolver;
use crate::date::DayKey;
use crate::error::{BookingError, Result};
use crate::fetch::{FetchConfig, FetchCoordinator};
use crate::gateway::LedgerGateway;
use crate::reservation::{compute_stay_length, is_valid_stay, StayInterval};
use crate::session::Session;
use crate::stats::StatisticsAggregator;
use crate::types::{Hotel, Reservation, Room, StayQuote};
use std::sync::Arc;

const HOTELS_KEY: &str = "hotels";

/// High-level booking operations over a connected ledger session.
pub struct BookingClient<G> {
    gateway: Arc<G>,
    session: Session,
    coordinator: FetchCoordinator,
    availability: AvailabilityResolver<G>,
    statistics: StatisticsAggregator<G>,
}

impl<G: LedgerGateway + 'static> BookingClient<G> {
    pub fn new(gateway: Arc<G>, session: Session) -> Self {
        Self::with_fetch_config(gateway, session, FetchConfig::default())
    }

    pub fn with_fetch_config(gateway: Arc<G>, session: Session, config: FetchConfig) -> Self {
        Self {
            availability: AvailabilityResolver::new(Arc::clone(&gateway)),
            statistics: StatisticsAggregator::new(Arc::clone(&gateway)),
            coordinator: FetchCoordinator::new(config),
            gateway,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Availability fan-out queries
    pub fn availability(&self) -> &AvailabilityResolver<G> {
        &self.availability
    }

    /// Statistics fan-out queries
    pub fn statistics(&self) -> &StatisticsAggregator<G> {
        &self.statistics
    }

    /// Read throttling and invalidation bookkeeping
    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    /// All listed hotels, in ledger order. Concurrent callers share one
    /// underlying listing.
    pub async fn hotels(&self) -> Result<Vec<Hotel>> {
        let gateway = Arc::clone(&self.gateway);
        self.coordinator
            .coalesce(HOTELS_KEY, move || async move {
                let count = gateway.hotel_count().await?;
                let mut hotels = Vec::with_capacity(count as usize);
                for id in 1..=count {
                    hotels.push(gateway.hotel(id).await?);
                }
                Ok(hotels)
            })
            .await
    }

    /// Hotels managed by this session's account
    pub fn user_hotels<'a>(&self, hotels: &'a [Hotel]) -> Vec<&'a Hotel> {
        hotels.iter().filter(|h| self.session.manages(h)).collect()
    }

    /// Rooms of a hotel, in ledger listing order
    pub async fn rooms(&self, hotel_id: u64) -> Result<Vec<Room>> {
        let numbers = self.gateway.room_numbers(hotel_id).await?;
        let mut rooms = Vec::with_capacity(numbers.len());
        for room_number in numbers {
            rooms.push(self.gateway.room(hotel_id, room_number).await?);
        }
        Ok(rooms)
    }

    /// List a new hotel; invalidates the cached hotel listing
    pub async fn add_hotel(&self, name: &str, content_ref: &str) -> Result<u64> {
        let id = self.gateway.add_hotel(&self.session, name, content_ref).await?;
        self.coordinator.mark_stale(HOTELS_KEY).await;
        Ok(id)
    }

    /// Add a room to a managed hotel
    pub async fn add_room(
        &self,
        hotel_id: u64,
        room_number: u64,
        price: u64,
        content_ref: &str,
    ) -> Result<()> {
        self.gateway
            .add_room(&self.session, hotel_id, room_number, price, content_ref)
            .await
    }

    /// Price a prospective stay: nightly price times nights, once the
    /// interval is confirmed valid.
    pub async fn quote(
        &self,
        hotel_id: u64,
        room_number: u64,
        check_in: DayKey,
        check_out: DayKey,
    ) -> Result<StayQuote> {
        let stay = StayInterval::new(check_in, check_out)?;
        let room = self.gateway.room(hotel_id, room_number).await?;
        let nights = compute_stay_length(check_in, check_out).nights;
        Ok(StayQuote {
            hotel_id,
            room_number,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            nights,
            total_price: room.price * nights as u64,
        })
    }

    /// Submit a reservation for the session account.
    ///
    /// Validates the stay against `today` before anything is sent; an
    /// invalid pair never reaches the ledger. The amount transferred is the
    /// quoted total. Returns the new reservation id.
    pub async fn reserve(
        &self,
        hotel_id: u64,
        room_number: u64,
        check_in: DayKey,
        check_out: DayKey,
        content_ref: &str,
    ) -> Result<u64> {
        self.reserve_as_of(hotel_id, room_number, check_in, check_out, content_ref, DayKey::today())
            .await
    }

    /// `reserve` with an explicit validation date
    pub async fn reserve_as_of(
        &self,
        hotel_id: u64,
        room_number: u64,
        check_in: DayKey,
        check_out: DayKey,
        content_ref: &str,
        today: DayKey,
    ) -> Result<u64> {
        if !is_valid_stay(check_in.raw(), check_out.raw(), today.raw()) {
            return Err(BookingError::InvalidInterval {
                check_in: check_in.raw(),
                check_out: check_out.raw(),
            });
        }
        let quote = self.quote(hotel_id, room_number, check_in, check_out).await?;
        self.gateway
            .create_reservation(
                &self.session,
                hotel_id,
                room_number,
                check_in,
                check_out,
                quote.nights,
                content_ref,
                quote.total_price,
            )
            .await
    }

    /// Cancel an active reservation
    pub async fn cancel(&self, reservation_id: u64) -> Result<()> {
        self.gateway.cancel_reservation(&self.session, reservation_id).await
    }

    /// Rate a completed stay. The 1-5 range is checked locally; the stay
    /// completion window is ledger policy.
    pub async fn rate(&self, reservation_id: u64, rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(BookingError::InvalidRating(rating));
        }
        self.gateway.rate_reservation(&self.session, reservation_id, rating).await
    }

    /// All reservations belonging to the session account
    pub async fn user_reservations(&self) -> Result<Vec<Reservation>> {
        let ids = self.gateway.user_reservation_ids(&self.session).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.gateway.reservations_by_ids(&ids).await
    }

    /// Single reservation lookup, e.g. to re-query state after a failed send
    pub async fn reservation(&self, reservation_id: u64) -> Result<Reservation> {
        self.gateway.reservation(reservation_id).await
    }
}
