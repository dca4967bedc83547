//! Data-access seams for the engine.
//!
//! The store is abstract: the engine only relies on the consistency
//! contract spelled out per method. Two implementations exist — the
//! Postgres store in `wayfare-store` and [`crate::memory::MemoryStore`]
//! for tests and local development.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use wayfare_catalog::TravelPackage;
use wayfare_core::DomainResult;

use crate::models::{Booking, BookingStatus, WalletTransaction};

#[async_trait]
pub trait PackageRepository: Send + Sync {
    async fn insert(&self, package: &TravelPackage) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<TravelPackage>>;

    async fn update(&self, package: &TravelPackage) -> DomainResult<()>;

    /// Catalog listing; `only_available` filters out deactivated packages.
    async fn list(&self, only_available: bool) -> DomainResult<Vec<TravelPackage>>;
}

/// Admin listing filter.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub package_id: Option<Uuid>,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Capacity-checked insert. Implementations MUST serialize the
    /// seat re-count and the insert per (package, trip_date) — advisory
    /// transaction lock, unique counter row, or a single write lock —
    /// and reject with `CapacityExceeded { remaining }` when the request
    /// no longer fits. This is what closes the check-then-act race.
    async fn insert_booking(&self, booking: &Booking, max_people: i32) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<Booking>>;

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>>;

    async fn list_all(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>>;

    /// Seats held by Pending/Confirmed bookings for (package, trip_date).
    async fn booked_seats(&self, package_id: Uuid, trip_date: NaiveDate) -> DomainResult<i64>;

    /// Compare-and-swap persistence of a transition: writes `updated`
    /// iff the stored status is still one of `expected`. Returns false on
    /// a lost race so the caller can reload and report the actual state.
    async fn apply_transition(
        &self,
        updated: &Booking,
        expected: &[BookingStatus],
    ) -> DomainResult<bool>;
}

#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Credit `entry.amount` to `entry.user_id` and append the ledger row
    /// in one store transaction — the balance mutation and the row are
    /// never separated by a partial failure. Returns the new balance.
    async fn credit(&self, entry: &WalletTransaction) -> DomainResult<Decimal>;

    /// Append a row that does not move the balance (`affects_balance`
    /// is false), e.g. the payment audit record.
    async fn append_audit(&self, entry: &WalletTransaction) -> DomainResult<()>;

    async fn balance(&self, user_id: Uuid) -> DomainResult<Decimal>;

    /// Full history, newest first.
    async fn history(&self, user_id: Uuid) -> DomainResult<Vec<WalletTransaction>>;
}
