//! In-memory store (tests and local development).
//!
//! A single `RwLock` over the whole state gives the serialization the
//! repository contracts ask for: the capacity re-count + insert, the
//! status compare-and-swap, and the balance + ledger pair each run inside
//! one write-lock critical section.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;
use wayfare_catalog::{capacity, TravelPackage};
use wayfare_core::{DomainError, DomainResult};

use crate::models::{Booking, BookingStatus, WalletTransaction};
use crate::repository::{BookingFilter, BookingRepository, PackageRepository, WalletRepository};

#[derive(Default)]
struct Inner {
    packages: HashMap<Uuid, TravelPackage>,
    bookings: HashMap<Uuid, Booking>,
    balances: HashMap<Uuid, Decimal>,
    ledger: Vec<WalletTransaction>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("store lock poisoned")
    }
}

fn seats_held(inner: &Inner, package_id: Uuid, trip_date: NaiveDate) -> i64 {
    inner
        .bookings
        .values()
        .filter(|b| {
            b.package_id == package_id && b.trip_date == trip_date && b.status.holds_seats()
        })
        .map(|b| i64::from(b.number_of_people))
        .sum()
}

#[async_trait]
impl PackageRepository for MemoryStore {
    async fn insert(&self, package: &TravelPackage) -> DomainResult<()> {
        self.write().packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<TravelPackage>> {
        Ok(self.read().packages.get(&id).cloned())
    }

    async fn update(&self, package: &TravelPackage) -> DomainResult<()> {
        let mut inner = self.write();
        if !inner.packages.contains_key(&package.id) {
            return Err(DomainError::NotFound("package"));
        }
        inner.packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn list(&self, only_available: bool) -> DomainResult<Vec<TravelPackage>> {
        let mut packages: Vec<TravelPackage> = self
            .read()
            .packages
            .values()
            .filter(|p| !only_available || p.available)
            .cloned()
            .collect();
        packages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(packages)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert_booking(&self, booking: &Booking, max_people: i32) -> DomainResult<()> {
        let mut inner = self.write();
        let held = seats_held(&inner, booking.package_id, booking.trip_date);
        capacity::check_request(max_people, held, booking.number_of_people).map_err(
            |err| match err {
                capacity::CapacityError::Exceeded { remaining, .. } => {
                    DomainError::CapacityExceeded { remaining }
                }
            },
        )?;
        inner.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        Ok(self.read().bookings.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .read()
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn list_all(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .read()
            .bookings
            .values()
            .filter(|b| filter.status.map_or(true, |s| b.status == s))
            .filter(|b| filter.package_id.map_or(true, |p| b.package_id == p))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn booked_seats(&self, package_id: Uuid, trip_date: NaiveDate) -> DomainResult<i64> {
        Ok(seats_held(&self.read(), package_id, trip_date))
    }

    async fn apply_transition(
        &self,
        updated: &Booking,
        expected: &[BookingStatus],
    ) -> DomainResult<bool> {
        let mut inner = self.write();
        let current = inner
            .bookings
            .get(&updated.id)
            .ok_or(DomainError::NotFound("booking"))?;
        if !expected.contains(&current.status) {
            return Ok(false);
        }
        inner.bookings.insert(updated.id, updated.clone());
        Ok(true)
    }
}

#[async_trait]
impl WalletRepository for MemoryStore {
    async fn credit(&self, entry: &WalletTransaction) -> DomainResult<Decimal> {
        let mut inner = self.write();
        let balance = inner.balances.entry(entry.user_id).or_insert(Decimal::ZERO);
        *balance += entry.amount;
        let new_balance = *balance;
        inner.ledger.push(entry.clone());
        Ok(new_balance)
    }

    async fn append_audit(&self, entry: &WalletTransaction) -> DomainResult<()> {
        self.write().ledger.push(entry.clone());
        Ok(())
    }

    async fn balance(&self, user_id: Uuid) -> DomainResult<Decimal> {
        Ok(self
            .read()
            .balances
            .get(&user_id)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn history(&self, user_id: Uuid) -> DomainResult<Vec<WalletTransaction>> {
        let mut transactions: Vec<WalletTransaction> = self
            .read()
            .ledger
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }
}
