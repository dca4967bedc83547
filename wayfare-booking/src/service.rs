//! Orchestration of the booking lifecycle against the store and the
//! notification outbox.
//!
//! Every handler-facing operation lives here: capacity-checked creation,
//! payment confirmation, cancellation with refund, administrative status
//! override, wallet reads and package management. Handlers stay thin.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;
use wayfare_catalog::{PackageType, PricingEngine, RoomType, TravelPackage};
use wayfare_core::{authorize, Action, Actor, DomainError, DomainResult};

use crate::events::DomainEvent;
use crate::lifecycle::{self, TransitionError};
use crate::models::{Booking, BookingStatus, Traveler, WalletTransaction};
use crate::refund::RefundPolicy;
use crate::reporting::{self, SalesReport};
use crate::repository::{BookingFilter, BookingRepository, PackageRepository, WalletRepository};
use crate::wallet::{self, WalletStatement};

fn default_room_type() -> RoomType {
    RoomType::NotApplicable
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub package_id: Uuid,
    /// Any time-of-day is accepted and truncated to the calendar date, so
    /// bookings for the same day always aggregate for capacity.
    pub trip_date: DateTime<Utc>,
    pub number_of_people: i32,
    pub travelers: Vec<Traveler>,
    #[serde(default = "default_room_type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub insurance: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub destination: String,
    #[serde(default)]
    pub description: String,
    pub package_type: PackageType,
    pub price: Decimal,
    pub duration_days: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_max_people")]
    pub max_people: i32,
}

fn default_max_people() -> i32 {
    20
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub package_type: Option<PackageType>,
    pub price: Option<Decimal>,
    pub duration_days: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_people: Option<i32>,
    pub available: Option<bool>,
    pub is_featured: Option<bool>,
}

#[derive(Debug)]
pub struct CancellationOutcome {
    pub booking: Booking,
    pub refund_amount: Decimal,
}

pub struct BookingService {
    packages: Arc<dyn PackageRepository>,
    bookings: Arc<dyn BookingRepository>,
    wallet: Arc<dyn WalletRepository>,
    pricing: PricingEngine,
    refund_policy: RefundPolicy,
    events: mpsc::UnboundedSender<DomainEvent>,
}

impl BookingService {
    pub fn new(
        packages: Arc<dyn PackageRepository>,
        bookings: Arc<dyn BookingRepository>,
        wallet: Arc<dyn WalletRepository>,
        pricing: PricingEngine,
        refund_policy: RefundPolicy,
        events: mpsc::UnboundedSender<DomainEvent>,
    ) -> Self {
        Self {
            packages,
            bookings,
            wallet,
            pricing,
            refund_policy,
            events,
        }
    }

    /// Outbox send is best-effort: a closed channel is logged, never fatal.
    fn emit(&self, event: DomainEvent) {
        if self.events.send(event).is_err() {
            tracing::warn!("notification outbox closed, event dropped");
        }
    }

    // ------------------------------------------------------------------
    // Booking lifecycle
    // ------------------------------------------------------------------

    pub async fn create_booking(
        &self,
        actor: &Actor,
        req: CreateBookingRequest,
    ) -> DomainResult<Booking> {
        if req.number_of_people < 1 {
            return Err(DomainError::InvalidInput(
                "At least one traveler is required".to_string(),
            ));
        }
        if req.travelers.len() != req.number_of_people as usize {
            return Err(DomainError::InvalidInput(
                "Traveler details mismatch".to_string(),
            ));
        }

        let package = self
            .packages
            .get(req.package_id)
            .await?
            .ok_or(DomainError::NotFound("package"))?;
        if !package.available {
            return Err(DomainError::PackageUnavailable);
        }

        let trip_date = req.trip_date.date_naive();
        let quote = self.pricing.quote(
            package.price,
            req.number_of_people,
            req.room_type,
            req.insurance,
        );

        let booking = Booking::new(
            package.id,
            actor.id,
            trip_date,
            req.number_of_people,
            req.travelers,
            req.room_type,
            req.insurance,
            quote.total,
        );

        // Atomic conditional insert: the store re-counts seats and inserts
        // under per-(package, date) serialization.
        self.bookings.insert_booking(&booking, package.max_people).await?;

        tracing::info!(
            booking_id = %booking.id,
            package_id = %package.id,
            %trip_date,
            people = booking.number_of_people,
            total = %booking.total_price,
            "booking created"
        );

        self.emit(DomainEvent::BookingCreated {
            booking_id: booking.id,
            user_id: actor.id,
            user_email: Some(actor.email.clone()),
            package_name: package.name,
            total_price: booking.total_price,
        });

        Ok(booking)
    }

    pub async fn confirm_payment(&self, actor: &Actor, booking_id: Uuid) -> DomainResult<Booking> {
        let mut booking = self.load_booking(booking_id).await?;
        authorize(actor, Action::ConfirmPayment { owner: booking.user_id })?;

        let now = Utc::now();
        lifecycle::confirm(&mut booking, now).map_err(map_transition)?;

        let applied = self
            .bookings
            .apply_transition(&booking, &[BookingStatus::Pending])
            .await?;
        if !applied {
            // Lost the race; report from whatever state won.
            return Err(self.transition_conflict(booking_id, BookingStatus::Confirmed).await);
        }

        // Audit row for the externally-collected payment. The wallet
        // balance is untouched; a failure here leaves the booking
        // Confirmed with a missing audit row, which must be surfaced for
        // reconciliation rather than swallowed.
        let audit = WalletTransaction::payment_audit(booking.user_id, booking.total_price, booking.id);
        if let Err(err) = self.wallet.append_audit(&audit).await {
            tracing::error!(
                booking_id = %booking.id,
                user_id = %booking.user_id,
                "payment audit append failed after confirmation, manual reconciliation required: {err}"
            );
            return Err(err);
        }

        tracing::info!(booking_id = %booking.id, "payment confirmed");

        let email = (actor.id == booking.user_id).then(|| actor.email.clone());
        self.emit(DomainEvent::PaymentReceived {
            booking_id: booking.id,
            user_id: booking.user_id,
            user_email: email,
            amount: booking.total_price,
        });

        Ok(booking)
    }

    pub async fn cancel_booking(
        &self,
        actor: &Actor,
        booking_id: Uuid,
    ) -> DomainResult<CancellationOutcome> {
        let booking = self.load_booking(booking_id).await?;
        authorize(actor, Action::CancelBooking { owner: booking.user_id })?;
        self.cancel_inner(actor, booking).await
    }

    async fn cancel_inner(
        &self,
        actor: &Actor,
        mut booking: Booking,
    ) -> DomainResult<CancellationOutcome> {
        let now = Utc::now();
        let refund_amount = self
            .refund_policy
            .refund_amount(booking.total_price, booking.trip_date, now);

        lifecycle::cancel(&mut booking, refund_amount, now).map_err(map_transition)?;

        let applied = self
            .bookings
            .apply_transition(
                &booking,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
            )
            .await?;
        if !applied {
            return Err(self.transition_conflict(booking.id, BookingStatus::Cancelled).await);
        }

        if refund_amount > Decimal::ZERO {
            let entry = WalletTransaction::refund(booking.user_id, refund_amount, booking.id);
            match self.wallet.credit(&entry).await {
                Ok(new_balance) => {
                    tracing::info!(
                        booking_id = %booking.id,
                        user_id = %booking.user_id,
                        refund = %refund_amount,
                        balance = %new_balance,
                        "refund credited"
                    );
                }
                Err(err) => {
                    // The booking is already Cancelled; the credit and its
                    // ledger row failed together (they are one transaction).
                    tracing::error!(
                        booking_id = %booking.id,
                        user_id = %booking.user_id,
                        refund = %refund_amount,
                        "wallet credit failed after cancellation, manual reconciliation required: {err}"
                    );
                    return Err(err);
                }
            }
        }

        let email = (actor.id == booking.user_id).then(|| actor.email.clone());
        self.emit(DomainEvent::BookingCancelled {
            booking_id: booking.id,
            user_id: booking.user_id,
            user_email: email,
            refund_amount,
        });

        Ok(CancellationOutcome {
            booking,
            refund_amount,
        })
    }

    /// Staff-only status override. Confirmed and Cancelled targets go
    /// through the same guards (and refund logic) as the customer paths;
    /// Completed is the purely administrative transition.
    pub async fn override_status(
        &self,
        actor: &Actor,
        booking_id: Uuid,
        new_status: BookingStatus,
    ) -> DomainResult<Booking> {
        authorize(actor, Action::OverrideBookingStatus)?;
        let mut booking = self.load_booking(booking_id).await?;
        let now = Utc::now();

        match new_status {
            BookingStatus::Completed => {
                lifecycle::complete(&mut booking, now).map_err(map_transition)?;
                let applied = self
                    .bookings
                    .apply_transition(
                        &booking,
                        &[
                            BookingStatus::Pending,
                            BookingStatus::Confirmed,
                            BookingStatus::Cancelled,
                        ],
                    )
                    .await?;
                if !applied {
                    return Err(self.transition_conflict(booking_id, new_status).await);
                }
                Ok(booking)
            }
            BookingStatus::Confirmed => {
                lifecycle::confirm(&mut booking, now).map_err(map_transition)?;
                let applied = self
                    .bookings
                    .apply_transition(&booking, &[BookingStatus::Pending])
                    .await?;
                if !applied {
                    return Err(self.transition_conflict(booking_id, new_status).await);
                }
                Ok(booking)
            }
            BookingStatus::Cancelled => {
                let outcome = self.cancel_inner(actor, booking).await?;
                Ok(outcome.booking)
            }
            BookingStatus::Pending => Err(DomainError::InvalidStateTransition {
                from: booking.status.to_string(),
                to: BookingStatus::Pending.to_string(),
            }),
        }
    }

    pub async fn my_bookings(&self, actor: &Actor) -> DomainResult<Vec<Booking>> {
        self.bookings.list_for_user(actor.id).await
    }

    pub async fn all_bookings(
        &self,
        actor: &Actor,
        filter: BookingFilter,
    ) -> DomainResult<Vec<Booking>> {
        authorize(actor, Action::ViewAllBookings)?;
        self.bookings.list_all(&filter).await
    }

    // ------------------------------------------------------------------
    // Wallet
    // ------------------------------------------------------------------

    pub async fn wallet_statement(
        &self,
        actor: &Actor,
        user_id: Uuid,
    ) -> DomainResult<WalletStatement> {
        authorize(actor, Action::ViewWallet { owner: user_id })?;
        let balance = self.wallet.balance(user_id).await?;
        let transactions = self.wallet.history(user_id).await?;

        if !wallet::reconciles(balance, &transactions) {
            tracing::error!(
                %user_id,
                %balance,
                ledger_sum = %wallet::ledger_sum(&transactions),
                "wallet balance does not reconcile with ledger"
            );
        }

        Ok(WalletStatement {
            balance,
            transactions,
        })
    }

    // ------------------------------------------------------------------
    // Package management
    // ------------------------------------------------------------------

    pub async fn browse_packages(&self) -> DomainResult<Vec<TravelPackage>> {
        self.packages.list(true).await
    }

    pub async fn get_package(&self, id: Uuid) -> DomainResult<TravelPackage> {
        self.packages
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("package"))
    }

    pub async fn create_package(
        &self,
        actor: &Actor,
        req: CreatePackageRequest,
    ) -> DomainResult<TravelPackage> {
        authorize(actor, Action::ManagePackages)?;
        let package = TravelPackage::new(
            req.name,
            req.destination,
            req.description,
            req.package_type,
            req.price,
            req.duration_days,
            req.start_date,
            req.end_date,
            req.max_people,
            actor.id,
        )
        .map_err(|err| DomainError::InvalidInput(err.to_string()))?;
        self.packages.insert(&package).await?;
        Ok(package)
    }

    pub async fn update_package(
        &self,
        actor: &Actor,
        id: Uuid,
        req: UpdatePackageRequest,
    ) -> DomainResult<TravelPackage> {
        authorize(actor, Action::ManagePackages)?;
        let mut package = self.get_package(id).await?;

        if let Some(name) = req.name {
            package.name = name;
        }
        if let Some(destination) = req.destination {
            package.destination = destination;
        }
        if let Some(description) = req.description {
            package.description = description;
        }
        if let Some(package_type) = req.package_type {
            package.package_type = package_type;
        }
        if let Some(price) = req.price {
            package.price = price;
        }
        if let Some(duration_days) = req.duration_days {
            package.duration_days = duration_days;
        }
        if let Some(start_date) = req.start_date {
            package.start_date = start_date;
        }
        if let Some(end_date) = req.end_date {
            package.end_date = end_date;
        }
        if let Some(max_people) = req.max_people {
            package.max_people = max_people;
        }
        if let Some(available) = req.available {
            package.available = available;
        }
        if let Some(is_featured) = req.is_featured {
            package.is_featured = is_featured;
        }
        package.updated_at = Utc::now();

        package
            .validate()
            .map_err(|err| DomainError::InvalidInput(err.to_string()))?;
        self.packages.update(&package).await?;
        Ok(package)
    }

    /// Soft-deactivation; bookings keep referencing the package.
    pub async fn deactivate_package(&self, actor: &Actor, id: Uuid) -> DomainResult<TravelPackage> {
        authorize(actor, Action::ManagePackages)?;
        let mut package = self.get_package(id).await?;
        package.deactivate();
        self.packages.update(&package).await?;
        Ok(package)
    }

    pub async fn list_all_packages(&self, actor: &Actor) -> DomainResult<Vec<TravelPackage>> {
        authorize(actor, Action::ManagePackages)?;
        self.packages.list(false).await
    }

    // ------------------------------------------------------------------
    // Reporting
    // ------------------------------------------------------------------

    pub async fn sales_report(
        &self,
        actor: &Actor,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> DomainResult<SalesReport> {
        authorize(actor, Action::ViewSalesReport)?;
        let bookings = self.bookings.list_all(&BookingFilter::default()).await?;
        let packages = self.packages.list(false).await?;
        Ok(reporting::sales_report(
            &bookings,
            &packages,
            start_date,
            end_date,
        ))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    async fn load_booking(&self, id: Uuid) -> DomainResult<Booking> {
        self.bookings
            .get(id)
            .await?
            .ok_or(DomainError::NotFound("booking"))
    }

    /// A compare-and-swap lost its race: reload and report the state that
    /// actually won.
    async fn transition_conflict(&self, booking_id: Uuid, target: BookingStatus) -> DomainError {
        match self.bookings.get(booking_id).await {
            Ok(Some(current)) => {
                if target == BookingStatus::Confirmed
                    && current.status == BookingStatus::Confirmed
                {
                    DomainError::AlreadyConfirmed
                } else {
                    DomainError::InvalidStateTransition {
                        from: current.status.to_string(),
                        to: target.to_string(),
                    }
                }
            }
            Ok(None) => DomainError::NotFound("booking"),
            Err(err) => err,
        }
    }
}

fn map_transition(err: TransitionError) -> DomainError {
    match err {
        TransitionError::AlreadyConfirmed => DomainError::AlreadyConfirmed,
        TransitionError::Invalid { from, to } => DomainError::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        },
    }
}
