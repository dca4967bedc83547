use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_booking::models::{Booking, BookingStatus};
use wayfare_booking::repository::{BookingFilter, BookingRepository};
use wayfare_catalog::capacity;
use wayfare_core::{DomainError, DomainResult};

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Advisory-lock key for one (package, trip date) capacity pool. Distinct
/// pools hash to distinct keys with overwhelming probability, and a
/// collision only costs needless serialization, never correctness.
fn capacity_lock_key(package_id: Uuid, trip_date: NaiveDate) -> i64 {
    let mut hasher = DefaultHasher::new();
    package_id.hash(&mut hasher);
    trip_date.hash(&mut hasher);
    hasher.finish() as i64
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    package_id: Uuid,
    user_id: Uuid,
    trip_date: NaiveDate,
    number_of_people: i32,
    travelers: serde_json::Value,
    room_type: String,
    insurance: bool,
    total_price: Decimal,
    status: String,
    refund_amount: Decimal,
    cancellation_date: Option<DateTime<Utc>>,
    payment_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> DomainResult<Booking> {
        let status = self
            .status
            .parse()
            .map_err(|e: String| DomainError::Dependency(e.into()))?;
        let room_type = self
            .room_type
            .parse()
            .map_err(|e: String| DomainError::Dependency(e.into()))?;
        let travelers =
            serde_json::from_value(self.travelers).map_err(DomainError::dependency)?;
        Ok(Booking {
            id: self.id,
            package_id: self.package_id,
            user_id: self.user_id,
            trip_date: self.trip_date,
            number_of_people: self.number_of_people,
            travelers,
            room_type,
            insurance: self.insurance,
            total_price: self.total_price,
            status,
            refund_amount: self.refund_amount,
            cancellation_date: self.cancellation_date,
            payment_date: self.payment_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, package_id, user_id, trip_date, number_of_people, travelers, \
     room_type, insurance, total_price, status, refund_amount, cancellation_date, \
     payment_date, created_at, updated_at";

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn insert_booking(&self, booking: &Booking, max_people: i32) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(DomainError::dependency)?;

        // Serialize all capacity writes for this (package, date) pool, then
        // re-count inside the same transaction. Dropping the transaction on
        // a capacity failure releases the lock with nothing written.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(capacity_lock_key(booking.package_id, booking.trip_date))
            .execute(&mut *tx)
            .await
            .map_err(DomainError::dependency)?;

        let held: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(number_of_people), 0) FROM bookings \
             WHERE package_id = $1 AND trip_date = $2 AND status IN ('Pending', 'Confirmed')",
        )
        .bind(booking.package_id)
        .bind(booking.trip_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(DomainError::dependency)?;

        capacity::check_request(max_people, held, booking.number_of_people).map_err(
            |err| match err {
                capacity::CapacityError::Exceeded { remaining, .. } => {
                    DomainError::CapacityExceeded { remaining }
                }
            },
        )?;

        let travelers =
            serde_json::to_value(&booking.travelers).map_err(DomainError::dependency)?;
        sqlx::query(
            "INSERT INTO bookings (id, package_id, user_id, trip_date, number_of_people, \
             travelers, room_type, insurance, total_price, status, refund_amount, \
             cancellation_date, payment_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(booking.id)
        .bind(booking.package_id)
        .bind(booking.user_id)
        .bind(booking.trip_date)
        .bind(booking.number_of_people)
        .bind(travelers)
        .bind(booking.room_type.as_str())
        .bind(booking.insurance)
        .bind(booking.total_price)
        .bind(booking.status.as_str())
        .bind(booking.refund_amount)
        .bind(booking.cancellation_date)
        .bind(booking.payment_date)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(DomainError::dependency)?;

        tx.commit().await.map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DomainError::dependency)?;
        row.map(BookingRow::into_booking).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn list_all(&self, filter: &BookingFilter) -> DomainResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::UUID IS NULL OR package_id = $2) \
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.package_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn booked_seats(&self, package_id: Uuid, trip_date: NaiveDate) -> DomainResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(number_of_people), 0) FROM bookings \
             WHERE package_id = $1 AND trip_date = $2 AND status IN ('Pending', 'Confirmed')",
        )
        .bind(package_id)
        .bind(trip_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DomainError::dependency)
    }

    async fn apply_transition(
        &self,
        updated: &Booking,
        expected: &[BookingStatus],
    ) -> DomainResult<bool> {
        let expected: Vec<String> = expected.iter().map(|s| s.as_str().to_string()).collect();
        let result = sqlx::query(
            "UPDATE bookings SET status = $2, refund_amount = $3, cancellation_date = $4, \
             payment_date = $5, updated_at = $6 \
             WHERE id = $1 AND status = ANY($7)",
        )
        .bind(updated.id)
        .bind(updated.status.as_str())
        .bind(updated.refund_amount)
        .bind(updated.cancellation_date)
        .bind(updated.payment_date)
        .bind(updated.updated_at)
        .bind(&expected)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;

        Ok(result.rows_affected() == 1)
    }
}
