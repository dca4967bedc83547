use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wayfare_catalog::RoomType;

/// Booking status lifecycle: Pending → Confirmed → Completed/Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Pending and Confirmed bookings hold seats; Cancelled releases them
    /// and Completed trips are already behind us.
    pub fn holds_seats(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Confirmed" => Ok(BookingStatus::Confirmed),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            "Completed" => Ok(BookingStatus::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// One member of the travelling party. Names are optional: the party lead
/// may fill in companion details after booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Traveler {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub passport_number: Option<String>,
}

/// A customer's reservation against a package for one trip date.
///
/// `trip_date` is a calendar date by construction: the transport layer
/// truncates any time-of-day so that all bookings for the same day
/// aggregate together for capacity. `total_price` is frozen at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub package_id: Uuid,
    pub user_id: Uuid,
    pub trip_date: NaiveDate,
    pub number_of_people: i32,
    pub travelers: Vec<Traveler>,
    pub room_type: RoomType,
    pub insurance: bool,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub refund_amount: Decimal,
    pub cancellation_date: Option<DateTime<Utc>>,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        package_id: Uuid,
        user_id: Uuid,
        trip_date: NaiveDate,
        number_of_people: i32,
        travelers: Vec<Traveler>,
        room_type: RoomType,
        insurance: bool,
        total_price: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            package_id,
            user_id,
            trip_date,
            number_of_people,
            travelers,
            room_type,
            insurance,
            total_price,
            status: BookingStatus::Pending,
            refund_amount: Decimal::ZERO,
            cancellation_date: None,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Wallet ledger entry kinds, matching the customer-facing history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Payment,
    Refund,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Payment => "payment",
            TransactionKind::Refund => "refund",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "payment" => Ok(TransactionKind::Payment),
            "refund" => Ok(TransactionKind::Refund),
            other => Err(format!("unknown transaction kind: {other}")),
        }
    }
}

/// Append-only ledger row. Never mutated, never deleted.
///
/// `affects_balance` distinguishes wallet-funded flows from audit rows:
/// a Payment entry recorded for an externally-collected payment carries the
/// paid amount for the history view but contributes nothing to the balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub affects_balance: bool,
    pub description: String,
    pub booking_id: Option<Uuid>,
    pub date: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn refund(user_id: Uuid, amount: Decimal, booking_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind: TransactionKind::Refund,
            affects_balance: true,
            description: format!("Refund for booking #{}", booking_id.simple()),
            booking_id: Some(booking_id),
            date: Utc::now(),
        }
    }

    /// Audit record of a payment collected by the external gateway.
    /// The wallet balance is untouched.
    pub fn payment_audit(user_id: Uuid, amount: Decimal, booking_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind: TransactionKind::Payment,
            affects_balance: false,
            description: format!("Payment for booking #{}", booking_id.simple()),
            booking_id: Some(booking_id),
            date: Utc::now(),
        }
    }

    pub fn deposit(user_id: Uuid, amount: Decimal, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            kind: TransactionKind::Deposit,
            affects_balance: true,
            description,
            booking_id: None,
            date: Utc::now(),
        }
    }

    /// Contribution of this row to the wallet balance. Deposits and refunds
    /// add, wallet-funded payments subtract, audit-only rows contribute 0.
    pub fn signed_amount(&self) -> Decimal {
        if !self.affects_balance {
            return Decimal::ZERO;
        }
        match self.kind {
            TransactionKind::Deposit | TransactionKind::Refund => self.amount,
            TransactionKind::Payment => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_booking_starts_pending() {
        let booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            2,
            vec![Traveler::default(), Traveler::default()],
            RoomType::Double,
            false,
            dec!(800),
        );
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.refund_amount, Decimal::ZERO);
        assert!(booking.status.holds_seats());
    }

    #[test]
    fn cancelled_and_completed_release_seats() {
        assert!(!BookingStatus::Cancelled.holds_seats());
        assert!(!BookingStatus::Completed.holds_seats());
        assert!(BookingStatus::Confirmed.holds_seats());
    }

    #[test]
    fn payment_audit_rows_do_not_move_the_balance() {
        let entry = WalletTransaction::payment_audit(Uuid::new_v4(), dec!(1210), Uuid::new_v4());
        assert_eq!(entry.kind, TransactionKind::Payment);
        assert_eq!(entry.signed_amount(), Decimal::ZERO);
    }

    #[test]
    fn refund_rows_add_to_the_balance() {
        let entry = WalletTransaction::refund(Uuid::new_v4(), dec!(900), Uuid::new_v4());
        assert_eq!(entry.signed_amount(), dec!(900));
        assert!(entry.booking_id.is_some());
    }
}
