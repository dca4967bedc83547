use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle events emitted after the store commit. Consumed by the
/// notification dispatch worker; delivery is best-effort and never feeds
/// back into booking or wallet state.
#[derive(Debug, Clone, Serialize)]
pub enum DomainEvent {
    BookingCreated {
        booking_id: Uuid,
        user_id: Uuid,
        /// Present when the acting user is the booking owner; staff-driven
        /// events have no address to mail.
        user_email: Option<String>,
        package_name: String,
        total_price: Decimal,
    },
    PaymentReceived {
        booking_id: Uuid,
        user_id: Uuid,
        user_email: Option<String>,
        amount: Decimal,
    },
    BookingCancelled {
        booking_id: Uuid,
        user_id: Uuid,
        user_email: Option<String>,
        refund_amount: Decimal,
    },
}
