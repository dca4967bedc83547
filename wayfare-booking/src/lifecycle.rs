//! Pure transition guards for the booking state machine.
//!
//! These functions mutate an in-memory copy and report whether the
//! transition is legal; persistence is a separate compare-and-swap so a
//! concurrent confirm/cancel on the same booking cannot both win.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Booking, BookingStatus};

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Booking is already Confirmed")]
    AlreadyConfirmed,

    #[error("Invalid state transition from {from} to {to}")]
    Invalid {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Pending → Confirmed, on payment confirmation.
pub fn confirm(booking: &mut Booking, now: DateTime<Utc>) -> Result<(), TransitionError> {
    match booking.status {
        BookingStatus::Pending => {
            booking.status = BookingStatus::Confirmed;
            booking.payment_date = Some(now);
            booking.updated_at = now;
            Ok(())
        }
        // Idempotency signal, not a failure: the caller already got what
        // they asked for.
        BookingStatus::Confirmed => Err(TransitionError::AlreadyConfirmed),
        from => Err(TransitionError::Invalid {
            from,
            to: BookingStatus::Confirmed,
        }),
    }
}

/// Pending/Confirmed → Cancelled, recording the refund decided by policy.
pub fn cancel(
    booking: &mut Booking,
    refund_amount: Decimal,
    now: DateTime<Utc>,
) -> Result<(), TransitionError> {
    match booking.status {
        BookingStatus::Pending | BookingStatus::Confirmed => {
            booking.status = BookingStatus::Cancelled;
            booking.refund_amount = refund_amount;
            booking.cancellation_date = Some(now);
            booking.updated_at = now;
            Ok(())
        }
        from => Err(TransitionError::Invalid {
            from,
            to: BookingStatus::Cancelled,
        }),
    }
}

/// any → Completed. Administrative transition with no refund logic; a
/// Confirmed trip that has departed never frees capacity for its date.
pub fn complete(booking: &mut Booking, now: DateTime<Utc>) -> Result<(), TransitionError> {
    if booking.status == BookingStatus::Completed {
        return Err(TransitionError::Invalid {
            from: BookingStatus::Completed,
            to: BookingStatus::Completed,
        });
    }
    booking.status = BookingStatus::Completed;
    booking.updated_at = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Traveler;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use uuid::Uuid;
    use wayfare_catalog::RoomType;

    fn booking() -> Booking {
        Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            1,
            vec![Traveler::default()],
            RoomType::Single,
            false,
            dec!(500),
        )
    }

    #[test]
    fn pending_confirms_and_stamps_payment_date() {
        let mut b = booking();
        let now = Utc::now();
        confirm(&mut b, now).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_date, Some(now));
    }

    #[test]
    fn reconfirming_signals_already_confirmed() {
        let mut b = booking();
        confirm(&mut b, Utc::now()).unwrap();
        assert!(matches!(
            confirm(&mut b, Utc::now()),
            Err(TransitionError::AlreadyConfirmed)
        ));
    }

    #[test]
    fn confirmed_booking_can_cancel_with_refund() {
        let mut b = booking();
        confirm(&mut b, Utc::now()).unwrap();
        cancel(&mut b, dec!(450), Utc::now()).unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.refund_amount, dec!(450));
        assert!(b.cancellation_date.is_some());
    }

    #[test]
    fn terminal_states_reject_cancel() {
        let mut b = booking();
        cancel(&mut b, Decimal::ZERO, Utc::now()).unwrap();
        assert!(matches!(
            cancel(&mut b, Decimal::ZERO, Utc::now()),
            Err(TransitionError::Invalid { .. })
        ));

        let mut b = booking();
        complete(&mut b, Utc::now()).unwrap();
        assert!(matches!(
            cancel(&mut b, Decimal::ZERO, Utc::now()),
            Err(TransitionError::Invalid { .. })
        ));
    }

    #[test]
    fn completion_is_allowed_from_any_live_state() {
        let mut b = booking();
        complete(&mut b, Utc::now()).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);

        let mut b = booking();
        confirm(&mut b, Utc::now()).unwrap();
        complete(&mut b, Utc::now()).unwrap();
        assert_eq!(b.status, BookingStatus::Completed);
    }

    #[test]
    fn cancelled_bookings_cannot_confirm() {
        let mut b = booking();
        cancel(&mut b, Decimal::ZERO, Utc::now()).unwrap();
        assert!(matches!(
            confirm(&mut b, Utc::now()),
            Err(TransitionError::Invalid { .. })
        ));
    }
}
