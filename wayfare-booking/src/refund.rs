use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Tiered cancellation refund policy, keyed by time left before departure.
///
/// Days-until-trip is fractional, not floored: cancelling 29.9 days out
/// lands in the 50% tier even though it "rounds" to 30.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPolicy {
    pub early_cancel_days: f64,
    pub early_cancel_fraction: Decimal,
    pub late_cancel_days: f64,
    pub late_cancel_fraction: Decimal,
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self {
            early_cancel_days: 30.0,
            early_cancel_fraction: Decimal::new(90, 2),
            late_cancel_days: 7.0,
            late_cancel_fraction: Decimal::new(50, 2),
        }
    }
}

impl RefundPolicy {
    /// Fraction of the total price returned on cancellation at `now`.
    /// Pure and deterministic; a trip date already in the past yields 0
    /// (cancellation stays permitted, the refund is just nothing).
    pub fn fraction(&self, trip_date: NaiveDate, now: DateTime<Utc>) -> Decimal {
        let departure = trip_date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();
        let days_until_trip = (departure - now).num_seconds() as f64 / 86_400.0;

        if days_until_trip >= self.early_cancel_days {
            self.early_cancel_fraction
        } else if days_until_trip >= self.late_cancel_days {
            self.late_cancel_fraction
        } else {
            Decimal::ZERO
        }
    }

    /// Refund owed for a booking, rounded to currency precision only here
    /// at the edge, never during intermediate arithmetic.
    pub fn refund_amount(
        &self,
        total_price: Decimal,
        trip_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Decimal {
        (total_price * self.fraction(trip_date, now))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn days_before(trip_date: NaiveDate, days: f64) -> DateTime<Utc> {
        let departure = trip_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        departure - Duration::seconds((days * 86_400.0) as i64)
    }

    fn trip() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn thirty_days_out_earns_the_top_tier() {
        let policy = RefundPolicy::default();
        assert_eq!(policy.fraction(trip(), days_before(trip(), 30.0)), dec!(0.90));
        assert_eq!(policy.fraction(trip(), days_before(trip(), 45.0)), dec!(0.90));
    }

    #[test]
    fn just_under_thirty_days_drops_to_half() {
        let policy = RefundPolicy::default();
        assert_eq!(
            policy.fraction(trip(), days_before(trip(), 29.999)),
            dec!(0.50)
        );
        assert_eq!(policy.fraction(trip(), days_before(trip(), 7.0)), dec!(0.50));
    }

    #[test]
    fn under_a_week_refunds_nothing() {
        let policy = RefundPolicy::default();
        assert_eq!(
            policy.fraction(trip(), days_before(trip(), 6.999)),
            Decimal::ZERO
        );
        assert_eq!(policy.fraction(trip(), days_before(trip(), 0.5)), Decimal::ZERO);
    }

    #[test]
    fn past_trip_dates_refund_nothing() {
        let policy = RefundPolicy::default();
        let after_departure = days_before(trip(), -3.0);
        assert_eq!(policy.fraction(trip(), after_departure), Decimal::ZERO);
    }

    #[test]
    fn amount_rounds_only_at_the_edge() {
        let policy = RefundPolicy::default();
        let now = days_before(trip(), 35.0);
        assert_eq!(policy.refund_amount(dec!(1000), trip(), now), dec!(900.00));
        // 0.90 * 1234.55 = 1111.095 rounds away from zero at the edge.
        assert_eq!(
            policy.refund_amount(dec!(1234.55), trip(), now),
            dec!(1111.10)
        );
    }
}
