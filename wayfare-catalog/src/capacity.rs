//! Seat accounting for a package on a single trip date.
//!
//! Booked seats are the sum of `number_of_people` across every Pending or
//! Confirmed booking for the exact (package, trip date) pair. Cancelled
//! bookings release their seats; Completed bookings are excluded as well
//! since a finished trip's capacity is moot.
//!
//! The check-then-insert race lives at the store layer: implementations run
//! this arithmetic and the insert inside one serialized step (advisory
//! transaction lock or single write lock), keyed by (package, trip date).

#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("Insufficient capacity: requested {requested}, remaining {remaining}")]
    Exceeded { requested: i32, remaining: i32 },
}

/// Seats still open given a package's configured maximum and the seats
/// already held by live bookings. Never negative.
pub fn remaining_capacity(max_people: i32, booked_seats: i64) -> i32 {
    let remaining = i64::from(max_people) - booked_seats;
    remaining.clamp(0, i64::from(max_people)) as i32
}

/// A request for `requested` seats is admissible iff it fits in the
/// remaining capacity.
pub fn check_request(
    max_people: i32,
    booked_seats: i64,
    requested: i32,
) -> Result<(), CapacityError> {
    let remaining = remaining_capacity(max_people, booked_seats);
    if requested > remaining {
        return Err(CapacityError::Exceeded {
            requested,
            remaining,
        });
    }
    Ok(())
}
