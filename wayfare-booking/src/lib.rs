pub mod events;
pub mod lifecycle;
pub mod memory;
pub mod models;
pub mod refund;
pub mod reporting;
pub mod repository;
pub mod service;
pub mod wallet;

pub use models::{Booking, BookingStatus, TransactionKind, Traveler, WalletTransaction};
pub use refund::RefundPolicy;
pub use service::{BookingService, CancellationOutcome, CreateBookingRequest};
