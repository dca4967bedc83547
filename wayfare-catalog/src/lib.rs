pub mod capacity;
pub mod package;
pub mod pricing;

pub use capacity::{remaining_capacity, CapacityError};
pub use package::{PackageType, TravelPackage};
pub use pricing::{PriceQuote, PricingConfig, PricingEngine, RoomType};
