use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Adventure,
    Luxury,
    Relaxation,
    Cultural,
    Honeymoon,
    Friend,
    Family,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Adventure => "adventure",
            PackageType::Luxury => "luxury",
            PackageType::Relaxation => "relaxation",
            PackageType::Cultural => "cultural",
            PackageType::Honeymoon => "honeymoon",
            PackageType::Friend => "friend",
            PackageType::Family => "family",
        }
    }
}

impl std::str::FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adventure" => Ok(PackageType::Adventure),
            "luxury" => Ok(PackageType::Luxury),
            "relaxation" => Ok(PackageType::Relaxation),
            "cultural" => Ok(PackageType::Cultural),
            "honeymoon" => Ok(PackageType::Honeymoon),
            "friend" => Ok(PackageType::Friend),
            "family" => Ok(PackageType::Family),
            other => Err(format!("unknown package type: {other}")),
        }
    }
}

/// A sellable travel itinerary product with fixed dates, price and capacity.
///
/// Owned by the agent/admin that created it. Packages referenced by bookings
/// are never hard-deleted; `deactivate` flips `available` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelPackage {
    pub id: Uuid,
    pub name: String,
    pub destination: String,
    pub description: String,
    pub package_type: PackageType,
    pub price: Decimal,
    pub duration_days: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub max_people: i32,
    pub available: bool,
    pub is_featured: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Duration must be at least 1 day")]
    InvalidDuration,

    #[error("Capacity must be at least 1 person")]
    InvalidCapacity,

    #[error("End date precedes start date")]
    InvalidDateRange,
}

impl TravelPackage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        destination: String,
        description: String,
        package_type: PackageType,
        price: Decimal,
        duration_days: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        max_people: i32,
        created_by: Uuid,
    ) -> Result<Self, PackageError> {
        let now = Utc::now();
        let package = Self {
            id: Uuid::new_v4(),
            name,
            destination,
            description,
            package_type,
            price,
            duration_days,
            start_date,
            end_date,
            max_people,
            available: true,
            is_featured: false,
            created_by,
            created_at: now,
            updated_at: now,
        };
        package.validate()?;
        Ok(package)
    }

    pub fn validate(&self) -> Result<(), PackageError> {
        if self.price < Decimal::ZERO {
            return Err(PackageError::NegativePrice);
        }
        if self.duration_days < 1 {
            return Err(PackageError::InvalidDuration);
        }
        if self.max_people < 1 {
            return Err(PackageError::InvalidCapacity);
        }
        if self.end_date < self.start_date {
            return Err(PackageError::InvalidDateRange);
        }
        Ok(())
    }

    /// Soft-deactivation: the package stops accepting bookings but stays
    /// referenced by existing ones.
    pub fn deactivate(&mut self) {
        self.available = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_package() -> TravelPackage {
        TravelPackage::new(
            "Highland Trek".to_string(),
            "Scotland".to_string(),
            "Five days in the Cairngorms".to_string(),
            PackageType::Adventure,
            dec!(1200),
            5,
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            12,
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn new_package_is_available() {
        let package = valid_package();
        assert!(package.available);
        assert!(!package.is_featured);
    }

    #[test]
    fn deactivate_keeps_the_record() {
        let mut package = valid_package();
        package.deactivate();
        assert!(!package.available);
    }

    #[test]
    fn rejects_inverted_date_range() {
        let result = TravelPackage::new(
            "Backwards".to_string(),
            "Nowhere".to_string(),
            String::new(),
            PackageType::Relaxation,
            dec!(100),
            3,
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            4,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(PackageError::InvalidDateRange)));
    }

    #[test]
    fn rejects_zero_capacity() {
        let result = TravelPackage::new(
            "Ghost Tour".to_string(),
            "Nowhere".to_string(),
            String::new(),
            PackageType::Cultural,
            dec!(100),
            1,
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            0,
            Uuid::new_v4(),
        );
        assert!(matches!(result, Err(PackageError::InvalidCapacity)));
    }
}
