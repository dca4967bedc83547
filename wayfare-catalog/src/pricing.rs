use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Room selection for a booking. Only `Suite` carries a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomType {
    Single,
    Double,
    Suite,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Suite => "Suite",
            RoomType::NotApplicable => "N/A",
        }
    }
}

impl std::str::FromStr for RoomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Single" => Ok(RoomType::Single),
            "Double" => Ok(RoomType::Double),
            "Suite" => Ok(RoomType::Suite),
            "N/A" => Ok(RoomType::NotApplicable),
            other => Err(format!("unknown room type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat surcharge for a Suite, applied once per booking (not per person).
    pub suite_surcharge: Decimal,

    /// Insurance premium as a fraction of the base price alone. Business
    /// policy: party size and room surcharge do not enter into it.
    pub insurance_rate: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            suite_surcharge: Decimal::new(500, 0),
            insurance_rate: Decimal::new(10, 2),
        }
    }
}

/// Price breakdown computed once at booking creation and frozen into the
/// booking record. Later changes to the package price never touch it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub room_surcharge: Decimal,
    pub insurance_cost: Decimal,
    pub number_of_people: i32,
    pub total: Decimal,
}

pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// `total = (base + surcharge) * people + insurance`, where the
    /// insurance premium is computed on the base price only.
    pub fn quote(
        &self,
        base_price: Decimal,
        number_of_people: i32,
        room_type: RoomType,
        insurance: bool,
    ) -> PriceQuote {
        let room_surcharge = if room_type == RoomType::Suite {
            self.config.suite_surcharge
        } else {
            Decimal::ZERO
        };

        let insurance_cost = if insurance {
            self.config.insurance_rate * base_price
        } else {
            Decimal::ZERO
        };

        let total =
            (base_price + room_surcharge) * Decimal::from(number_of_people) + insurance_cost;

        PriceQuote {
            base_price,
            room_surcharge,
            insurance_cost,
            number_of_people,
            total,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn suite_with_insurance_for_two() {
        let quote = PricingEngine::default().quote(dec!(100), 2, RoomType::Suite, true);
        assert_eq!(quote.room_surcharge, dec!(500));
        assert_eq!(quote.insurance_cost, dec!(10.00));
        assert_eq!(quote.total, dec!(1210.00));
    }

    #[test]
    fn surcharge_is_flat_but_multiplied_by_party_size() {
        // (100 + 500) * 4 = 2400: the flat surcharge enters the per-person
        // subtotal, exactly once per seat-price.
        let quote = PricingEngine::default().quote(dec!(100), 4, RoomType::Suite, false);
        assert_eq!(quote.total, dec!(2400));
    }

    #[test]
    fn insurance_ignores_party_size_and_surcharge() {
        let engine = PricingEngine::default();
        let solo = engine.quote(dec!(1000), 1, RoomType::Suite, true);
        let group = engine.quote(dec!(1000), 6, RoomType::Suite, true);
        assert_eq!(solo.insurance_cost, dec!(100.00));
        assert_eq!(group.insurance_cost, dec!(100.00));
    }

    #[test]
    fn standard_rooms_carry_no_surcharge() {
        let engine = PricingEngine::default();
        for room in [RoomType::Single, RoomType::Double, RoomType::NotApplicable] {
            let quote = engine.quote(dec!(250), 3, room, false);
            assert_eq!(quote.room_surcharge, Decimal::ZERO);
            assert_eq!(quote.total, dec!(750));
        }
    }
}
