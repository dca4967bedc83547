//! Sales aggregation for the agent/admin dashboard.
//!
//! Revenue counts Pending, Confirmed and Completed bookings (cancellations
//! drop out) and is keyed by trip date, not creation date, so a report
//! window matches the travel calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use wayfare_catalog::TravelPackage;

use crate::models::{Booking, BookingStatus};

#[derive(Debug, Clone, Serialize)]
pub struct DaySales {
    pub date: NaiveDate,
    pub total_sales: Decimal,
    pub booking_count: usize,
    pub traveler_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageSales {
    pub package_id: Uuid,
    pub name: String,
    pub revenue: Decimal,
    pub bookings: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub day_wise: Vec<DaySales>,
    pub package_wise: Vec<PackageSales>,
}

fn counts_as_sale(status: BookingStatus) -> bool {
    matches!(
        status,
        BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Completed
    )
}

pub fn sales_report(
    bookings: &[Booking],
    packages: &[TravelPackage],
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> SalesReport {
    let in_window = |b: &&Booking| {
        counts_as_sale(b.status)
            && start_date.map_or(true, |s| b.trip_date >= s)
            && end_date.map_or(true, |e| b.trip_date <= e)
    };

    let mut by_day: BTreeMap<NaiveDate, DaySales> = BTreeMap::new();
    for booking in bookings.iter().filter(in_window) {
        let entry = by_day.entry(booking.trip_date).or_insert(DaySales {
            date: booking.trip_date,
            total_sales: Decimal::ZERO,
            booking_count: 0,
            traveler_count: 0,
        });
        entry.total_sales += booking.total_price;
        entry.booking_count += 1;
        entry.traveler_count += i64::from(booking.number_of_people);
    }

    // Packages with zero sales in the window still appear, revenue 0.
    let mut package_wise: Vec<PackageSales> = packages
        .iter()
        .map(|package| {
            let related: Vec<&Booking> = bookings
                .iter()
                .filter(in_window)
                .filter(|b| b.package_id == package.id)
                .collect();
            PackageSales {
                package_id: package.id,
                name: package.name.clone(),
                revenue: related.iter().map(|b| b.total_price).sum(),
                bookings: related.len(),
            }
        })
        .collect();
    package_wise.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    SalesReport {
        day_wise: by_day.into_values().collect(),
        package_wise,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Traveler;
    use rust_decimal_macros::dec;
    use wayfare_catalog::{PackageType, RoomType};

    fn package(name: &str) -> TravelPackage {
        TravelPackage::new(
            name.to_string(),
            "Lisbon".to_string(),
            String::new(),
            PackageType::Cultural,
            dec!(400),
            4,
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            20,
            Uuid::new_v4(),
        )
        .unwrap()
    }

    fn booking_on(package_id: Uuid, day: u32, people: i32, total: Decimal) -> Booking {
        Booking::new(
            package_id,
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 6, day).unwrap(),
            people,
            vec![Traveler::default(); people as usize],
            RoomType::Double,
            false,
            total,
        )
    }

    #[test]
    fn groups_by_trip_date_and_skips_cancellations() {
        let pkg = package("City Break");
        let mut cancelled = booking_on(pkg.id, 2, 2, dec!(800));
        cancelled.status = BookingStatus::Cancelled;

        let bookings = vec![
            booking_on(pkg.id, 1, 2, dec!(800)),
            booking_on(pkg.id, 1, 1, dec!(400)),
            booking_on(pkg.id, 2, 3, dec!(1200)),
            cancelled,
        ];

        let report = sales_report(&bookings, std::slice::from_ref(&pkg), None, None);
        assert_eq!(report.day_wise.len(), 2);
        assert_eq!(report.day_wise[0].total_sales, dec!(1200));
        assert_eq!(report.day_wise[0].traveler_count, 3);
        assert_eq!(report.day_wise[1].total_sales, dec!(1200));
        assert_eq!(report.day_wise[1].booking_count, 1);
    }

    #[test]
    fn window_bounds_are_inclusive_on_trip_date() {
        let pkg = package("Coast Trip");
        let bookings = vec![
            booking_on(pkg.id, 1, 1, dec!(400)),
            booking_on(pkg.id, 15, 1, dec!(400)),
            booking_on(pkg.id, 30, 1, dec!(400)),
        ];
        let report = sales_report(
            &bookings,
            std::slice::from_ref(&pkg),
            NaiveDate::from_ymd_opt(2026, 6, 1),
            NaiveDate::from_ymd_opt(2026, 6, 15),
        );
        assert_eq!(report.day_wise.len(), 2);
        assert_eq!(report.package_wise[0].revenue, dec!(800));
    }

    #[test]
    fn zero_sale_packages_still_listed() {
        let selling = package("Seller");
        let quiet = package("Sleeper");
        let bookings = vec![booking_on(selling.id, 10, 2, dec!(800))];

        let report = sales_report(&bookings, &[selling, quiet], None, None);
        assert_eq!(report.package_wise.len(), 2);
        assert_eq!(report.package_wise[1].name, "Sleeper");
        assert_eq!(report.package_wise[1].revenue, Decimal::ZERO);
    }
}
