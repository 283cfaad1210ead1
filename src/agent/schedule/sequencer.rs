//! Weekly order/delivery date arithmetic for a single shipping zone.

use {
    super::ShippingZone,
    crate::agent::calendar::day_index,
    chrono::{
        Datelike,
        Days,
        NaiveDate,
    },
};

/// First date on or after `from` that opens an ordering cycle.
///
/// When `from` lies past the zone's cutoff weekday the cursor jumps to the
/// Monday of the following week. Otherwise `from` is returned unchanged; the
/// caller decides whether today itself still qualifies.
pub fn next_order_date(zone: &ShippingZone, from: NaiveDate) -> NaiveDate {
    let current = day_index(from.weekday());

    if current > day_index(zone.order_cutoff_weekday) {
        from + Days::new(u64::from(7 - current + 1))
    } else {
        from
    }
}

/// Delivery date for an order placed on `order_date`.
///
/// Delivery always falls in the week after the order week, so the result is
/// more than 7 and at most 14 days after `order_date`.
pub fn delivery_date_from_order_date(order_date: NaiveDate, zone: &ShippingZone) -> NaiveDate {
    let mut days_until_delivery =
        i64::from(day_index(zone.delivery_weekday)) - i64::from(day_index(order_date.weekday()));

    if days_until_delivery <= 0 {
        days_until_delivery += 7;
    }
    days_until_delivery += 7;

    order_date + Days::new(days_until_delivery.unsigned_abs())
}
