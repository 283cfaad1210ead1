//! Ordering window evaluation

use {
    super::ShippingZone,
    crate::agent::calendar::day_index,
    chrono::{
        Datelike,
        NaiveDateTime,
    },
    std::cmp::Ordering,
};

/// Whether an order placed at `now` still makes this week's ordering window.
///
/// The window runs from the start of the Sunday-first week up to and
/// including the cutoff time on the cutoff weekday.
pub fn can_still_order_today(zone: &ShippingZone, now: NaiveDateTime) -> bool {
    let today = day_index(now.weekday());
    let cutoff_day = day_index(zone.order_cutoff_weekday);

    match today.cmp(&cutoff_day) {
        Ordering::Greater => false,
        Ordering::Equal => now.time() <= zone.order_cutoff_time,
        Ordering::Less => true,
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::agent::calendar::weekday_from_index,
        chrono::{
            Days,
            NaiveDate,
            NaiveTime,
            TimeDelta,
            Weekday,
        },
        proptest::prelude::*,
    };

    fn wednesday_noon_zone() -> ShippingZone {
        ShippingZone::new(
            "1011",
            Weekday::Wed,
            NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            Weekday::Fri,
        )
    }

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_cutoff_boundary_on_cutoff_day() {
        let zone = wednesday_noon_zone();

        // 2024-06-05 is a Wednesday
        assert!(can_still_order_today(&zone, at("2024-06-05 00:00:00")));
        assert!(can_still_order_today(&zone, at("2024-06-05 11:59:59")));
        assert!(can_still_order_today(&zone, at("2024-06-05 12:00:00")));
        assert!(!can_still_order_today(&zone, at("2024-06-05 12:00:01")));
        assert!(!can_still_order_today(&zone, at("2024-06-05 23:59:59")));
    }

    #[test]
    fn test_days_around_cutoff_day() {
        let zone = wednesday_noon_zone();

        // Sunday through Tuesday, late in the day
        assert!(can_still_order_today(&zone, at("2024-06-02 23:00:00")));
        assert!(can_still_order_today(&zone, at("2024-06-03 23:00:00")));
        assert!(can_still_order_today(&zone, at("2024-06-04 23:00:00")));

        // Thursday through Saturday, early in the day
        assert!(!can_still_order_today(&zone, at("2024-06-06 00:00:00")));
        assert!(!can_still_order_today(&zone, at("2024-06-07 06:00:00")));
        assert!(!can_still_order_today(&zone, at("2024-06-08 06:00:00")));
    }

    #[test]
    fn test_sunday_cutoff_only_opens_sunday() {
        let zone = ShippingZone::new(
            "1011",
            Weekday::Sun,
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            Weekday::Tue,
        );

        assert!(can_still_order_today(&zone, at("2024-06-02 20:00:00")));
        assert!(!can_still_order_today(&zone, at("2024-06-03 08:00:00")));
    }

    proptest! {
        /// On the cutoff day the window is open at exactly the cutoff time and closed one second later.
        #[test]
        fn cutoff_time_is_inclusive(
            cutoff_index in 0u32..7,
            delivery_index in 0u32..7,
            cutoff_seconds in 0u32..86_399,
            weeks in 0u64..200,
        ) {
            let cutoff_time = NaiveTime::from_num_seconds_from_midnight_opt(cutoff_seconds, 0).unwrap();
            let zone = ShippingZone::new(
                "1011",
                weekday_from_index(cutoff_index).unwrap(),
                cutoff_time,
                weekday_from_index(delivery_index).unwrap(),
            );

            // 2024-01-07 is a Sunday
            let cutoff_date = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
                + Days::new(weeks * 7 + u64::from(cutoff_index));
            let exactly = cutoff_date.and_time(cutoff_time);

            prop_assert!(can_still_order_today(&zone, exactly));
            prop_assert!(!can_still_order_today(&zone, exactly + TimeDelta::seconds(1)));
        }

        /// Days before the cutoff weekday are always open, days after it always closed.
        #[test]
        fn other_days_ignore_time(
            cutoff_index in 0u32..7,
            day_index_now in 0u32..7,
            seconds in 0u32..86_400,
        ) {
            prop_assume!(cutoff_index != day_index_now);

            let zone = ShippingZone::new(
                "1011",
                weekday_from_index(cutoff_index).unwrap(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                Weekday::Fri,
            );
            let now = (NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
                + Days::new(u64::from(day_index_now)))
                .and_time(NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap());

            prop_assert_eq!(can_still_order_today(&zone, now), day_index_now < cutoff_index);
        }
    }
}
