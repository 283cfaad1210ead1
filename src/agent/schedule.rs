pub mod cutoff;
pub mod pickup_hours;
pub mod sequencer;

use {
    crate::agent::calendar,
    chrono::{
        NaiveTime,
        Weekday,
    },
    serde::Deserialize,
};

/// A weekly delivery offer for one postal code: orders placed until the
/// cutoff weekday/time are delivered on the delivery weekday.
///
/// Weekday fields are read as Sunday=0 integers, see [`calendar::day_index`].
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct ShippingZone {
    #[serde(default)]
    pub id:                   Option<i64>,
    pub postal_code:          String,
    #[serde(deserialize_with = "calendar::deserialize_day_index")]
    pub order_cutoff_weekday: Weekday,
    #[serde(deserialize_with = "calendar::deserialize_time_of_day")]
    pub order_cutoff_time:    NaiveTime,
    #[serde(deserialize_with = "calendar::deserialize_day_index")]
    pub delivery_weekday:     Weekday,
}

impl ShippingZone {
    pub fn new(
        postal_code: impl Into<String>,
        order_cutoff_weekday: Weekday,
        order_cutoff_time: NaiveTime,
        delivery_weekday: Weekday,
    ) -> Self {
        Self {
            id: None,
            postal_code: postal_code.into(),
            order_cutoff_weekday,
            order_cutoff_time,
            delivery_weekday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_zone_with_sunday_first_weekdays() {
        let zone: ShippingZone = serde_json::from_str(
            r#"{
                "id": 4,
                "postal_code": "1011",
                "order_cutoff_weekday": 0,
                "order_cutoff_time": "18:30:00",
                "delivery_weekday": 2
            }"#,
        )
        .unwrap();

        assert_eq!(
            zone,
            ShippingZone {
                id:                   Some(4),
                postal_code:          "1011".to_string(),
                order_cutoff_weekday: Weekday::Sun,
                order_cutoff_time:    NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
                delivery_weekday:     Weekday::Tue,
            }
        );
    }

    #[test]
    fn test_deserialize_zone_rejects_out_of_range_weekday() {
        let parsed = serde_json::from_str::<ShippingZone>(
            r#"{
                "postal_code": "1011",
                "order_cutoff_weekday": 7,
                "order_cutoff_time": "18:30:00",
                "delivery_weekday": 2
            }"#,
        );
        assert!(parsed.is_err());
    }
}
