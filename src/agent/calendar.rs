//! Day-of-week numbering and date formatting shared by the delivery and pickup resolvers.
//!
//! Weekdays are numbered Sunday=0 through Saturday=6 everywhere: in the
//! shipping zone reference data and when reading the local clock. Mixing
//! this with chrono's Monday-first numbering is an easy off-by-one, so all
//! conversions go through [`day_index`] and [`weekday_from_index`].

use {
    anyhow::{
        Context,
        Result,
        anyhow,
    },
    chrono::{
        Datelike,
        NaiveDate,
        NaiveTime,
        Weekday,
    },
    serde::{
        Deserialize,
        Deserializer,
        de::Error as _,
    },
};

/// Hungarian weekday names, indexed Sunday=0.
pub const DAY_NAMES: [&str; 7] = [
    "vasárnap",
    "hétfő",
    "kedd",
    "szerda",
    "csütörtök",
    "péntek",
    "szombat",
];

const STORAGE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%Y.%m.%d.";

/// Sunday-first index of a weekday (Sunday=0, Saturday=6).
pub fn day_index(weekday: Weekday) -> u32 {
    weekday.num_days_from_sunday()
}

pub fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => DAY_NAMES[0],
        Weekday::Mon => DAY_NAMES[1],
        Weekday::Tue => DAY_NAMES[2],
        Weekday::Wed => DAY_NAMES[3],
        Weekday::Thu => DAY_NAMES[4],
        Weekday::Fri => DAY_NAMES[5],
        Weekday::Sat => DAY_NAMES[6],
    }
}

/// `YYYY-MM-DD`, the form dates are stored and compared in.
pub fn storage_key(date: NaiveDate) -> String {
    date.format(STORAGE_FORMAT).to_string()
}

/// `YYYY.MM.DD. <weekday>`, e.g. `2024.06.07. péntek`.
pub fn display_label(date: NaiveDate) -> String {
    format!("{} {}", date.format(DISPLAY_FORMAT), day_name(date.weekday()))
}

pub fn parse_storage_key(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), STORAGE_FORMAT)
        .with_context(|| format!("{:?} is not a YYYY-MM-DD date", s))
}

/// Parses an `HH:MM:SS` time of day. `HH:MM` is accepted as well, with
/// seconds set to zero.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| anyhow!("{:?} does not match HH:MM:SS format", s))
}

/// Serde adapter for Sunday-first weekday integers.
pub fn deserialize_day_index<'de, D>(deserializer: D) -> std::result::Result<Weekday, D::Error>
where
    D: Deserializer<'de>,
{
    let index = u32::deserialize(deserializer)?;
    weekday_from_index(index)
        .ok_or_else(|| D::Error::custom(format!("weekday index {} is not in 0..=6", index)))
}

/// Serde adapter for `HH:MM:SS` strings.
pub fn deserialize_time_of_day<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_time_of_day(&raw).map_err(D::Error::custom)
}
