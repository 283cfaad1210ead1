//! Pickup location opening hours

use {
    chrono::Weekday,
    serde::Deserialize,
};

/// Values that mark a weekday as closed, compared case-insensitively after trimming.
const CLOSED_MARKERS: [&str; 3] = ["-", "closed", "zárva"];

/// A pickup location as stored: one free-form time range per weekday.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize)]
pub struct PickupLocation {
    pub id:        i64,
    #[serde(default)]
    pub name:      String,
    #[serde(default = "default_enabled")]
    pub enabled:   bool,
    #[serde(default)]
    pub monday:    Option<String>,
    #[serde(default)]
    pub tuesday:   Option<String>,
    #[serde(default)]
    pub wednesday: Option<String>,
    #[serde(default)]
    pub thursday:  Option<String>,
    #[serde(default)]
    pub friday:    Option<String>,
    #[serde(default)]
    pub saturday:  Option<String>,
    #[serde(default)]
    pub sunday:    Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl PickupLocation {
    pub fn schedule(&self) -> PickupSchedule {
        PickupSchedule {
            mon: PickupDayKind::from_raw(self.monday.as_deref()),
            tue: PickupDayKind::from_raw(self.tuesday.as_deref()),
            wed: PickupDayKind::from_raw(self.wednesday.as_deref()),
            thu: PickupDayKind::from_raw(self.thursday.as_deref()),
            fri: PickupDayKind::from_raw(self.friday.as_deref()),
            sat: PickupDayKind::from_raw(self.saturday.as_deref()),
            sun: PickupDayKind::from_raw(self.sunday.as_deref()),
        }
    }
}

/// Weekly pickup schedule
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PickupSchedule {
    pub mon: PickupDayKind,
    pub tue: PickupDayKind,
    pub wed: PickupDayKind,
    pub thu: PickupDayKind,
    pub fri: PickupDayKind,
    pub sat: PickupDayKind,
    pub sun: PickupDayKind,
}

impl PickupSchedule {
    pub fn on(&self, weekday: Weekday) -> &PickupDayKind {
        match weekday {
            Weekday::Mon => &self.mon,
            Weekday::Tue => &self.tue,
            Weekday::Wed => &self.wed,
            Weekday::Thu => &self.thu,
            Weekday::Fri => &self.fri,
            Weekday::Sat => &self.sat,
            Weekday::Sun => &self.sun,
        }
    }

    /// Time range for `weekday`, or `None` if the location is closed that day.
    pub fn hours_on(&self, weekday: Weekday) -> Option<&str> {
        match self.on(weekday) {
            PickupDayKind::Open(time_range) => Some(time_range.as_str()),
            PickupDayKind::Closed => None,
        }
    }

    pub fn has_open_day(&self) -> bool {
        [
            &self.mon, &self.tue, &self.wed, &self.thu, &self.fri, &self.sat, &self.sun,
        ]
        .into_iter()
        .any(|day| matches!(day, PickupDayKind::Open(_)))
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum PickupDayKind {
    #[default]
    Closed,
    /// Open, with the trimmed time range text shown to customers.
    Open(String),
}

impl PickupDayKind {
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(trimmed) = raw.map(str::trim) else {
            return Self::Closed;
        };

        let lowered = trimmed.to_lowercase();
        if trimmed.is_empty() || CLOSED_MARKERS.contains(&lowered.as_str()) {
            Self::Closed
        } else {
            Self::Open(trimmed.to_string())
        }
    }
}
