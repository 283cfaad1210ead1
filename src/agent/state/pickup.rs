//! Personal pickup date resolution

use {
    super::{
        AvailabilityError,
        Config,
        State,
    },
    crate::agent::{
        calendar,
        denylist::DenyList,
        metrics::ResolutionKind,
        schedule::pickup_hours::PickupSchedule,
    },
    chrono::{
        Datelike,
        Days,
        NaiveDate,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    tracing::instrument,
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailablePickupTime {
    pub date:         NaiveDate,
    pub display_date: String,
    pub time_range:   String,
    pub is_available: bool,
    pub is_denied:    bool,
}

impl AvailablePickupTime {
    pub fn new(date: NaiveDate, time_range: &str, is_denied: bool) -> Self {
        Self {
            date,
            display_date: calendar::display_label(date),
            time_range: time_range.to_string(),
            is_available: !is_denied,
            is_denied,
        }
    }
}

#[async_trait::async_trait]
pub trait PickupTimes {
    /// Next days the location is open for pickup, denied days included but flagged.
    async fn pickup_times(
        &self,
        location_id: i64,
    ) -> Result<Vec<AvailablePickupTime>, AvailabilityError>;
}

#[async_trait::async_trait]
impl PickupTimes for State {
    #[instrument(skip(self))]
    async fn pickup_times(
        &self,
        location_id: i64,
    ) -> Result<Vec<AvailablePickupTime>, AvailabilityError> {
        let result = resolve(self, location_id).await;
        self.record(ResolutionKind::Pickup, &result, |entry| entry.is_denied);
        result
    }
}

async fn resolve(
    state: &State,
    location_id: i64,
) -> Result<Vec<AvailablePickupTime>, AvailabilityError> {
    let (location, denylist) = tokio::join!(
        state.store.pickup_location(location_id),
        state.denylist()
    );

    let location = location
        .map_err(AvailabilityError::Fetch)?
        .filter(|location| location.enabled)
        .ok_or(AvailabilityError::LocationNotFound(location_id))?;

    let schedule = location.schedule();
    if !schedule.has_open_day() {
        tracing::warn!(
            location_id,
            name = location.name,
            "Pickup location is closed on every weekday.",
        );
    }

    let today = state.clock.now().date();
    let times = pickup_times_for(&schedule, today, &denylist, &state.config);

    tracing::info!(
        location_id,
        dates = ?times.iter().map(|entry| entry.date).collect::<Vec<_>>(),
        "Resolved pickup times.",
    );

    Ok(times)
}

/// Walks forward from `today`, emitting an entry for every open day until
/// `wanted_available` non-denied days are found or `pickup_max_entries`
/// entries exist.
pub fn pickup_times_for(
    schedule: &PickupSchedule,
    today: NaiveDate,
    denylist: &DenyList,
    config: &Config,
) -> Vec<AvailablePickupTime> {
    let mut times = Vec::new();

    // Without a single open weekday the walk would never emit anything
    if !schedule.has_open_day() {
        return times;
    }

    let mut available = 0;
    let mut day = today;

    while available < config.wanted_available && times.len() < config.pickup_max_entries {
        if let Some(time_range) = schedule.hours_on(day.weekday()) {
            let is_denied = denylist.contains(day);
            if !is_denied {
                available += 1;
            }
            times.push(AvailablePickupTime::new(day, time_range, is_denied));
        }

        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }

    times
}
