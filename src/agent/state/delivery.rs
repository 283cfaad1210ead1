//! Home delivery date resolution
//!
//! Every shipping zone matching a postal code is sequenced on its own: the
//! first order date is today if the zone's ordering window is still open,
//! otherwise the next ordering date from today, and each following order
//! date is one week later. Each order date maps to exactly one delivery date.
//! The per-zone lists are then merged chronologically, collapsed on equal
//! dates, and cut once enough non-denied dates have been collected.

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
        schedule::{
            ShippingZone,
            cutoff::can_still_order_today,
            sequencer::{
                delivery_date_from_order_date,
                next_order_date,
            },
        },
    },
    chrono::{
        Days,
        NaiveDate,
        NaiveDateTime,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    tracing::instrument,
};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableDate {
    pub date:         NaiveDate,
    pub display_date: String,
    pub is_available: bool,
    pub is_denied:    bool,
}

impl AvailableDate {
    pub fn new(date: NaiveDate, is_denied: bool) -> Self {
        Self {
            date,
            display_date: calendar::display_label(date),
            is_available: !is_denied,
            is_denied,
        }
    }
}

#[async_trait::async_trait]
pub trait DeliveryDates {
    /// Next selectable delivery dates for `postal_code`, denied dates included but flagged.
    async fn delivery_dates(&self, postal_code: &str)
    -> Result<Vec<AvailableDate>, AvailabilityError>;
}

#[async_trait::async_trait]
impl DeliveryDates for State {
    #[instrument(skip(self))]
    async fn delivery_dates(
        &self,
        postal_code: &str,
    ) -> Result<Vec<AvailableDate>, AvailabilityError> {
        let result = resolve(self, postal_code).await;
        self.record(ResolutionKind::Delivery, &result, |entry| entry.is_denied);
        result
    }
}

async fn resolve(state: &State, postal_code: &str) -> Result<Vec<AvailableDate>, AvailabilityError> {
    if postal_code.trim().is_empty() {
        return Err(AvailabilityError::ZoneNotFound(postal_code.to_string()));
    }

    let (zones, denylist) = tokio::join!(
        state.store.zones_by_postal_code(postal_code),
        state.denylist()
    );
    let zones = zones.map_err(AvailabilityError::Fetch)?;

    if zones.is_empty() {
        return Err(AvailabilityError::ZoneNotFound(postal_code.to_string()));
    }

    let now = state.clock.now();
    tracing::debug!(
        zones = zones.len(),
        denied_dates = denylist.len(),
        now = %now,
        "Resolving delivery dates.",
    );

    let dates = delivery_dates_for(&zones, now, &denylist, &state.config);

    tracing::info!(
        postal_code,
        dates = ?dates.iter().map(|entry| entry.date).collect::<Vec<_>>(),
        "Resolved delivery dates.",
    );

    Ok(dates)
}

/// Runs every zone's sequence and merges the results.
pub fn delivery_dates_for(
    zones: &[ShippingZone],
    now: NaiveDateTime,
    denylist: &DenyList,
    config: &Config,
) -> Vec<AvailableDate> {
    let per_zone = zones
        .iter()
        .map(|zone| zone_delivery_dates(zone, now, denylist, config))
        .collect();

    merge_delivery_dates(per_zone, config.wanted_available)
}

/// Order date that starts a zone's sequence.
pub fn first_order_date(zone: &ShippingZone, now: NaiveDateTime) -> NaiveDate {
    let today = now.date();

    if can_still_order_today(zone, now) {
        today
    } else {
        next_order_date(zone, today)
    }
}

/// Delivery dates offered by a single zone, in chronological order.
pub fn zone_delivery_dates(
    zone: &ShippingZone,
    now: NaiveDateTime,
    denylist: &DenyList,
    config: &Config,
) -> Vec<AvailableDate> {
    let today = now.date();
    let horizon = today
        .checked_add_days(Days::new(config.delivery_horizon_days))
        .unwrap_or(NaiveDate::MAX);

    let mut dates = Vec::with_capacity(config.dates_per_zone);
    let mut order_date = first_order_date(zone, now);

    while dates.len() < config.dates_per_zone {
        let delivery_date = delivery_date_from_order_date(order_date, zone);
        dates.push(AvailableDate::new(
            delivery_date,
            denylist.contains(delivery_date),
        ));

        let cursor = order_date + Days::new(7);
        if cursor > horizon {
            break;
        }
        order_date = next_order_date(zone, cursor);
    }

    tracing::trace!(
        zone_id = ?zone.id,
        dates = ?dates.iter().map(|entry| entry.date).collect::<Vec<_>>(),
        "Sequenced zone delivery dates.",
    );

    dates
}

/// Merges per-zone lists into one chronological list without repeated
/// dates. The first zone offering a date wins. Stops after
/// `wanted_available` non-denied dates; denied dates before that point are
/// kept.
pub fn merge_delivery_dates(
    per_zone: Vec<Vec<AvailableDate>>,
    wanted_available: usize,
) -> Vec<AvailableDate> {
    let mut all: Vec<AvailableDate> = per_zone.into_iter().flatten().collect();

    // Stable, so equal dates keep zone order and dedup keeps the first zone's entry.
    all.sort_by_key(|entry| entry.date);
    all.dedup_by_key(|entry| entry.date);

    let mut available = 0;
    let mut merged = Vec::new();
    for entry in all {
        if available >= wanted_available {
            break;
        }
        if entry.is_available {
            available += 1;
        }
        merged.push(entry);
    }

    merged
}
