use {
    crate::agent::{
        clock::Clock,
        denylist::DenyList,
        metrics::{
            AvailabilityMetrics,
            Outcome,
            ResolutionKind,
        },
        store::ReferenceStore,
    },
    chrono_tz::Tz,
    prometheus_client::registry::Registry,
    serde::{
        Deserialize,
        Serialize,
    },
    std::sync::Arc,
};

pub mod delivery;
pub mod pickup;
pub use {
    delivery::{
        AvailableDate,
        DeliveryDates,
    },
    pickup::{
        AvailablePickupTime,
        PickupTimes,
    },
};

#[derive(Clone, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct Config {
    /// Timezone the shop's ordering deadlines are expressed in.
    pub timezone:              Tz,
    /// Number of selectable (non-denied) dates a resolution aims for.
    pub wanted_available:      usize,
    /// Maximum order/delivery pairs generated per shipping zone.
    pub dates_per_zone:        usize,
    /// Per-zone search stops once the cursor is this many days past today.
    pub delivery_horizon_days: u64,
    /// Maximum pickup entries emitted, denied ones included.
    pub pickup_max_entries:    usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone:              Tz::Europe__Budapest,
            wanted_available:      3,
            dates_per_zone:        10,
            delivery_horizon_days: 60,
            pickup_max_entries:    50,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AvailabilityError {
    #[error("no shipping zone found for postal code {0:?}")]
    ZoneNotFound(String),
    #[error("no enabled pickup location found with id {0}")]
    LocationNotFound(i64),
    #[error("could not fetch reference data: {0:#}")]
    Fetch(anyhow::Error),
}

impl AvailabilityError {
    fn outcome(&self) -> Outcome {
        match self {
            Self::ZoneNotFound(_) | Self::LocationNotFound(_) => Outcome::NotFound,
            Self::Fetch(_) => Outcome::FetchError,
        }
    }
}

/// State shared by every resolution: read-only handles plus metrics.
pub struct State {
    /// Read-only zone, pickup location and denylist data.
    store: Arc<dyn ReferenceStore>,

    /// Source of "now" for cutoff decisions.
    clock: Arc<dyn Clock>,

    /// Result size and search bounds.
    config: Config,

    metrics: AvailabilityMetrics,
}

impl State {
    pub fn new(
        store: Arc<dyn ReferenceStore>,
        clock: Arc<dyn Clock>,
        config: Config,
        registry: &mut Registry,
    ) -> Self {
        State {
            store,
            clock,
            config,
            metrics: AvailabilityMetrics::new(registry),
        }
    }

    /// Reads the denylist. A failed read is logged and treated as an empty
    /// list so that dates can still be offered.
    async fn denylist(&self) -> DenyList {
        match self.store.denied_dates().await {
            Ok(keys) => DenyList::from_storage_keys(keys),
            Err(err) => {
                tracing::warn!(err = ?err, "Could not fetch denied dates, assuming none are denied.");
                self.metrics.record_denylist_fetch_failure();
                DenyList::empty()
            }
        }
    }

    fn record<T>(
        &self,
        kind: ResolutionKind,
        result: &Result<Vec<T>, AvailabilityError>,
        denied: impl Fn(&T) -> bool,
    ) {
        match result {
            Ok(entries) => {
                self.metrics.record_resolution(kind, Outcome::Ok);
                self.metrics
                    .record_denied_dates(kind, entries.iter().filter(|entry| denied(entry)).count());
            }
            Err(err) => self.metrics.record_resolution(kind, err.outcome()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use {
        super::*,
        crate::agent::{
            clock::FixedClock,
            schedule::{
                ShippingZone,
                pickup_hours::PickupLocation,
            },
            store::fixture::{
                Fixture,
                FixtureStore,
            },
        },
        anyhow::{
            Result,
            anyhow,
        },
        chrono::NaiveDateTime,
    };

    pub fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    pub fn state_with(fixture: Fixture, now: &str) -> State {
        State::new(
            Arc::new(FixtureStore::new(fixture)),
            Arc::new(FixedClock(at(now))),
            Config::default(),
            &mut Registry::default(),
        )
    }

    /// Store whose queries fail on demand.
    pub struct FlakyStore {
        pub inner:               FixtureStore,
        pub fail_zones:          bool,
        pub fail_denied_dates:   bool,
        pub fail_pickup_lookups: bool,
    }

    #[async_trait::async_trait]
    impl ReferenceStore for FlakyStore {
        async fn zones_by_postal_code(&self, postal_code: &str) -> Result<Vec<ShippingZone>> {
            if self.fail_zones {
                return Err(anyhow!("zones table unavailable"));
            }
            self.inner.zones_by_postal_code(postal_code).await
        }

        async fn denied_dates(&self) -> Result<Vec<String>> {
            if self.fail_denied_dates {
                return Err(anyhow!("denied dates table unavailable"));
            }
            self.inner.denied_dates().await
        }

        async fn pickup_location(&self, id: i64) -> Result<Option<PickupLocation>> {
            if self.fail_pickup_lookups {
                return Err(anyhow!("pickup locations table unavailable"));
            }
            self.inner.pickup_location(id).await
        }
    }
}
