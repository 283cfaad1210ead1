// The reference store holds the data the availability resolvers read: shipping
// zones, pickup locations and the denied date list. It is owned and edited by
// the back-office; this agent only ever reads from it.

pub mod fixture;
pub mod rest;

use {
    crate::agent::schedule::{
        ShippingZone,
        pickup_hours::PickupLocation,
    },
    anyhow::Result,
    serde::Deserialize,
    std::sync::Arc,
};

#[async_trait::async_trait]
pub trait ReferenceStore: Send + Sync {
    /// All zones offering delivery to `postal_code`, in store order.
    async fn zones_by_postal_code(&self, postal_code: &str) -> Result<Vec<ShippingZone>>;

    /// Denied dates as `YYYY-MM-DD` strings.
    async fn denied_dates(&self) -> Result<Vec<String>>;

    async fn pickup_location(&self, id: i64) -> Result<Option<PickupLocation>>;
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Config {
    /// Reference data read once from a local JSON file.
    Fixture(fixture::Config),
    /// Reference data queried per request from a PostgREST endpoint.
    Rest(rest::Config),
}

impl Default for Config {
    fn default() -> Self {
        Self::Fixture(fixture::Config::default())
    }
}

pub async fn from_config(config: &Config) -> Result<Arc<dyn ReferenceStore>> {
    let store: Arc<dyn ReferenceStore> = match config {
        Config::Fixture(config) => Arc::new(fixture::FixtureStore::load(&config.path).await?),
        Config::Rest(config) => Arc::new(rest::RestStore::new(config)?),
    };
    Ok(store)
}
