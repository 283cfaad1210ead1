use {
    super::ReferenceStore,
    crate::agent::schedule::{
        ShippingZone,
        pickup_hours::PickupLocation,
    },
    anyhow::{
        Context,
        Result,
    },
    serde::Deserialize,
    std::path::{
        Path,
        PathBuf,
    },
};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Path of the JSON reference data file.
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/reference.json"),
        }
    }
}

/// Contents of a reference data file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub shipping_zones:   Vec<ShippingZone>,
    #[serde(default)]
    pub denied_dates:     Vec<String>,
    #[serde(default)]
    pub pickup_locations: Vec<PickupLocation>,
}

/// In-memory store serving a fixed snapshot of reference data.
pub struct FixtureStore {
    fixture: Fixture,
}

impl FixtureStore {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Could not read reference data from {}", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse reference data in {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            shipping_zones = fixture.shipping_zones.len(),
            denied_dates = fixture.denied_dates.len(),
            pickup_locations = fixture.pickup_locations.len(),
            "Loaded reference data fixture.",
        );

        Ok(Self::new(fixture))
    }
}

#[async_trait::async_trait]
impl ReferenceStore for FixtureStore {
    async fn zones_by_postal_code(&self, postal_code: &str) -> Result<Vec<ShippingZone>> {
        let postal_code = postal_code.trim();
        Ok(self
            .fixture
            .shipping_zones
            .iter()
            .filter(|zone| zone.postal_code == postal_code)
            .cloned()
            .collect())
    }

    async fn denied_dates(&self) -> Result<Vec<String>> {
        Ok(self.fixture.denied_dates.clone())
    }

    async fn pickup_location(&self, id: i64) -> Result<Option<PickupLocation>> {
        Ok(self
            .fixture
            .pickup_locations
            .iter()
            .find(|location| location.id == id)
            .cloned())
    }
}
