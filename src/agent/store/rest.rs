//! PostgREST-backed reference store.
//!
//! Table and column names follow the hosted shop database, which predates
//! this agent. Rows are mapped onto the agent's own types on the way in.

use {
    super::ReferenceStore,
    crate::agent::{
        calendar,
        schedule::{
            ShippingZone,
            pickup_hours::PickupLocation,
        },
    },
    anyhow::{
        Context,
        Result,
    },
    chrono::{
        NaiveTime,
        Weekday,
    },
    reqwest::Client,
    serde::{
        Deserialize,
        de::DeserializeOwned,
    },
    std::{
        fmt,
        time::Duration,
    },
    url::Url,
};

const ZONES_TABLE: &str = "ShippingZones";
const DENIED_DATES_TABLE: &str = "DeniedShippingDates";
const PICKUP_LOCATIONS_TABLE: &str = "PickupLocations";

#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base URL of the database API, without the `/rest/v1` suffix.
    pub url:             Url,
    /// Key sent as both `apikey` and bearer token.
    pub api_key:         String,
    /// Upper bound on each request, connection setup included.
    #[serde(with = "humantime_serde", default = "default_request_timeout")]
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(5)
}

pub struct RestStore {
    client:  Client,
    base:    Url,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Could not build reference store HTTP client")?;

        Ok(Self {
            client,
            base: with_trailing_slash(config.url.clone()),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.base
            .join(&format!("rest/v1/{}", table))
            .with_context(|| format!("Could not build URL for table {}", table))
    }

    async fn select<T>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.table_url(table)?;

        tracing::debug!(table, filters = ?filters, "Querying reference store.");

        let rows = self
            .client
            .get(url)
            .query(&[("select", "*")])
            .query(filters)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", table))?
            .error_for_status()
            .with_context(|| format!("Query on {} was rejected", table))?
            .json()
            .await
            .with_context(|| format!("Could not decode rows from {}", table))?;

        Ok(rows)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[derive(Debug, Deserialize)]
struct ShippingZoneRow {
    #[serde(rename = "ID", default)]
    id:                   Option<i64>,
    #[serde(rename = "Iranyitoszam")]
    postal_code:          String,
    #[serde(rename = "RendelesiNap", deserialize_with = "calendar::deserialize_day_index")]
    order_cutoff_weekday: Weekday,
    #[serde(rename = "CutoffIdo", deserialize_with = "calendar::deserialize_time_of_day")]
    order_cutoff_time:    NaiveTime,
    #[serde(rename = "SzallitasiNap", deserialize_with = "calendar::deserialize_day_index")]
    delivery_weekday:     Weekday,
}

impl From<ShippingZoneRow> for ShippingZone {
    fn from(row: ShippingZoneRow) -> Self {
        ShippingZone {
            id:                   row.id,
            postal_code:          row.postal_code,
            order_cutoff_weekday: row.order_cutoff_weekday,
            order_cutoff_time:    row.order_cutoff_time,
            delivery_weekday:     row.delivery_weekday,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeniedDateRow {
    date: String,
}

#[async_trait::async_trait]
impl ReferenceStore for RestStore {
    async fn zones_by_postal_code(&self, postal_code: &str) -> Result<Vec<ShippingZone>> {
        let rows: Vec<ShippingZoneRow> = self
            .select(
                ZONES_TABLE,
                &[("Iranyitoszam", format!("eq.{}", postal_code.trim()))],
            )
            .await?;
        Ok(rows.into_iter().map(ShippingZone::from).collect())
    }

    async fn denied_dates(&self) -> Result<Vec<String>> {
        let rows: Vec<DeniedDateRow> = self.select(DENIED_DATES_TABLE, &[]).await?;
        Ok(rows.into_iter().map(|row| row.date).collect())
    }

    async fn pickup_location(&self, id: i64) -> Result<Option<PickupLocation>> {
        let rows: Vec<PickupLocation> = self
            .select(PICKUP_LOCATIONS_TABLE, &[("id", format!("eq.{}", id))])
            .await?;
        Ok(rows.into_iter().next())
    }
}
