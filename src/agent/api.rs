// This module exposes the availability resolvers over HTTP. It holds no business
// logic: each route forwards to the shared State and maps the outcome to a JSON
// response.

use {
    crate::agent::state::{
        AvailabilityError,
        DeliveryDates,
        PickupTimes,
    },
    anyhow::Result,
    percent_encoding::percent_decode_str,
    serde::{
        Deserialize,
        Serialize,
    },
    std::{
        net::SocketAddr,
        sync::Arc,
    },
    warp::{
        Filter,
        Rejection,
        Reply,
        http::StatusCode,
        reply,
    },
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The address which the HTTP API server will listen on.
    pub listen_address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: "127.0.0.1:8920".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorBody {
    error: String,
}

pub fn routes<S>(state: Arc<S>) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone
where
    S: DeliveryDates,
    S: PickupTimes,
    S: Send,
    S: Sync,
    S: 'static,
{
    let with_state = warp::any().map(move || state.clone());

    let delivery = warp::path!("delivery-dates" / String)
        .and(warp::get())
        .and(with_state.clone())
        .and_then(delivery_dates::<S>);

    let pickup = warp::path!("pickup-times" / i64)
        .and(warp::get())
        .and(with_state)
        .and_then(pickup_times::<S>);

    delivery.or(pickup)
}

async fn delivery_dates<S>(postal_code: String, state: Arc<S>) -> Result<Box<dyn Reply>, Rejection>
where
    S: DeliveryDates + Send + Sync,
{
    // Path segments arrive percent-encoded
    let postal_code = percent_decode_str(&postal_code).decode_utf8_lossy();
    Ok(respond(state.delivery_dates(&postal_code).await))
}

async fn pickup_times<S>(location_id: i64, state: Arc<S>) -> Result<Box<dyn Reply>, Rejection>
where
    S: PickupTimes + Send + Sync,
{
    Ok(respond(state.pickup_times(location_id).await))
}

fn respond<T: Serialize>(result: Result<Vec<T>, AvailabilityError>) -> Box<dyn Reply> {
    let (status, error) = match result {
        Ok(entries) => return Box::new(reply::json(&entries)),
        Err(err @ (AvailabilityError::ZoneNotFound(_) | AvailabilityError::LocationNotFound(_))) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        Err(err @ AvailabilityError::Fetch(_)) => {
            tracing::warn!(err = ?err, "Resolution failed on reference data.");
            (
                StatusCode::BAD_GATEWAY,
                "reference data is currently unavailable".to_string(),
            )
        }
    };

    Box::new(reply::with_status(reply::json(&ErrorBody { error }), status))
}

pub async fn run<S>(config: Config, state: Arc<S>)
where
    S: DeliveryDates,
    S: PickupTimes,
    S: Send,
    S: Sync,
    S: 'static,
{
    if let Err(err) = serve(config, state).await {
        tracing::error!(err = ?err, "API server failed.");
    }
}

async fn serve<S>(config: Config, state: Arc<S>) -> Result<()>
where
    S: DeliveryDates,
    S: PickupTimes,
    S: Send,
    S: Sync,
    S: 'static,
{
    let (addr, serve) = warp::serve(routes(state)).try_bind_with_graceful_shutdown(
        config.listen_address.as_str().parse::<SocketAddr>()?,
        async {
            let _ = crate::agent::EXIT.subscribe().changed().await;
        },
    )?;

    tracing::info!(listen_address = %addr, "Starting api server.");

    tokio::task::spawn(serve).await.map_err(|e| e.into())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::agent::{
            schedule::{
                ShippingZone,
                pickup_hours::PickupLocation,
            },
            state::{
                AvailableDate,
                AvailablePickupTime,
                test_support::state_with,
            },
            store::fixture::Fixture,
        },
        chrono::{
            NaiveDate,
            NaiveTime,
            Weekday,
        },
    };

    fn fixture() -> Fixture {
        Fixture {
            shipping_zones:   vec![ShippingZone::new(
                "1011",
                Weekday::Wed,
                NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                Weekday::Fri,
            )],
            denied_dates:     vec!["2024-06-21".to_string()],
            pickup_locations: vec![PickupLocation {
                id: 4,
                name: "Bolt".to_string(),
                enabled: true,
                tuesday: Some("10:00-18:00".to_string()),
                ..Default::default()
            }],
        }
    }

    fn state() -> Arc<crate::agent::state::State> {
        Arc::new(state_with(fixture(), "2024-06-04 10:00:00"))
    }

    #[tokio::test]
    async fn test_delivery_dates_route() {
        let res = warp::test::request()
            .method("GET")
            .path("/delivery-dates/1011")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let dates: Vec<AvailableDate> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(
            dates
                .iter()
                .map(|entry| (entry.date, entry.is_denied))
                .collect::<Vec<_>>(),
            vec![
                (NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(), false),
                (NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(), true),
                (NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(), false),
                (NaiveDate::from_ymd_opt(2024, 7, 5).unwrap(), false),
            ]
        );

        let raw: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(raw[0]["displayDate"], "2024.06.14. péntek");
        assert_eq!(raw[0]["isAvailable"], true);
    }

    #[tokio::test]
    async fn test_unknown_postal_code_is_404() {
        let res = warp::test::request()
            .method("GET")
            .path("/delivery-dates/9999")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = serde_json::from_slice(res.body()).unwrap();
        assert!(body.error.contains("9999"));
    }

    #[tokio::test]
    async fn test_blank_postal_code_is_404() {
        let res = warp::test::request()
            .method("GET")
            .path("/delivery-dates/%20%20")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: ErrorBody = serde_json::from_slice(res.body()).unwrap();
        assert!(body.error.contains("\"  \""));
    }

    #[tokio::test]
    async fn test_encoded_postal_code_is_decoded() {
        let res = warp::test::request()
            .method("GET")
            .path("/delivery-dates/%31011")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pickup_times_route() {
        let res = warp::test::request()
            .method("GET")
            .path("/pickup-times/4")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::OK);
        let times: Vec<AvailablePickupTime> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(times.len(), 3);
        assert!(times.iter().all(|entry| entry.time_range == "10:00-18:00"));
        assert_eq!(times[0].date, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_location_is_404() {
        let res = warp::test::request()
            .method("GET")
            .path("/pickup-times/5")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_location_is_rejected() {
        let res = warp::test::request()
            .method("GET")
            .path("/pickup-times/abc")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let res = warp::test::request()
            .method("POST")
            .path("/delivery-dates/1011")
            .reply(&routes(state()))
            .await;

        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
