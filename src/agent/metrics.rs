use {
    anyhow::Result,
    lazy_static::lazy_static,
    prometheus_client::{
        encoding::{
            EncodeLabelSet,
            EncodeLabelValue,
            text::encode,
        },
        metrics::{
            counter::Counter,
            family::Family,
        },
        registry::Registry,
    },
    serde::Deserialize,
    std::net::SocketAddr,
    tokio::sync::Mutex,
    warp::{
        Filter,
        Rejection,
        Reply,
        http::StatusCode,
        reply,
    },
};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8888))
}

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

lazy_static! {
    pub static ref PROMETHEUS_REGISTRY: Mutex<Registry> =
        Mutex::new(<Registry>::with_prefix("delivery_agent"));
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum ResolutionKind {
    Delivery,
    Pickup,
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Outcome {
    Ok,
    NotFound,
    FetchError,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ResolutionLabels {
    pub kind:    ResolutionKind,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct KindLabels {
    pub kind: ResolutionKind,
}

/// Counters describing resolver activity.
#[derive(Clone, Default)]
pub struct AvailabilityMetrics {
    resolutions:             Family<ResolutionLabels, Counter>,
    denied_dates:            Family<KindLabels, Counter>,
    denylist_fetch_failures: Counter,
}

impl AvailabilityMetrics {
    pub fn new(registry: &mut Registry) -> Self {
        let metrics = Self::default();

        registry.register(
            "resolutions",
            "Availability resolutions by kind and outcome",
            metrics.resolutions.clone(),
        );
        registry.register(
            "denied_dates_encountered",
            "Denied dates included in resolution results",
            metrics.denied_dates.clone(),
        );
        registry.register(
            "denylist_fetch_failures",
            "Denylist reads that failed and were treated as empty",
            metrics.denylist_fetch_failures.clone(),
        );

        metrics
    }

    pub fn record_resolution(&self, kind: ResolutionKind, outcome: Outcome) {
        self.resolutions
            .get_or_create(&ResolutionLabels { kind, outcome })
            .inc();
    }

    pub fn record_denied_dates(&self, kind: ResolutionKind, count: usize) {
        if count > 0 {
            self.denied_dates
                .get_or_create(&KindLabels { kind })
                .inc_by(u64::try_from(count).unwrap_or(u64::MAX));
        }
    }

    pub fn record_denylist_fetch_failure(&self) {
        self.denylist_fetch_failures.inc();
    }

    #[cfg(test)]
    pub fn resolutions(&self, kind: ResolutionKind, outcome: Outcome) -> u64 {
        self.resolutions
            .get_or_create(&ResolutionLabels { kind, outcome })
            .get()
    }

    #[cfg(test)]
    pub fn denied_dates(&self, kind: ResolutionKind) -> u64 {
        self.denied_dates.get_or_create(&KindLabels { kind }).get()
    }

    #[cfg(test)]
    pub fn denylist_fetch_failures(&self) -> u64 {
        self.denylist_fetch_failures.get()
    }
}

async fn render_metrics() -> Result<Box<dyn Reply>, Rejection> {
    let mut buffer = String::new();
    let registry = PROMETHEUS_REGISTRY.lock().await;

    match encode(&mut buffer, &registry) {
        Ok(()) => Ok(Box::new(reply::with_header(
            buffer,
            "content-type",
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        ))),
        Err(err) => {
            tracing::error!(err = ?err, "Could not encode metrics.");
            Ok(Box::new(reply::with_status(
                "Could not encode metrics",
                StatusCode::INTERNAL_SERVER_ERROR,
            )))
        }
    }
}

pub async fn run(config: Config) {
    if let Err(err) = serve(config).await {
        tracing::error!(err = ?err, "Metrics server failed.");
    }
}

async fn serve(config: Config) -> Result<()> {
    let metrics_route = warp::path("metrics")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(render_metrics);

    let (addr, serve) = warp::serve(metrics_route).try_bind_with_graceful_shutdown(
        config.bind_address,
        async {
            let _ = crate::agent::EXIT.subscribe().changed().await;
        },
    )?;

    tracing::info!(bind_address = %addr, "Starting metrics server.");

    serve.await;
    Ok(())
}
