/* ##################################################### System Architecture ######################################################

                                                 +------------------------------+
                                                 |          HTTP API            |       +----------+
    +-------------------+                        |                              |       |          |
    |                   |   zones, locations,    |  GET /delivery-dates/{code}  |<------|          |
    |  Reference Store  |   denied dates         |  GET /pickup-times/{id}      |       |   Shop   |
    |  (fixture / REST) |--------------+         |                              |------>| Frontend |
    |                   |              |         +------------------------------+       |          |
    +-------------------+              |                      ^       |                 +----------+
                                       v                      |       v
                          +--------------------------------------------------+
                          |                      State                       |
                          |                                                  |
                          |   Delivery resolver          Pickup resolver     |          +----------------+
                          |   (cutoff, sequencer,        (weekly hours,      |--------->| Metrics Server |
                          |    zone merge)                day walk)          |          +----------------+
                          |                                                  |
                          +--------------------------------------------------+
                                                  ^
                                                  |
                                              +-------+
                                              | Clock |
                                              +-------+

Read path:
- The frontend asks for delivery dates for a postal code, or pickup times for a pickup location.
- State fetches the matching zones or location together with the denied date list from the Reference Store.
- The resolvers turn the weekly rules into concrete dates, relative to the Clock's notion of "now".
- Denied dates stay in the result but are flagged and never count towards the wanted number of dates.

Nothing is written back to the Reference Store. Every request is resolved from scratch.

################################################################################################################################## */

pub mod api;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod denylist;
pub mod metrics;
pub mod schedule;
pub mod state;
pub mod store;

use {
    self::{
        clock::SystemClock,
        config::Config,
    },
    anyhow::Result,
    futures_util::future::join_all,
    lazy_static::lazy_static,
    std::sync::Arc,
    tokio::sync::watch,
};

lazy_static! {
    /// Flipped to `true` once on shutdown. Long-running tasks subscribe and stop when it changes.
    pub static ref EXIT: watch::Sender<bool> = watch::channel(false).0;
}

pub struct Agent {
    config: Config,
}

impl Agent {
    pub fn new(config: Config) -> Self {
        Agent { config }
    }

    pub async fn start(&self) {
        tracing::info!(
            config = format!("{:?}", &self.config),
            "Starting Delivery Agent.",
        );

        // Wait for the handle to complete.
        if let Err(err) = self.spawn().await {
            tracing::error!(err = ?err, "Agent spawn failed.");
        };
    }

    async fn spawn(&self) -> Result<()> {
        // job handles
        let mut handles = vec![];

        // Build the reference store once; it is shared by every request.
        let store = store::from_config(&self.config.store).await?;

        let clock = Arc::new(SystemClock::new(self.config.availability.timezone));

        // Create the application state.
        let state = Arc::new(state::State::new(
            store,
            clock,
            self.config.availability.clone(),
            &mut *metrics::PROMETHEUS_REGISTRY.lock().await,
        ));

        // Spawn the ctrl-c listener, which flips EXIT for every other task.
        handles.push(tokio::spawn(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(err = ?err, "Could not listen for shutdown signal.");
                return;
            }
            tracing::info!("Shut-down signal received, stopping.");
            EXIT.send_replace(true);
        }));

        // Spawn the HTTP API server
        handles.push(tokio::spawn(api::run(
            self.config.api_server.clone(),
            state.clone(),
        )));

        // Spawn the metrics server
        handles.push(tokio::spawn(metrics::run(
            self.config.metrics_server.clone(),
        )));

        // Wait for all tasks to complete
        join_all(handles).await;

        Ok(())
    }
}
