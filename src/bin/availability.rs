use {
    anyhow::{
        Context,
        Result,
        anyhow,
    },
    chrono::NaiveDateTime,
    clap::{
        Parser,
        Subcommand,
    },
    delivery_agent::agent::{
        clock::{
            Clock,
            FixedClock,
            SystemClock,
        },
        config::Config,
        state::{
            DeliveryDates,
            PickupTimes,
            State,
        },
        store::{
            self,
            fixture,
        },
    },
    prometheus_client::registry::Registry,
    std::{
        path::PathBuf,
        sync::Arc,
    },
};

#[derive(Parser, Debug)]
#[clap(version)]
/// Resolve delivery dates or pickup times once and print them as JSON
struct Arguments {
    #[clap(short, long, default_value = "config/config.toml")]
    /// Path to configuration file. Defaults are used when it does not exist.
    config: PathBuf,

    #[clap(long, value_parser = parse_now)]
    /// Local time to resolve against, e.g. "2024-06-04 10:00:00". Defaults to the current time.
    now: Option<NaiveDateTime>,

    #[clap(long)]
    /// Read reference data from this JSON file instead of the configured store
    fixture: Option<PathBuf>,

    #[clap(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Delivery dates for a postal code
    Delivery { postal_code: String },
    /// Pickup times for a pickup location
    Pickup { location_id: i64 },
}

fn parse_now(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("Invalid local time {:?}", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Arguments::parse();

    let mut config = if args.config.as_path().exists() {
        Config::new(&args.config).context("Could not parse config")?
    } else if args.fixture.is_some() {
        Config::default()
    } else {
        return Err(anyhow!("No config found under {:?}", args.config.to_str()));
    };

    if let Some(path) = args.fixture {
        config.store = store::Config::Fixture(fixture::Config { path });
    }

    let clock: Arc<dyn Clock> = match args.now {
        Some(now) => Arc::new(FixedClock(now)),
        None => Arc::new(SystemClock::new(config.availability.timezone)),
    };

    let state = State::new(
        store::from_config(&config.store).await?,
        clock,
        config.availability,
        &mut Registry::default(),
    );

    let output = match args.action {
        Action::Delivery { postal_code } => {
            serde_json::to_string_pretty(&state.delivery_dates(&postal_code).await?)?
        }
        Action::Pickup { location_id } => {
            serde_json::to_string_pretty(&state.pickup_times(location_id).await?)?
        }
    };

    println!("{}", output);
    Ok(())
}
