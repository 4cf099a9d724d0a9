use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, TraceLevel};
use dotenv::dotenv;
use std::time::Duration;
use tickr_warehouse::config::PgSettings;
use tickr_warehouse::updater::UPDATE_INTERVAL;
use tickr_warehouse::{db, schema, shutdown, Fetcher, TickerStore, Updater};
use tickr_web::AppSettings;
use tracing::{debug, info, trace, Level};

mod cli;

fn preprocess(trace_level: Level) -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(trace_level)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.trace {
        TraceLevel::DEBUG => Level::DEBUG,
        TraceLevel::INFO => Level::INFO,
        TraceLevel::WARN => Level::WARN,
        TraceLevel::ERROR => Level::ERROR,
    };

    preprocess(log_level)?;
    trace!("Command line input recorded: {cli:#?}");

    // open the pg pool, waiting for the database to come up
    debug!("Establishing PostgreSQL connection");
    let settings = PgSettings::from_env()?;
    let pool = db::connect(&settings, Duration::from_secs(cli.connect_timeout)).await?;
    let store = TickerStore::new(pool);
    debug!("PostgreSQL connection established");

    let command = cli.command.unwrap_or(Commands::Serve {
        interval: UPDATE_INTERVAL.as_secs(),
    });

    match command {
        // "> tickr serve"
        Commands::Serve { interval } => serve(store, Duration::from_secs(interval)).await?,

        // "> tickr update"
        Commands::Update => {
            schema::create_tables(store.pool()).await?;
            Updater::new(Fetcher::from_env()?, store)
                .update_tickers()
                .await?;
            info!("Tickers saved");
        }

        // "> tickr show"
        Commands::Show => {
            let snapshot = store.read_tickers().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        // "> tickr drop"
        Commands::Drop => {
            schema::drop_tables(store.pool()).await?;
            info!("Tickers table dropped");
        }
    }

    Ok(())
}

/// Startup sequence of the service: schema, one synchronous update (fatal on failure),
/// background updates, then the HTTP server until a termination signal arrives.
async fn serve(store: TickerStore, interval: Duration) -> Result<()> {
    let app_settings = AppSettings::from_env()?;

    schema::create_tables(store.pool()).await?;

    let updater = Updater::new(Fetcher::from_env()?, store.clone());
    updater.update_tickers().await?;
    info!("Tickers saved");

    let (trigger, shutdown) = shutdown::channel();
    let background = tokio::spawn(async move {
        updater
            .update_tickers_by_interval(interval, shutdown)
            .await
    });

    let served = tickr_web::serve(store, &app_settings).await;

    trigger.trigger();
    background
        .await
        .context("ticker updater task failed")?
        .context("ticker updater stopped")?;
    served.context("HTTP server failed")?;

    Ok(())
}
