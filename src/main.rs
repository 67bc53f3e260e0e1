use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sharp_scanner::api::routes::{build_picks, router, ApiState};
use sharp_scanner::config::Config;
use sharp_scanner::error::Result;
use sharp_scanner::scorer::View;
use sharp_scanner::state::Session;
use sharp_scanner::types::Sport;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("--once") => once(cfg, args.get(1).map(String::as_str)).await,
        _ => serve(cfg).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

/// Run a single cycle and print the full table as JSON on stdout.
async fn once(cfg: Config, sport: Option<&str>) -> Result<()> {
    let sport = match sport {
        Some(s) => s.parse::<Sport>()?,
        None => cfg.default_sport,
    };

    let mut session = Session::new(&cfg)?;
    session.run_cycle(sport).await;

    let picks = build_picks(
        session.table(),
        session.status(),
        session.fetched_at(),
        View::All,
        None,
    );
    println!("{}", serde_json::to_string_pretty(&picks)?);
    Ok(())
}

async fn serve(cfg: Config) -> Result<()> {
    let session = Session::new(&cfg)?;
    info!(
        "Scanner ready: default sport {}, window {}h, {:?} confidence bands, tz {}",
        cfg.default_sport, cfg.time_window_hours, cfg.confidence_scheme, cfg.target_tz,
    );

    let api_state = ApiState {
        session: Arc::new(Mutex::new(session)),
        default_sport: cfg.default_sport,
        default_hours: cfg.time_window_hours,
        tz: cfg.target_tz,
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
