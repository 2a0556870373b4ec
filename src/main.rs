use anyhow::{Context, Result};
use ordersheet::{
    config::Config,
    export,
    fetch::Source,
    loader::OrderDataLoader,
    stats,
};
use reqwest::Client;
use std::{path::Path, time::Duration};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ordersheet=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) config + source ──────────────────────────────────────────
    let config = Config::load().context("loading config")?;
    info!(?config, "loaded config");

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("building HTTP client")?;
    let source = Source::from_config(client, &config.source)?;
    let loader = OrderDataLoader::new(source, Duration::from_secs(config.cache_ttl_secs));
    let output_dir = config.output_dir.as_deref();

    // ─── 3) run once, or keep refreshing ─────────────────────────────
    let Some(every) = config.refresh_secs else {
        run_once(&loader, output_dir).await?;
        info!("all done");
        return Ok(());
    };

    let mut ticker = time::interval(Duration::from_secs(every));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_once(&loader, output_dir).await {
                    error!("refresh failed: {:#}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; exit");
                return Ok(());
            }
        }
    }
}

async fn run_once(loader: &OrderDataLoader, output_dir: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let orders = match loader.load().await {
        Ok(orders) => orders,
        Err(e) => {
            error!(source = %loader.source().id(), kind = e.kind(), "load failed: {}", e);
            return Err(e.into());
        }
    };
    let stats = stats::aggregate(&orders.batch)?;
    info!(
        total_orders = stats.total_orders,
        total_revenue = stats.total_revenue,
        total_qty = stats.total_qty,
        avg_order = ?stats.avg_order,
        top_state = %stats.top_state,
        date_range = ?stats.date_range,
        elapsed = ?start.elapsed(),
        "summary"
    );

    if let Some(dir) = output_dir {
        let dir = dir.to_path_buf();
        // parquet encoding is blocking work
        tokio::task::spawn_blocking(move || export::export_all(&orders, &stats, &dir)).await??;
    }
    Ok(())
}
