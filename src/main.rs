use anyhow::Context;
use clap::Parser;
use csv_price_processor::utils::{logger, validation::Validate};
use csv_price_processor::{build_router, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_server_logger(config.verbose);
    }

    tracing::info!("Starting csv-price-processor");
    if config.verbose {
        tracing::debug!("Server config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, build_router(config))
        .await
        .context("server error")?;

    Ok(())
}
