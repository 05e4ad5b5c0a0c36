use client::ConsoleHandler;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    info!("Initializing whattime");

    let settings = cli::settings::load()?;
    cli::run(&settings, &mut ConsoleHandler::stdout()).await?;

    Ok(())
}
