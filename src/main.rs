use {
    std::path::PathBuf,
    clap::Parser as _,
    rocket::Rocket,
    crate::prelude::*,
};

mod config;
mod http;
mod matchplay;
mod prelude;
mod standings;

#[derive(clap::Parser)]
#[clap(version)]
struct Args {
    /// Path to the JSON config file. Defaults to `matchplay-dashboard.json` in the XDG config directories.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Overrides the port from the config file.
    #[clap(long)]
    port: Option<u16>,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)] Config(#[from] config::Error),
    #[error(transparent)] Reqwest(#[from] reqwest::Error),
    #[error(transparent)] Rocket(#[from] rocket::Error),
}

#[rocket::main]
async fn main() -> Result<(), Error> {
    let Args { config, port } = Args::parse();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    let mut config = Config::load(config.as_deref()).await?;
    if let Some(port) = port {
        config.port = port;
    }
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("matchplay-dashboard/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .use_rustls_tls()
        .build()?;
    let client = matchplay::Client::new(http_client, &config);
    log::info!("serving dashboard for tournament {} on {}:{}", config.tournament_id, config.address, config.port);
    let Rocket { .. } = http::rocket(&config, client).launch().await?;
    Ok(())
}
