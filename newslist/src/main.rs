/*
newslist - main.rs
Loads configuration, starts the news list component and either serves the rendered page
over HTTP or prints the list once and exits.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newslist::component::{LoadStatus, NewsListComponent};
use newslist::render::render_text;
use newslist::server::{launch_rocket, AppState};
use newslist::service::HttpNewsService;

#[derive(Parser, Debug)]
#[command(name = "newslist", about = "Fetch news items from a backend API and display them")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override api.base_url from the configuration
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Print the news list once the fetch completes, then exit (no HTTP server)
    #[arg(long)]
    once: bool,

    /// With --once, print JSON instead of text
    #[arg(long, requires = "once")]
    json: bool,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so --once output stays clean on stdout
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    if let Some(url) = args.api_url {
        info!(%url, "api.base_url overridden from command line");
        config.api.base_url = url;
    }

    let service = HttpNewsService::from_config(&config.api)?;
    info!(url = %service.news_url(), "news endpoint resolved");

    let mut component = NewsListComponent::new(Arc::new(service));
    component.initialize();

    if args.once {
        return print_once(&config, &component, args.json).await;
    }

    let state = AppState::new(config.title(), component.subscribe());
    let served = launch_rocket(state, config.server.as_ref()).await;

    // Dropping the component aborts a fetch that is still in flight
    drop(component);

    if let Err(e) = served {
        error!(%e, "Rocket server failed");
        return Err(e);
    }
    info!("Shutdown complete");
    Ok(())
}

/// Wait for the first fetch to complete and print the result.
async fn print_once(config: &Config, component: &NewsListComponent, json: bool) -> Result<()> {
    let mut rx = component.subscribe();
    let state = rx
        .wait_for(|s| s.status != LoadStatus::Empty)
        .await
        .map_err(|_| anyhow::anyhow!("news list component stopped before loading"))?
        .clone();

    if let LoadStatus::Failed(e) = &state.status {
        error!(kind = e.kind(), error = %e, "could not load news");
        return Err(anyhow::anyhow!("could not load news: {}", e));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state.news)?);
    } else {
        print!("{}", render_text(config.title(), &state));
    }
    Ok(())
}
