mod args;
mod config;

use std::io;
use std::net::SocketAddr;
use std::process::Command;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app_api::{AppContext, DashboardRequest};
use args::{Cli, ReportArgs, ServeArgs};
use http_api::{CSRF_HEADER, HttpState};
use mileage_app::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = config::load_or_create(cli.config.as_deref()).map_err(io::Error::other)?;
    if config.created {
        info!(
            path = %config.file.display(),
            port = config.config.port,
            "created default config"
        );
    }

    match cli.command {
        Some(args::Command::Report(args)) => report(&config.config, args).await,
        Some(args::Command::Serve(args)) => serve(&config.config, args).await,
        None => serve(&config.config, ServeArgs::default()).await,
    }
}

async fn report(
    config: &config::CliConfig,
    args: ReportArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::new(config.app_config(args.file));
    info!(source = %app_state.config.source.describe(), "loading fill-ups");
    let context = AppContext::new(app_state);
    app_api::refresh(&context).await?;

    let view = app_api::dashboard(
        &context,
        DashboardRequest {
            period: Some(args.period),
            chart_period: Some(args.chart_period),
            now: args.now,
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn serve(
    config: &config::CliConfig,
    args: ServeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::new(config.app_config(None));
    info!(source = %app_state.config.source.describe(), "using fill-up source");

    let refresh_state = app_state.clone();
    tokio::spawn(async move {
        if let Err(err) = refresh_state.refresh_data().await {
            warn!(error = %err, "failed to refresh data on startup");
        }
    });

    let state = HttpState::new(AppContext::new(app_state));
    let csrf_token = state.csrf_token().to_string();
    let router = http_api::router(state);

    let port = args.port.unwrap_or(config.port);
    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    let url = format!("http://127.0.0.1:{actual_port}");

    if used_fallback {
        warn!("configured port {port} was unavailable; using {actual_port} for this run");
    }

    println!("Gas mileage dashboard is running at {url}");
    println!("Send `{CSRF_HEADER}: {csrf_token}` with every /api request.");
    println!("Press Ctrl+C to stop.");

    if !args.no_open
        && let Err(err) = open_url(&url)
    {
        warn!(error = %err, "failed to open browser");
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

fn open_url(url: &str) -> Result<(), io::Error> {
    let status = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).status()?
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", "", url]).status()?
    } else {
        Command::new("xdg-open").arg(url).status()?
    };
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other("open command failed"))
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
