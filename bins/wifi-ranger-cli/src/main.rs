use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wifi_ranger_core::{
    resolve_platform, FileConfigStorage, PlatformAdapter, Query, RangerConfig, Settings,
};
use wifi_ranger_monitor::{
    connect_strongest, discover, AcquisitionLoop, NetworkError, Output, Probe, SystemRunner,
};

mod display;
mod menu;

use display::{ConsolePrinter, TerminalChart};
use menu::Mode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so readings on stdout stay clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wifi_ranger_monitor=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let platform = resolve_platform()?;

    let storage = FileConfigStorage::default_location();
    let config = Settings::load_or_default(&storage)?.resolve()?;
    tracing::debug!(
        "Loaded settings from {} ({:?})",
        storage.path().display(),
        config
    );

    let mode = match std::env::args().nth(1) {
        Some(choice) => Mode::from_choice(&choice),
        None => menu::prompt()?,
    };
    let Some(mode) = mode else {
        println!("Invalid choice. Please run the program again and select a valid option.");
        return Ok(());
    };

    let adapter = PlatformAdapter::new(platform).with_airport_device(&config.airport_device);
    let probe = Probe::new(adapter, SystemRunner::new(config.command_timeout));
    println!("{}", mode.banner());

    match mode {
        Mode::MonitorOne => {
            let mut printer = ConsolePrinter;
            poll(probe, Query::CurrentStatus, &config, Output::Console(&mut printer)).await;
            println!("Monitoring stopped.");
        }
        Mode::ChartOne => {
            let mut chart = TerminalChart::new("WiFi Signal Strength Over Time");
            poll(probe, Query::CurrentStatus, &config, Output::Chart(&mut chart)).await;
            println!("Plotting stopped.");
        }
        Mode::ListAll => match discover(&probe, &config.model).await {
            Ok(networks) => {
                println!("Available WiFi Networks:");
                display::print_networks(&networks);
            }
            Err(NetworkError::EmptyNetworkList) => println!("No WiFi networks found."),
            Err(e) => return Err(e.into()),
        },
        Mode::ConnectStrongest => match connect_strongest(&probe, &config.model).await {
            Ok(report) => {
                println!("Available WiFi Networks and Signal Strengths:");
                display::print_networks(&report.networks);
                display::print_attempt(&report.attempt);
            }
            Err(NetworkError::EmptyNetworkList) => println!("No WiFi networks found."),
            Err(e) => return Err(e.into()),
        },
        Mode::ChartAll => {
            let mut chart = TerminalChart::new("WiFi Signal Strengths of All Networks Over Time");
            poll(probe, Query::ScanAll, &config, Output::Chart(&mut chart)).await;
            println!("Plotting stopped.");
        }
    }

    Ok(())
}

/// Run an acquisition loop until Ctrl+C.
async fn poll(
    probe: Probe<SystemRunner>,
    query: Query,
    config: &RangerConfig,
    output: Output<'_>,
) {
    let mut acquisition = AcquisitionLoop::new(probe, query, config);
    acquisition.run(output, shutdown_signal()).await;
}

/// A flag that turns true on Ctrl+C.
fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received Ctrl+C, stopping...");
                let _ = tx.send(true);
            }
            Err(e) => {
                tracing::warn!("Cannot listen for Ctrl+C: {}", e);
                // Park the task so the sender stays alive; a dropped sender stops the loop
                std::future::pending::<()>().await;
            }
        }
    });
    rx
}
