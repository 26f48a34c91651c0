mod config;
mod main_lib;
mod sink;

use std::sync::Arc;
use std::time::Duration;

use config::Config;
use filmarket_core::StopSignal;
use main_lib::{build_scheduler, init_tracing};
use sink::StdoutSink;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let stop = StopSignal::new();
    tokio::spawn(exit_on_signal(stop.clone(), config.shutdown_grace));

    let scheduler = build_scheduler(&config, Arc::new(StdoutSink));

    match scheduler.run(&stop).await {
        Ok(summary) => {
            info!(
                "Done: {} cycles, {} aborted",
                summary.cycles, summary.aborted
            );
            Ok(())
        }
        Err(e) => {
            error!("[MainLoop] {}", e);
            info!("Shutting down");
            std::process::exit(1);
        }
    }
}

/// On SIGINT/SIGTERM, ask the scheduler to stop and give it `grace` to wind
/// down before exiting.
async fn exit_on_signal(stop: StopSignal, grace: Duration) {
    wait_for_signal().await;
    info!("Stop requested, exiting in {} seconds", grace.as_secs());
    stop.stop();
    tokio::time::sleep(grace).await;
    info!("Shutting down");
    std::process::exit(0);
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            error!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
        _ = sigterm.recv() => info!("Received SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received Ctrl-C");
    }
}
