use std::str::FromStr;
use std::sync::Arc;

use deadeye_vision::config::Settings;
use deadeye_vision::deadeye::link::UdpLink;
use deadeye_vision::{AppError, RobotContainer};
use tokio::sync::broadcast;
use tracing::{error, info, warn, Level};

fn init_logging(level: &str) {
    let max_level = Level::from_str(level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(max_level).init();
    if !level.eq_ignore_ascii_case(max_level.as_str()) {
        warn!("Unknown log level {:?}, using {}", level, max_level);
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1);
    let settings = Settings::load(config_path.as_deref())?;
    init_logging(&settings.log_level);

    let link = Arc::new(
        UdpLink::bind(&settings.link.bind_address, settings.link.channel_capacity).await?,
    );
    let container = RobotContainer::new(&settings, &link)?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let mut link_task = {
        let link = link.clone();
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move { link.run(shutdown_rx).await })
    };

    let link_finished = tokio::select! {
        _ = container.scheduler().run(shutdown_tx.subscribe()) => false,
        result = &mut link_task => {
            match result {
                Ok(()) => error!("Deadeye link stopped unexpectedly"),
                Err(e) => error!("Deadeye link task failed: {}", e),
            }
            true
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for ctrl-c: {}", e);
            }
            info!("Shutting down");
            false
        }
    };

    let _ = shutdown_tx.send(());
    if !link_finished {
        if let Err(e) = link_task.await {
            error!("Deadeye link task failed: {}", e);
        }
    }
    Ok(())
}
