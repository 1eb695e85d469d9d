use clap::Parser;
use note_bridge::config::LogFormat;
use note_bridge::utils::{logger, validation::Validate};
use note_bridge::{
    AppState, CliConfig, ConnectionManager, LinkState, MemoryLink, MemoryOpener, NoteBridge,
    SerialPortOpener, TomlConfig,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting note-bridge");

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => TomlConfig::default(),
    };
    config.apply_overrides(&cli);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::debug!("Config: {:?}", config);

    let settings = config.link_settings();
    let link = if cli.dry_run {
        tracing::info!(
            "🔧 Dry run, commands are logged instead of written to {}",
            settings.port
        );
        ConnectionManager::new(MemoryOpener::new(MemoryLink::echoing()))
            .with_timeout(settings.timeout)
            .get_connection(&settings.port, settings.baud_rate)
    } else {
        ConnectionManager::new(SerialPortOpener::new())
            .with_timeout(settings.timeout)
            .get_connection(&settings.port, settings.baud_rate)
    };

    if let LinkState::Unavailable { reason } = &link {
        tracing::warn!(
            "Serving without a serial connection, every note will fail: {}",
            reason
        );
    }

    let bridge = NoteBridge::new(link)
        .with_profile(config.serial.profile)
        .with_settle_delay(config.post_write_delay());
    let state = AppState::new(bridge).with_error_details(config.server.expose_error_details);

    let listener = TcpListener::bind(config.listen_addr()?).await?;
    note_bridge::serve(listener, state, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down");
        }
    })
    .await?;

    Ok(())
}
