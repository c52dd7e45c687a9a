use clap::Parser;
use common::config::{ConfigManager, ConfigSerializer, YamlConfigSerializer};
use common::{log, logger};
use omo_server::server_config::{DEFAULT_CONFIG_PATH, ServerConfig};
use omo_server::start_dispatcher;
use omo_server::web_server::{bind, run_web_server};

#[derive(Parser)]
#[command(name = "omo_server", about = "Authoritative server for two-player OMO rooms")]
struct Args {
    /// YAML config file. Missing file means defaults.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Overrides `bind_address` from the config file.
    #[arg(long)]
    bind: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,

    /// Print the effective config as YAML and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("OmoServer".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let mut config: ServerConfig = ConfigManager::from_yaml_file(&args.config).load()?;
    if let Some(bind_address) = args.bind {
        config.bind_address = bind_address;
    }

    if args.print_config {
        print!("{}", YamlConfigSerializer.serialize(&config)?);
        return Ok(());
    }

    let (state, dispatcher_task) = start_dispatcher(&config);
    let (listener, addr) = bind(&config.bind_address).await?;
    log!(
        "OMO server on {} (default grid {}, max grid {}, budget {} msgs/connection)",
        addr, config.default_grid_size, config.max_grid_size, config.message_budget
    );

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        log!("Shutdown signal received");
    };

    run_web_server(listener, state, shutdown_signal).await?;

    if tokio::time::timeout(std::time::Duration::from_secs(2), dispatcher_task)
        .await
        .is_err()
    {
        log!("Dispatcher still busy after shutdown, exiting anyway");
    }

    log!("Server shut down gracefully");

    Ok(())
}
