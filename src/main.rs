use clap::Parser;
use tado_client::config::cli::Command;
use tado_client::utils::error::ErrorCategory;
use tado_client::utils::logger;
use tado_client::{CliConfig, TadoClient, TadoService};

async fn run(config: &CliConfig) -> tado_client::Result<String> {
    let account = config.account_config()?;
    let service = account.build_service()?;

    let output = match config.command {
        Command::Homes => serde_json::to_string_pretty(&service.get_homes().await?)?,
        Command::Zones { home } => {
            let zones = zones_of(&service, home).await?;
            serde_json::to_string_pretty(&zones)?
        }
        Command::State { home, zone } => {
            let state = service.get_zone_data_by_index(home, zone).await?;
            serde_json::to_string_pretty(&state)?
        }
        Command::All => serde_json::to_string_pretty(&service.get_all_zones_data().await?)?,
    };

    Ok(output)
}

async fn zones_of(
    service: &TadoService<TadoClient>,
    home_index: usize,
) -> tado_client::Result<Vec<tado_client::Zone>> {
    let homes = service.get_homes().await?;
    let home = homes
        .get(home_index)
        .ok_or(tado_client::TadoError::Index {
            kind: tado_client::utils::error::IndexKind::Home,
            index: home_index,
            len: homes.len(),
        })?;
    service.get_zones(home).await
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI command: {:?}", config.command);

    match run(&config).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("{} (category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.category() {
                ErrorCategory::Configuration => 2,
                ErrorCategory::Authentication => 3,
                ErrorCategory::Network => 4,
                ErrorCategory::Input => 5,
                ErrorCategory::System => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
