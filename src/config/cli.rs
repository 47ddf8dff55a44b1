use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "tado-client")]
#[command(about = "Query homes, zones and zone state from the tado cloud API")]
pub struct CliConfig {
    #[arg(long, help = "TOML file with the account settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Account username, overrides the config file")]
    pub username: Option<String>,

    #[arg(long, help = "Account password, overrides the config file")]
    pub password: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the homes of the account
    Homes,
    /// List the zones of a home
    Zones {
        #[arg(long, default_value = "0")]
        home: usize,
    },
    /// Show the state of one zone
    State {
        #[arg(long, default_value = "0")]
        home: usize,
        #[arg(long, default_value = "0")]
        zone: usize,
    },
    /// Show the state of every zone of every home
    All,
}

impl CliConfig {
    /// Merges the config file (if any) with the credentials given on the
    /// command line; the command line wins.
    pub fn account_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => {
                let username = validate_required_field("username", &self.username)?;
                let password = validate_required_field("password", &self.password)?;
                return Ok(TomlConfig::new(username.clone(), password.clone()));
            }
        };

        if let Some(username) = &self.username {
            config.account.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.account.password = password.clone();
        }
        Ok(config)
    }
}
