pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{client::TadoClient, service::TadoService};
pub use crate::domain::{
    credential::Credential,
    model::{AllZonesData, Home, HomeId, Zone, ZoneId, ZoneState},
    ports::TadoApi,
};
pub use crate::utils::error::{Result, TadoError};
