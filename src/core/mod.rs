pub mod client;
pub mod service;

pub use crate::domain::credential::Credential;
pub use crate::domain::model::{AllZonesData, Home, HomeId, Zone, ZoneId, ZoneState};
pub use crate::domain::ports::TadoApi;
pub use crate::utils::error::Result;
