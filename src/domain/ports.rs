use crate::domain::credential::Credential;
use crate::domain::model::{Home, Zone, ZoneState};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The tado endpoints the service layer depends on.
///
/// Every authenticated call takes the credential explicitly; implementations
/// hold no token state of their own.
#[async_trait]
pub trait TadoApi: Send + Sync {
    async fn fetch_token(&self, username: &str, password: &str) -> Result<Credential>;
    async fn refresh_token(&self, credential: &Credential) -> Result<Credential>;
    async fn fetch_homes(&self, credential: &Credential) -> Result<Vec<Home>>;
    async fn fetch_zones(&self, credential: &Credential, home: &Home) -> Result<Vec<Zone>>;
    async fn fetch_zone_state(&self, credential: &Credential, zone: &Zone) -> Result<ZoneState>;
}
