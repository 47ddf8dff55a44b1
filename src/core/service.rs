use crate::domain::credential::Credential;
use crate::domain::model::{AllZonesData, Home, Zone, ZoneState};
use crate::domain::ports::TadoApi;
use crate::utils::error::{IndexKind, Result, TadoError};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

/// Session on top of a [`TadoApi`] that owns a single credential and keeps it
/// valid: a token is fetched on first use and refreshed once it has expired.
///
/// Credential checks are serialized, so a service shared between tasks never
/// refreshes the same token twice.
pub struct TadoService<A: TadoApi> {
    api: A,
    username: String,
    password: String,
    credential: Mutex<Option<Credential>>,
}

impl<A: TadoApi> TadoService<A> {
    pub fn new(api: A, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            api,
            username: username.into(),
            password: password.into(),
            credential: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The credential currently held, if any. Does not validate or refresh it.
    pub async fn credential(&self) -> Option<Credential> {
        self.credential.lock().await.clone()
    }

    /// Returns a usable credential, logging in or refreshing first if needed.
    pub async fn ensure_credentials(&self) -> Result<Credential> {
        let mut slot = self.credential.lock().await;

        if let Some(current) = slot.as_ref() {
            if !current.is_expired() {
                return Ok(current.clone());
            }
        }

        let fresh = match slot.as_ref() {
            None => {
                tracing::debug!("No access token held, logging in as {}", self.username);
                self.api.fetch_token(&self.username, &self.password).await?
            }
            Some(expired) => {
                tracing::debug!("Access token expired at {:?}, refreshing", expired.expires_at());
                self.api.refresh_token(expired).await?
            }
        };

        tracing::info!(
            "Obtained access token valid for {} seconds",
            fresh.lifetime_seconds()
        );
        *slot = Some(fresh.clone());
        Ok(fresh)
    }

    pub async fn get_homes(&self) -> Result<Vec<Home>> {
        let credential = self.ensure_credentials().await?;
        self.api.fetch_homes(&credential).await
    }

    pub async fn get_zones(&self, home: &Home) -> Result<Vec<Zone>> {
        let credential = self.ensure_credentials().await?;
        self.api.fetch_zones(&credential, home).await
    }

    pub async fn get_zone_data(&self, zone: &Zone) -> Result<ZoneState> {
        let credential = self.ensure_credentials().await?;
        self.api.fetch_zone_state(&credential, zone).await
    }

    /// State of the `zone_index`-th zone of the `home_index`-th home, both in
    /// discovery order.
    pub async fn get_zone_data_by_index(
        &self,
        home_index: usize,
        zone_index: usize,
    ) -> Result<ZoneState> {
        self.ensure_credentials().await?;

        let homes = self.get_homes().await?;
        let home = homes.get(home_index).ok_or(TadoError::Index {
            kind: IndexKind::Home,
            index: home_index,
            len: homes.len(),
        })?;

        let zones = self.get_zones(home).await?;
        let zone = zones.get(zone_index).ok_or(TadoError::Index {
            kind: IndexKind::Zone,
            index: zone_index,
            len: zones.len(),
        })?;

        self.get_zone_data(zone).await
    }

    /// State of every zone of every home.
    ///
    /// The credential is validated once before the sweep starts and reused for
    /// every call in it. A token that expires mid-sweep is not refreshed; the
    /// failing call aborts the sweep with an API error.
    pub async fn get_all_zones_data(&self) -> Result<AllZonesData> {
        let credential = self.ensure_credentials().await?;

        let homes = self.api.fetch_homes(&credential).await?;
        let mut data = AllZonesData::new();

        for home in &homes {
            let zones = self.api.fetch_zones(&credential, home).await?;
            let mut states = BTreeMap::new();

            for zone in &zones {
                let state = self.api.fetch_zone_state(&credential, zone).await?;
                states.insert(zone.id, state);
            }

            tracing::debug!("Collected state of {} zones in home {}", states.len(), home.id);
            data.insert(home.id, states);
        }

        Ok(data)
    }
}
