use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type HomeId = u64;
pub type ZoneId = u64;

/// Raw zone state as returned by the API. Interpreting temperature, humidity
/// or mode fields is left to the caller.
pub type ZoneState = serde_json::Value;

/// Zone state for every zone of every home, keyed by home id then zone id.
pub type AllZonesData = BTreeMap<HomeId, BTreeMap<ZoneId, ZoneState>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Home {
    pub id: HomeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub home_id: HomeId,
}
