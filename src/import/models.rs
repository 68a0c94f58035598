//! GBFS feed payloads (`system_regions.json`, `station_information.json`).

use serde::Deserialize;

/// Envelope shared by every GBFS feed.
#[derive(Debug, Clone, Deserialize)]
pub struct GbfsFeed<T> {
    #[serde(default)]
    pub last_updated: Option<i64>,
    #[serde(default)]
    pub ttl: Option<i64>,
    pub data: T,
}

/// Feed ids are strings in GBFS 2.x and numbers in older feeds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FeedId {
    Number(i64),
    Text(String),
}

impl FeedId {
    #[must_use]
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Number(n) => i32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionsData {
    pub regions: Vec<GbfsRegion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GbfsRegion {
    pub region_id: FeedId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationsData {
    pub stations: Vec<GbfsStation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GbfsStation {
    pub station_id: FeedId,
    #[serde(default)]
    pub short_name: Option<String>,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub region_id: Option<FeedId>,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub rental_methods: Vec<String>,
    #[serde(default)]
    pub electric_bike_surcharge_waiver: bool,
    #[serde(default)]
    pub eightd_has_key_dispenser: bool,
    #[serde(default)]
    pub has_kiosk: bool,
}
