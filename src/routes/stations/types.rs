use utoipa::IntoParams;

/// Station attribute filters. Integer and float attributes also accept
/// `_gt` / `_lt` suffixes (strict bounds).
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StationFilters {
    pub station_id: Option<i32>,
    pub short_name: Option<String>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Region id
    pub region: Option<i32>,
    pub capacity: Option<i32>,
    /// Stations with more than this many docks
    pub capacity_gt: Option<i32>,
    /// Stations with fewer than this many docks
    pub capacity_lt: Option<i32>,
    pub electric_bike_surcharge_waiver: Option<bool>,
    pub eightd_has_key_dispenser: Option<bool>,
    pub has_kiosk: Option<bool>,
}
