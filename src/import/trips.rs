//! Trip-history CSV parsing.
//!
//! Rows follow the operator's monthly export: `tripduration`, `starttime`,
//! `stoptime`, `start station id`, `end station id`, `bikeid`, `usertype`,
//! `birth year`, `gender`. Other columns are ignored.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::entity::trips::NewTrip;
use crate::query::parse_timestamp;

#[derive(Debug, Deserialize)]
struct TripRow {
    tripduration: String,
    starttime: String,
    stoptime: String,
    #[serde(rename = "start station id")]
    start_station_id: String,
    #[serde(rename = "end station id")]
    end_station_id: String,
    bikeid: String,
    #[serde(default)]
    usertype: String,
    #[serde(rename = "birth year", default)]
    birth_year: String,
    #[serde(default)]
    gender: String,
}

#[derive(Debug, Default)]
pub struct ParsedTrips {
    pub trips: Vec<NewTrip>,
    /// Rows that could not be read or converted
    pub skipped: usize,
}

fn int(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    raw.parse().ok().or_else(|| {
        // Some exports write durations as "350.0"
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .and_then(|v| i32::try_from(v as i64).ok())
    })
}

impl TripRow {
    fn into_trip(self) -> Option<NewTrip> {
        let birth_year = match self.birth_year.trim() {
            "" | "\\N" | "NULL" => None,
            raw => Some(int(raw)?),
        };

        Some(NewTrip {
            duration: int(&self.tripduration)?,
            start_time: parse_timestamp(self.starttime.trim())?,
            stop_time: parse_timestamp(self.stoptime.trim())?,
            start_station_id: int(&self.start_station_id)?,
            stop_station_id: int(&self.end_station_id)?,
            bike_id: int(&self.bikeid)?,
            is_subscriber: self.usertype.trim().eq_ignore_ascii_case("subscriber"),
            birth_year,
            gender: int(&self.gender).unwrap_or(0),
        })
    }
}

/// Parse every row of a trip CSV. Malformed rows are counted, not fatal.
///
/// # Errors
///
/// Returns an error only when the header row cannot be read.
pub fn parse_trips<R: Read>(reader: R) -> Result<ParsedTrips, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut parsed = ParsedTrips::default();
    for (line, row) in csv_reader.deserialize::<TripRow>().enumerate() {
        match row.ok().and_then(TripRow::into_trip) {
            Some(trip) => parsed.trips.push(trip),
            None => {
                parsed.skipped += 1;
                tracing::debug!(row = line + 1, "Skipping malformed trip row");
            }
        }
    }

    Ok(parsed)
}

/// # Errors
///
/// Returns an error if the file cannot be opened or has no header row.
pub fn parse_trips_file(path: &Path) -> Result<ParsedTrips, csv::Error> {
    let file = std::fs::File::open(path)?;
    parse_trips(file)
}
