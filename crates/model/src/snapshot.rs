use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{reading::Reading, station::Station, WithId};

/// Minimum and maximum values over the whole reading history of a station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadingStats {
    pub min_temp: f64,
    pub max_temp: f64,
    pub min_wind: f64,
    pub max_wind: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
}

impl ReadingStats {
    fn of(reading: &Reading) -> Self {
        Self {
            min_temp: reading.temperature,
            max_temp: reading.temperature,
            min_wind: reading.wind_speed,
            max_wind: reading.wind_speed,
            min_pressure: reading.air_pressure,
            max_pressure: reading.air_pressure,
        }
    }

    fn include(self, reading: &Reading) -> Self {
        Self {
            min_temp: self.min_temp.min(reading.temperature),
            max_temp: self.max_temp.max(reading.temperature),
            min_wind: self.min_wind.min(reading.wind_speed),
            max_wind: self.max_wind.max(reading.wind_speed),
            min_pressure: self.min_pressure.min(reading.air_pressure),
            max_pressure: self.max_pressure.max(reading.air_pressure),
        }
    }

    /// `None` if there are no readings.
    pub fn from_readings<'a, I>(readings: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Reading>,
    {
        let mut readings = readings.into_iter();
        let first = readings.next()?;
        Some(readings.fold(Self::of(first), Self::include))
    }
}

/// The current state of a station: its latest reading, its metadata and the
/// statistics over all of its readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    pub station_id: Id<Station>,
    pub time: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
    #[serde(flatten)]
    pub stats: ReadingStats,
}

impl StationSnapshot {
    /// Builds the snapshot of a station from its readings. Readings of other
    /// stations are ignored. Stations without readings have no snapshot.
    pub fn assemble(station: &WithId<Station>, readings: &[Reading]) -> Option<Self> {
        let own = || readings.iter().filter(|r| r.station_id == station.id);
        let latest = own().max_by_key(|r| r.recency())?;
        let stats = ReadingStats::from_readings(own())?;
        Some(Self {
            station_id: station.id,
            time: latest.time,
            location: station.content.location.clone(),
            latitude: station.content.latitude,
            longitude: station.content.longitude,
            weather: latest.weather,
            temperature: latest.temperature,
            wind_speed: latest.wind_speed,
            wind_direction: latest.wind_direction,
            air_pressure: latest.air_pressure,
            stats,
        })
    }
}
