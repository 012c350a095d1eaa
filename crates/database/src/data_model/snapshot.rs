use chrono::{DateTime, Utc};
use model::snapshot::{ReadingStats, StationSnapshot};
use sqlx::prelude::FromRow;
use utility::id::Id;

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct StationSnapshotRow {
    pub station_id: i32,
    pub time: DateTime<Utc>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weather: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub min_wind: f64,
    pub max_wind: f64,
    pub min_pressure: f64,
    pub max_pressure: f64,
}

impl DatabaseRow for StationSnapshotRow {
    type Model = StationSnapshot;

    fn to_model(self) -> Self::Model {
        StationSnapshot {
            station_id: Id::new(self.station_id),
            time: self.time,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            weather: self.weather,
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            air_pressure: self.air_pressure,
            stats: ReadingStats {
                min_temp: self.min_temp,
                max_temp: self.max_temp,
                min_wind: self.min_wind,
                max_wind: self.max_wind,
                min_pressure: self.min_pressure,
                max_pressure: self.max_pressure,
            },
        }
    }
}
