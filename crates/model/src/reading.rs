use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::station::Station;

/// Id of the reading every station gets on creation. Ids are scoped per
/// station, so every station has a reading with this id.
pub const PLACEHOLDER_READING_ID: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: Id<Reading>,
    pub station_id: Id<Station>,
    pub time: DateTime<Utc>,
    pub weather: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
}

impl HasId for Reading {
    type IdType = i32;
}

impl Reading {
    /// Ordering key for recency. The later reading wins, equal times are
    /// decided by the higher id.
    pub fn recency(&self) -> (DateTime<Utc>, i32) {
        (self.time, self.id.raw())
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.raw() == PLACEHOLDER_READING_ID
    }
}

/// A measurement which is not stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub time: DateTime<Utc>,
    pub weather: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
}

impl NewReading {
    /// The reading inserted together with a new station: all values zero.
    pub fn placeholder(time: DateTime<Utc>) -> Self {
        Self {
            time,
            weather: 0,
            temperature: 0.0,
            wind_speed: 0.0,
            wind_direction: 0.0,
            air_pressure: 0.0,
        }
    }

    pub fn into_reading(self, id: Id<Reading>, station_id: Id<Station>) -> Reading {
        Reading {
            id,
            station_id,
            time: self.time,
            weather: self.weather,
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            air_pressure: self.air_pressure,
        }
    }
}
