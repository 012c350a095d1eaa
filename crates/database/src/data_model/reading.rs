use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    reading::{NewReading, Reading},
    station::Station,
};
use sqlx::prelude::FromRow;
use utility::id::Id;
use weather_station::database::{ReadingRepo, Result};

use crate::{
    queries::reading::{get_all, insert_next, insert_placeholder},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct ReadingRow {
    pub station_id: i32,
    pub id: i32,
    pub time: DateTime<Utc>,
    pub weather: i32,
    pub temperature: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub air_pressure: f64,
}

impl DatabaseRow for ReadingRow {
    type Model = Reading;

    fn to_model(self) -> Self::Model {
        Reading {
            id: Id::new(self.id),
            station_id: Id::new(self.station_id),
            time: self.time,
            weather: self.weather,
            temperature: self.temperature,
            wind_speed: self.wind_speed,
            wind_direction: self.wind_direction,
            air_pressure: self.air_pressure,
        }
    }
}

// Repo

#[async_trait]
impl ReadingRepo for PgDatabaseAutocommit {
    async fn add_dummy_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Reading> {
        insert_placeholder(&self.pool, email, station_id).await
    }

    async fn add_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
        reading: NewReading,
    ) -> Result<Option<Reading>> {
        insert_next(&self.pool, email, station_id, reading).await
    }

    async fn readings(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Vec<Reading>> {
        get_all(&self.pool, email, station_id).await
    }
}

#[async_trait]
impl<'a> ReadingRepo for PgDatabaseTransaction<'a> {
    async fn add_dummy_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Reading> {
        insert_placeholder(&mut *self.tx, email, station_id).await
    }

    async fn add_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
        reading: NewReading,
    ) -> Result<Option<Reading>> {
        insert_next(&mut *self.tx, email, station_id, reading).await
    }

    async fn readings(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Vec<Reading>> {
        get_all(&mut *self.tx, email, station_id).await
    }
}
