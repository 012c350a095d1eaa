use async_trait::async_trait;
use model::{
    snapshot::StationSnapshot,
    station::{Coordinates, Station},
    WithId,
};
use sqlx::prelude::FromRow;
use utility::id::Id;
use weather_station::database::{Result, StationRepo};

use crate::{
    queries::station::{delete, get_coordinates, get_snapshots, insert, lock},
    PgDatabaseAutocommit, PgDatabaseTransaction,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct StationRow {
    pub id: i32,
    pub email: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl DatabaseRow for StationRow {
    type Model = WithId<Station>;

    fn to_model(self) -> Self::Model {
        WithId::new(
            Id::new(self.id),
            Station {
                email: self.email,
                location: self.location,
                latitude: self.latitude,
                longitude: self.longitude,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct CoordinatesRow {
    pub latitude: f64,
    pub longitude: f64,
}

impl DatabaseRow for CoordinatesRow {
    type Model = Coordinates;

    fn to_model(self) -> Self::Model {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

// Repo

#[async_trait]
impl StationRepo for PgDatabaseAutocommit {
    async fn station_snapshots(
        &mut self,
        email: &str,
        station_id: Option<&Id<Station>>,
    ) -> Result<Vec<StationSnapshot>> {
        get_snapshots(&self.pool, email, station_id).await
    }

    async fn insert_station(&mut self, station: Station) -> Result<WithId<Station>> {
        insert(&self.pool, station).await
    }

    async fn delete_station(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<u64> {
        delete(&self.pool, email, station_id).await
    }

    async fn station_coordinates(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Option<Coordinates>> {
        get_coordinates(&self.pool, station_id).await
    }

    async fn lock_station(&mut self, email: &str, station_id: &Id<Station>) -> Result<bool> {
        lock(&self.pool, email, station_id).await
    }
}

#[async_trait]
impl<'a> StationRepo for PgDatabaseTransaction<'a> {
    async fn station_snapshots(
        &mut self,
        email: &str,
        station_id: Option<&Id<Station>>,
    ) -> Result<Vec<StationSnapshot>> {
        get_snapshots(&mut *self.tx, email, station_id).await
    }

    async fn insert_station(&mut self, station: Station) -> Result<WithId<Station>> {
        insert(&mut *self.tx, station).await
    }

    async fn delete_station(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<u64> {
        delete(&mut *self.tx, email, station_id).await
    }

    async fn station_coordinates(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Option<Coordinates>> {
        get_coordinates(&mut *self.tx, station_id).await
    }

    async fn lock_station(&mut self, email: &str, station_id: &Id<Station>) -> Result<bool> {
        lock(&mut *self.tx, email, station_id).await
    }
}
