use std::{error, result};

use async_trait::async_trait;
use model::{
    reading::{NewReading, Reading},
    snapshot::StationSnapshot,
    station::{Coordinates, Station},
    WithId,
};
use thiserror::Error;
use utility::id::Id;

/// Labels attached to store errors, naming the operation that failed.
pub mod context {
    pub const FETCH_STATION_DATA: &str = "error fetching all stations and its data";
    pub const CREATE_STATION: &str = "error creating station";
    pub const DELETE_STATION: &str = "error deleting station";
    pub const FETCH_LAT_LNG: &str = "error fetching station lat/lng";
    pub const ADD_DUMMY_READING: &str = "error adding dummy reading";
    pub const ADD_READING: &str = "error adding reading";
    pub const FETCH_READINGS: &str = "error fetching readings";
    pub const LOCK_STATION: &str = "error locking station";
    pub const TRANSACTION: &str = "error handling transaction";
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("not found")]
    NotFound,
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: Box<dyn error::Error + Send + Sync>,
    },
}

impl DatabaseError {
    pub fn query<E>(context: &'static str, why: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context,
            source: Box::new(why),
        }
    }

    /// The label of the operation which failed, if known.
    pub fn context(&self) -> Option<&'static str> {
        match self {
            Self::Query { context, .. } => Some(context),
            _ => None,
        }
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait StationRepo {
    /// Returns the current state of every station owned by `email` which has
    /// at least one reading, optionally narrowed to a single station.
    ///
    /// The order of the returned snapshots is undefined. A station not
    /// owned by `email` yields an empty vec.
    async fn station_snapshots(
        &mut self,
        email: &str,
        station_id: Option<&Id<Station>>,
    ) -> Result<Vec<StationSnapshot>>;

    async fn insert_station(&mut self, station: Station) -> Result<WithId<Station>>;

    /// Deletes the station if it is owned by `email`, together with its
    /// readings. Returns the number of deleted stations.
    async fn delete_station(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<u64>;

    async fn station_coordinates(
        &mut self,
        station_id: &Id<Station>,
    ) -> Result<Option<Coordinates>>;

    /// Locks the station of `email` until the surrounding transaction ends,
    /// so readings are appended one after another. Returns `false` if there
    /// is no such station.
    async fn lock_station(&mut self, email: &str, station_id: &Id<Station>) -> Result<bool>;
}

#[async_trait]
pub trait ReadingRepo {
    /// Inserts the placeholder reading of a freshly created station.
    ///
    /// Fails with `DatabaseError::NotFound` if the station is not owned by
    /// `email`.
    async fn add_dummy_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Reading>;

    /// Appends a reading to a station owned by `email`. Returns `None` if there
    /// is no such station.
    async fn add_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
        reading: NewReading,
    ) -> Result<Option<Reading>>;

    /// All readings of a station owned by `email`, newest first.
    async fn readings(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
    ) -> Result<Vec<Reading>>;
}

pub trait DatabaseOperations: StationRepo + ReadingRepo {}

#[async_trait]
pub trait DatabaseTransaction: DatabaseOperations {
    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}

pub trait DatabaseAutocommit: DatabaseOperations {}

/// trait to implement a weather station database.
/// multiple concurrent accesses should be possible by e.g. cloning the database object.
#[async_trait]
pub trait Database: Clone + Send + Sync + Sized {
    type Transaction: DatabaseTransaction + Send;
    type Autocommit: DatabaseAutocommit + Send;

    async fn transaction(&self) -> Result<Self::Transaction>;

    fn auto(&self) -> Self::Autocommit;
}
