use model::{
    reading::{NewReading, Reading},
    snapshot::StationSnapshot,
    station::{Coordinates, Station, StationForm},
};
use thiserror::Error;
use utility::{id::Id, serde::CoercionError};

use crate::database::{
    Database, DatabaseError, DatabaseTransaction, ReadingRepo, Result, StationRepo,
};

#[derive(Debug, Error)]
pub enum CreateStationError {
    #[error("invalid station: {0}")]
    InvalidInput(#[from] CoercionError),
    #[error("station store unavailable: {0}")]
    StoreUnavailable(#[source] DatabaseError),
    /// The station was inserted but its placeholder reading was not, so the
    /// whole creation was rolled back.
    #[error("could not add placeholder reading: {0}")]
    PlaceholderReading(#[source] DatabaseError),
}

impl CreateStationError {
    /// Whether trying again with the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}

/// Entry point for everything a user can do with their stations.
///
/// Every operation is scoped to the email of the owning user, except
/// `station_lat_lng` which only exposes coordinates.
#[derive(Debug, Clone)]
pub struct StationQueryService<D>
where
    D: Database,
{
    database: D,
}

impl<D> StationQueryService<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Latest reading, metadata and min/max statistics of every station of
    /// `email` which has readings. With `station_id` set, at most that one
    /// station is returned.
    pub async fn station_data(
        &self,
        email: &str,
        station_id: Option<Id<Station>>,
    ) -> Result<Vec<StationSnapshot>> {
        let snapshots = self
            .database
            .auto()
            .station_snapshots(email, station_id.as_ref())
            .await?;
        log::debug!(
            "fetched {} station snapshot(s) for {} (station filter: {:?})",
            snapshots.len(),
            email,
            station_id
        );
        Ok(snapshots)
    }

    /// Creates a station together with its placeholder reading, so it shows
    /// up in `station_data` right away. Either both rows are stored or none.
    pub async fn create_station(
        &self,
        email: &str,
        form: StationForm,
    ) -> std::result::Result<Id<Station>, CreateStationError> {
        let station = form.into_station(email)?;

        let mut tx = self
            .database
            .transaction()
            .await
            .map_err(CreateStationError::StoreUnavailable)?;

        let created = match tx.insert_station(station).await {
            Ok(created) => created,
            Err(why) => {
                rollback(tx).await;
                return Err(CreateStationError::StoreUnavailable(why));
            }
        };

        if let Err(why) = tx.add_dummy_reading(email, &created.id).await {
            rollback(tx).await;
            return Err(CreateStationError::PlaceholderReading(why));
        }

        tx.commit()
            .await
            .map_err(CreateStationError::StoreUnavailable)?;

        log::debug!("created station {} for {}", created.id, email);
        Ok(created.id)
    }

    /// `create_station` reduced to success or failure. The error is logged.
    pub async fn create_station_ok(&self, email: &str, form: StationForm) -> bool {
        match self.create_station(email, form).await {
            Ok(_) => true,
            Err(why) => {
                log::warn!("could not create station for {}: {}", email, why);
                false
            }
        }
    }

    /// Deletes a station of `email` and its readings. Deleting a station that
    /// does not exist, or belongs to someone else, does nothing.
    pub async fn delete_station(&self, email: &str, station_id: Id<Station>) -> Result<()> {
        let deleted = self
            .database
            .auto()
            .delete_station(email, &station_id)
            .await?;
        if deleted == 0 {
            log::debug!("no station {} of {} to delete", station_id, email);
        }
        Ok(())
    }

    pub async fn station_lat_lng(
        &self,
        station_id: Id<Station>,
    ) -> Result<Option<Coordinates>> {
        self.database.auto().station_coordinates(&station_id).await
    }

    /// Records a new reading. Returns `None` if `email` owns no such station.
    ///
    /// Holds the station lock while the next reading id is picked, so
    /// concurrent calls for one station do not hand out the same id.
    pub async fn add_reading(
        &self,
        email: &str,
        station_id: Id<Station>,
        reading: NewReading,
    ) -> Result<Option<Reading>> {
        let mut tx = self.database.transaction().await?;

        match tx.lock_station(email, &station_id).await {
            Ok(true) => {}
            Ok(false) => {
                rollback(tx).await;
                return Ok(None);
            }
            Err(why) => {
                rollback(tx).await;
                return Err(why);
            }
        }

        let added = match tx.add_reading(email, &station_id, reading).await {
            Ok(added) => added,
            Err(why) => {
                rollback(tx).await;
                return Err(why);
            }
        };

        tx.commit().await?;
        Ok(added)
    }

    pub async fn station_readings(
        &self,
        email: &str,
        station_id: Id<Station>,
    ) -> Result<Vec<Reading>> {
        self.database.auto().readings(email, &station_id).await
    }
}

async fn rollback<T: DatabaseTransaction>(tx: T) {
    if let Err(why) = tx.rollback().await {
        log::error!("rollback failed: {}", why);
    }
}
