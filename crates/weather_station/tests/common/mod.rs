//! An in-memory `Database` with switchable faults, so the service can be
//! exercised without a running PostgreSQL.

use std::{
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::Utc;
use model::{
    reading::{NewReading, Reading, PLACEHOLDER_READING_ID},
    snapshot::StationSnapshot,
    station::{Coordinates, Station},
    WithId,
};
use utility::id::Id;
use weather_station::database::{
    context, Database, DatabaseAutocommit, DatabaseError, DatabaseOperations,
    DatabaseTransaction, ReadingRepo, Result, StationRepo,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_station_id: i32,
    stations: Vec<WithId<Station>>,
    readings: Vec<Reading>,
}

#[derive(Debug, Default)]
pub struct Faults {
    pub offline: bool,
    pub placeholder_fails: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<MemoryState>>,
    pub faults: Arc<Mutex<Faults>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    pub fn station_count(&self) -> usize {
        self.state.lock().unwrap().stations.len()
    }

    pub fn reading_count(&self) -> usize {
        self.state.lock().unwrap().readings.len()
    }

    /// Inserts a station bypassing the service, i.e. without placeholder.
    pub fn insert_bare_station(&self, station: Station) -> Id<Station> {
        self.state.lock().unwrap().insert_station(station).id
    }

    fn check(&self, context: &'static str) -> Result<()> {
        if self.faults.lock().unwrap().offline {
            Err(DatabaseError::query(
                context,
                io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
            ))
        } else {
            Ok(())
        }
    }
}

impl MemoryState {
    fn owned(&self, email: &str, station_id: &Id<Station>) -> Option<&WithId<Station>> {
        self.stations
            .iter()
            .find(|s| s.id == *station_id && s.content.is_owned_by(email))
    }

    fn snapshots(&self, email: &str, station_id: Option<&Id<Station>>) -> Vec<StationSnapshot> {
        self.stations
            .iter()
            .filter(|s| s.content.is_owned_by(email))
            .filter(|s| station_id.map_or(true, |id| s.id == *id))
            .filter_map(|s| StationSnapshot::assemble(s, &self.readings))
            .collect()
    }

    fn insert_station(&mut self, station: Station) -> WithId<Station> {
        self.next_station_id += 1;
        let created = WithId::new(Id::new(self.next_station_id), station);
        self.stations.push(created.clone());
        created
    }

    fn delete_station(&mut self, email: &str, station_id: &Id<Station>) -> u64 {
        let before = self.stations.len();
        self.stations
            .retain(|s| !(s.id == *station_id && s.content.is_owned_by(email)));
        let deleted = (before - self.stations.len()) as u64;
        if deleted > 0 {
            self.readings.retain(|r| r.station_id != *station_id);
        }
        deleted
    }

    fn insert_reading(
        &mut self,
        email: &str,
        station_id: &Id<Station>,
        id: Option<i32>,
        reading: NewReading,
    ) -> Option<Reading> {
        self.owned(email, station_id)?;
        let id = id.unwrap_or_else(|| {
            self.readings
                .iter()
                .filter(|r| r.station_id == *station_id)
                .map(|r| r.id.raw())
                .max()
                .unwrap_or(0)
                .max(PLACEHOLDER_READING_ID)
                + 1
        });
        let reading = reading.into_reading(Id::new(id), *station_id);
        self.readings.push(reading.clone());
        Some(reading)
    }

    fn readings(&self, email: &str, station_id: &Id<Station>) -> Vec<Reading> {
        if self.owned(email, station_id).is_none() {
            return Vec::new();
        }
        let mut readings = self
            .readings
            .iter()
            .filter(|r| r.station_id == *station_id)
            .cloned()
            .collect::<Vec<_>>();
        readings.sort_by(|a, b| b.recency().cmp(&a.recency()));
        readings
    }
}

/// Runs `f` against the state a repo operates on.
trait WithState {
    fn database(&self) -> &MemoryDatabase;
    fn with_state<R>(&mut self, f: impl FnOnce(&mut MemoryState) -> R) -> R;
}

pub struct MemoryAutocommit {
    database: MemoryDatabase,
}

impl WithState for MemoryAutocommit {
    fn database(&self) -> &MemoryDatabase {
        &self.database
    }

    fn with_state<R>(&mut self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        f(&mut self.database.state.lock().unwrap())
    }
}

/// Works on a copy of the state, which replaces the shared state on commit.
pub struct MemoryTransaction {
    database: MemoryDatabase,
    working: MemoryState,
}

impl WithState for MemoryTransaction {
    fn database(&self) -> &MemoryDatabase {
        &self.database
    }

    fn with_state<R>(&mut self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        f(&mut self.working)
    }
}

/// Both executors share one implementation on top of `WithState`.
macro_rules! memory_repos {
    ($target:ty) => {
        #[async_trait]
        impl StationRepo for $target {
            async fn station_snapshots(
                &mut self,
                email: &str,
                station_id: Option<&Id<Station>>,
            ) -> Result<Vec<StationSnapshot>> {
                self.database().check(context::FETCH_STATION_DATA)?;
                Ok(self.with_state(|state| state.snapshots(email, station_id)))
            }

            async fn insert_station(&mut self, station: Station) -> Result<WithId<Station>> {
                self.database().check(context::CREATE_STATION)?;
                Ok(self.with_state(|state| state.insert_station(station)))
            }

            async fn delete_station(
                &mut self,
                email: &str,
                station_id: &Id<Station>,
            ) -> Result<u64> {
                self.database().check(context::DELETE_STATION)?;
                Ok(self.with_state(|state| state.delete_station(email, station_id)))
            }

            async fn station_coordinates(
                &mut self,
                station_id: &Id<Station>,
            ) -> Result<Option<Coordinates>> {
                self.database().check(context::FETCH_LAT_LNG)?;
                Ok(self.with_state(|state| {
                    state
                        .stations
                        .iter()
                        .find(|s| s.id == *station_id)
                        .map(|s| s.content.coordinates())
                }))
            }

            async fn lock_station(
                &mut self,
                email: &str,
                station_id: &Id<Station>,
            ) -> Result<bool> {
                self.database().check(context::LOCK_STATION)?;
                Ok(self.with_state(|state| state.owned(email, station_id).is_some()))
            }
        }

        #[async_trait]
        impl ReadingRepo for $target {
            async fn add_dummy_reading(
                &mut self,
                email: &str,
                station_id: &Id<Station>,
            ) -> Result<Reading> {
                self.database().check(context::ADD_DUMMY_READING)?;
                if self.database().faults.lock().unwrap().placeholder_fails {
                    return Err(DatabaseError::query(
                        context::ADD_DUMMY_READING,
                        io::Error::new(io::ErrorKind::Other, "disk full"),
                    ));
                }
                self.with_state(|state| {
                    state.insert_reading(
                        email,
                        station_id,
                        Some(PLACEHOLDER_READING_ID),
                        NewReading::placeholder(Utc::now()),
                    )
                })
                .ok_or(DatabaseError::NotFound)
            }

            async fn add_reading(
                &mut self,
                email: &str,
                station_id: &Id<Station>,
                reading: NewReading,
            ) -> Result<Option<Reading>> {
                self.database().check(context::ADD_READING)?;
                Ok(self.with_state(|state| state.insert_reading(email, station_id, None, reading)))
            }

            async fn readings(
                &mut self,
                email: &str,
                station_id: &Id<Station>,
            ) -> Result<Vec<Reading>> {
                self.database().check(context::FETCH_READINGS)?;
                Ok(self.with_state(|state| state.readings(email, station_id)))
            }
        }
    };
}

memory_repos!(MemoryAutocommit);
memory_repos!(MemoryTransaction);

impl DatabaseOperations for MemoryAutocommit {}

impl DatabaseOperations for MemoryTransaction {}

impl DatabaseAutocommit for MemoryAutocommit {}

#[async_trait]
impl DatabaseTransaction for MemoryTransaction {
    async fn commit(self) -> Result<()> {
        self.database.check(context::TRANSACTION)?;
        *self.database.state.lock().unwrap() = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Database for MemoryDatabase {
    type Transaction = MemoryTransaction;
    type Autocommit = MemoryAutocommit;

    async fn transaction(&self) -> Result<Self::Transaction> {
        self.check(context::TRANSACTION)?;
        let working = self.state.lock().unwrap().clone();
        Ok(MemoryTransaction {
            database: self.clone(),
            working,
        })
    }

    fn auto(&self) -> Self::Autocommit {
        MemoryAutocommit {
            database: self.clone(),
        }
    }
}
