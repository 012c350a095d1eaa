use model::{
    snapshot::StationSnapshot,
    station::{Coordinates, Station},
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};
use weather_station::database::{context, Result};

use crate::data_model::{
    snapshot::StationSnapshotRow,
    station::{CoordinatesRow, StationRow},
    to_models, DatabaseRow as _,
};

use super::{convert_error, StationDataQuery};

pub async fn get_snapshots<'c, E>(
    executor: E,
    email: &str,
    station_id: Option<&Id<Station>>,
) -> Result<Vec<StationSnapshot>>
where
    E: Executor<'c, Database = Postgres>,
{
    let sql = StationDataQuery::new()
        .single_station(station_id.is_some())
        .sql();

    let mut query = sqlx::query_as::<Postgres, StationSnapshotRow>(&sql).bind(email);
    if let Some(station_id) = station_id {
        query = query.bind(station_id.raw());
    }

    query
        .fetch_all(executor)
        .await
        .map_err(convert_error(context::FETCH_STATION_DATA))?
        .let_owned(|rows| Ok(to_models(rows)))
}

pub async fn insert<'c, E>(executor: E, station: Station) -> Result<WithId<Station>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO stations(
            email,
            location,
            latitude,
            longitude
        )
        VALUES ($1, $2, $3, $4)
        RETURNING id, email, location, latitude, longitude;
        ",
    )
    .bind(station.email)
    .bind(station.location)
    .bind(station.latitude)
    .bind(station.longitude)
    .fetch_one(executor)
    .await
    .map_err(convert_error(context::CREATE_STATION))
    .map(|row: StationRow| row.to_model())
}

/// Readings are removed by the foreign key cascade.
pub async fn delete<'c, E>(
    executor: E,
    email: &str,
    station_id: &Id<Station>,
) -> Result<u64>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        DELETE FROM
            stations
        WHERE
            id = $1 AND email = $2;
        ",
    )
    .bind(station_id.raw())
    .bind(email)
    .execute(executor)
    .await
    .map_err(convert_error(context::DELETE_STATION))
    .map(|result| result.rows_affected())
}

pub async fn get_coordinates<'c, E>(
    executor: E,
    station_id: &Id<Station>,
) -> Result<Option<Coordinates>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            latitude, longitude
        FROM
            stations
        WHERE
            id = $1;
        ",
    )
    .bind(station_id.raw())
    .fetch_optional(executor)
    .await
    .map_err(convert_error(context::FETCH_LAT_LNG))
    .map(|row: Option<CoordinatesRow>| row.map(CoordinatesRow::to_model))
}

/// `FOR UPDATE` on the station row. Only meaningful inside a transaction.
pub async fn lock<'c, E>(executor: E, email: &str, station_id: &Id<Station>) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query(
        "
        SELECT
            id
        FROM
            stations
        WHERE
            id = $1 AND email = $2
        FOR UPDATE;
        ",
    )
    .bind(station_id.raw())
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(convert_error(context::LOCK_STATION))
    .map(|row| row.is_some())
}
