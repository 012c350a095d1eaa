use chrono::Utc;
use model::{
    reading::{NewReading, Reading, PLACEHOLDER_READING_ID},
    station::Station,
};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};
use weather_station::database::{context, Result};

use crate::data_model::{reading::ReadingRow, to_models, DatabaseRow as _};

use super::convert_error;

/// Inserts the placeholder reading for a station owned by `email`.
/// Fails with `NotFound` if there is no such station.
pub async fn insert_placeholder<'c, E>(
    executor: E,
    email: &str,
    station_id: &Id<Station>,
) -> Result<Reading>
where
    E: Executor<'c, Database = Postgres>,
{
    let placeholder = NewReading::placeholder(Utc::now());
    sqlx::query_as(
        "
        INSERT INTO readings(
            station_id,
            id,
            time,
            weather,
            temperature,
            wind_speed,
            wind_direction,
            air_pressure
        )
        SELECT
            s.id, $3, $4, $5, $6, $7, $8, $9
        FROM
            stations AS s
        WHERE
            s.id = $1 AND s.email = $2
        RETURNING
            station_id, id, time, weather, temperature,
            wind_speed, wind_direction, air_pressure;
        ",
    )
    .bind(station_id.raw())
    .bind(email)
    .bind(PLACEHOLDER_READING_ID)
    .bind(placeholder.time)
    .bind(placeholder.weather)
    .bind(placeholder.temperature)
    .bind(placeholder.wind_speed)
    .bind(placeholder.wind_direction)
    .bind(placeholder.air_pressure)
    .fetch_one(executor)
    .await
    .map_err(convert_error(context::ADD_DUMMY_READING))
    .map(|row: ReadingRow| row.to_model())
}

/// Appends a reading with the next free id of its station. Returns `None` if
/// `email` owns no station with that id.
///
/// Ids above the placeholder id are handed out even if the placeholder is
/// missing. Two concurrent calls for one station pick the same id unless the
/// station is locked first, see `station::lock`.
pub async fn insert_next<'c, E>(
    executor: E,
    email: &str,
    station_id: &Id<Station>,
    reading: NewReading,
) -> Result<Option<Reading>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO readings(
            station_id,
            id,
            time,
            weather,
            temperature,
            wind_speed,
            wind_direction,
            air_pressure
        )
        SELECT
            s.id, GREATEST(COALESCE(MAX(r.id), 0), $9) + 1, $3, $4, $5, $6, $7, $8
        FROM
            stations AS s
            LEFT JOIN readings AS r ON r.station_id = s.id
        WHERE
            s.id = $1 AND s.email = $2
        GROUP BY
            s.id
        RETURNING
            station_id, id, time, weather, temperature,
            wind_speed, wind_direction, air_pressure;
        ",
    )
    .bind(station_id.raw())
    .bind(email)
    .bind(reading.time)
    .bind(reading.weather)
    .bind(reading.temperature)
    .bind(reading.wind_speed)
    .bind(reading.wind_direction)
    .bind(reading.air_pressure)
    .bind(PLACEHOLDER_READING_ID)
    .fetch_optional(executor)
    .await
    .map_err(convert_error(context::ADD_READING))
    .map(|row: Option<ReadingRow>| row.map(ReadingRow::to_model))
}

pub async fn get_all<'c, E>(
    executor: E,
    email: &str,
    station_id: &Id<Station>,
) -> Result<Vec<Reading>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            r.station_id, r.id, r.time, r.weather, r.temperature,
            r.wind_speed, r.wind_direction, r.air_pressure
        FROM
            readings AS r
            JOIN stations AS s ON s.id = r.station_id
        WHERE
            r.station_id = $1 AND s.email = $2
        ORDER BY
            r.time DESC, r.id DESC;
        ",
    )
    .bind(station_id.raw())
    .bind(email)
    .fetch_all(executor)
    .await
    .map_err(convert_error(context::FETCH_READINGS))?
    .let_owned(|rows: Vec<ReadingRow>| Ok(to_models(rows)))
}
