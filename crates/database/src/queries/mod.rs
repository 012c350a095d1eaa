use weather_station::database::DatabaseError;

pub mod reading;
pub mod station;

/// Maps a sqlx error to a `DatabaseError` labelled with `context`.
pub(crate) fn convert_error(
    context: &'static str,
) -> impl Fn(sqlx::Error) -> DatabaseError {
    move |why| match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        _ => DatabaseError::query(context, why),
    }
}

/// Builds the statement returning the current state of the stations of one
/// owner: latest reading, station metadata and min/max over all readings.
///
/// Binds `$1` to the owner's email and, with a station filter, `$2` to the
/// station id. The result has no defined order.
#[derive(Debug, Clone, Copy, Default)]
pub struct StationDataQuery {
    station_filter: bool,
}

impl StationDataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows the result to the station bound to `$2`.
    pub fn single_station(mut self, enabled: bool) -> Self {
        self.station_filter = enabled;
        self
    }

    pub fn sql(&self) -> String {
        let mut query = String::from(
            "
        SELECT
            s.id AS station_id, r.time, s.location, s.latitude, s.longitude,
            r.weather, r.temperature, r.wind_speed, r.wind_direction, r.air_pressure,
            sc.min_temp, sc.max_temp, sc.min_wind, sc.max_wind,
            sc.min_pressure, sc.max_pressure
        FROM
            stations AS s
        JOIN (
            SELECT DISTINCT ON (lr.station_id)
                lr.station_id, lr.time, lr.weather, lr.temperature,
                lr.wind_speed, lr.wind_direction, lr.air_pressure
            FROM
                readings AS lr
                JOIN stations AS ls ON ls.id = lr.station_id
            WHERE
                ls.email = $1
            ORDER BY
                lr.station_id, lr.time DESC, lr.id DESC
        ) AS r ON r.station_id = s.id
        JOIN (
            SELECT
                sr.station_id,
                MIN(sr.temperature) AS min_temp, MAX(sr.temperature) AS max_temp,
                MIN(sr.wind_speed) AS min_wind, MAX(sr.wind_speed) AS max_wind,
                MIN(sr.air_pressure) AS min_pressure, MAX(sr.air_pressure) AS max_pressure
            FROM
                stations AS ss
                JOIN readings AS sr ON ss.id = sr.station_id
            WHERE
                ss.email = $1
            GROUP BY
                sr.station_id
        ) AS sc ON sc.station_id = s.id
        WHERE
            s.email = $1",
        );
        if self.station_filter {
            query.push_str(" AND s.id = $2");
        }
        query.push(';');
        query
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn owner_query_binds_only_the_email() {
        let sql = StationDataQuery::new().sql();
        assert!(sql.contains("s.email = $1"));
        assert!(!sql.contains("$2"));
        assert!(sql.trim_end().ends_with(';'));
    }

    #[test]
    fn single_station_query_filters_on_second_parameter() {
        let sql = StationDataQuery::new().single_station(true).sql();
        assert!(sql.contains("s.email = $1 AND s.id = $2;"));
    }

    #[test]
    fn latest_reading_is_picked_once_per_station() {
        let sql = StationDataQuery::new().sql();
        assert!(sql.contains("DISTINCT ON (lr.station_id)"));
        assert!(sql.contains("lr.time DESC, lr.id DESC"));
        assert!(sql.contains("GROUP BY"));
    }

    #[test]
    fn result_order_is_left_to_the_store() {
        let sql = StationDataQuery::new().sql();
        let outer = &sql[sql.rfind(") AS sc").unwrap()..];
        assert!(!outer.contains("ORDER BY"));
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let why = convert_error("error fetching station lat/lng")(sqlx::Error::RowNotFound);
        assert!(matches!(why, DatabaseError::NotFound));
    }

    #[test]
    fn other_errors_keep_their_context() {
        let why = convert_error("error deleting station")(sqlx::Error::PoolTimedOut);
        assert_eq!(why.context(), Some("error deleting station"));
        assert!(why.source().is_some());
        assert!(why.to_string().starts_with("error deleting station: "));
    }
}
