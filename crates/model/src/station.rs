use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    id::HasId,
    serde::{CoercionError, LenientNumber},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The owner of the station. One owner may own many stations.
    pub email: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HasId for Station {
    type IdType = i32;
}

impl Station {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email == email
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A station as submitted by a user. Coordinates are not yet validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationForm {
    pub location: String,
    pub latitude: LenientNumber,
    pub longitude: LenientNumber,
}

impl StationForm {
    pub fn new<S, N>(location: S, latitude: N, longitude: N) -> Self
    where
        S: Into<String>,
        N: Into<LenientNumber>,
    {
        Self {
            location: location.into(),
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Coerces the coordinates to numbers. The location is kept verbatim.
    pub fn into_station<S: Into<String>>(
        self,
        email: S,
    ) -> Result<Station, CoercionError> {
        Ok(Station {
            email: email.into(),
            latitude: self.latitude.coerce()?,
            longitude: self.longitude.coerce()?,
            location: self.location,
        })
    }
}
