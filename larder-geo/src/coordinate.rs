use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use larder::common::Value;
use serde::{Deserialize, Serialize};

use crate::{GeoError, GeoResult};

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two latitude/longitude pairs
/// given in degrees, by the haversine formula.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` a hair past 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// A latitude/longitude pair in degrees with an optional label.
///
/// The label is for diagnostics only and takes no part in equality or
/// hashing. Ranges are not validated: a latitude of 95 is accepted and fed
/// to the distance formula as is. A NaN component counts as a missing
/// coordinate and is rejected wherever a coordinate is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoCoordinate {
            latitude,
            longitude,
            label: None,
        }
    }

    pub fn with_label(latitude: f64, longitude: f64, label: &str) -> Self {
        GeoCoordinate {
            latitude,
            longitude,
            label: Some(label.to_string()),
        }
    }

    /// Builds a coordinate from possibly absent parts.
    ///
    /// # Errors
    ///
    /// Returns [GeoError::MissingCoordinate] naming the first absent part.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> GeoResult<Self> {
        let latitude = latitude.filter(|v| !v.is_nan()).ok_or(GeoError::MissingCoordinate("latitude"))?;
        let longitude = longitude
            .filter(|v| !v.is_nan())
            .ok_or(GeoError::MissingCoordinate("longitude"))?;
        Ok(GeoCoordinate::new(latitude, longitude))
    }

    /// Reads a coordinate from an embedded document holding numeric
    /// `latitude` and `longitude` fields and an optional string `label`.
    pub fn from_value(value: &Value) -> GeoResult<Self> {
        let doc = match value {
            Value::Document(doc) => doc,
            _ => return Err(GeoError::MissingCoordinate("target")),
        };
        let mut coordinate = Self::from_parts(doc.get("latitude").as_f64(), doc.get("longitude").as_f64())?;
        coordinate.label = doc.get("label").as_string().cloned();
        Ok(coordinate)
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// False when either component is NaN.
    #[inline]
    pub fn is_complete(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoCoordinate) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    pub(crate) fn ensure_complete(&self, role: &'static str) -> GeoResult<()> {
        if self.is_complete() {
            Ok(())
        } else {
            log::error!("The {} coordinate {} is incomplete", role, self);
            Err(GeoError::MissingCoordinate(role))
        }
    }

    fn key(&self) -> (u64, u64) {
        (bits(self.latitude), bits(self.longitude))
    }
}

#[inline]
pub(crate) fn bits(value: f64) -> u64 {
    // -0.0 and 0.0 are the same coordinate
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for GeoCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GeoCoordinate {}

impl Hash for GeoCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({}, {})", label, self.latitude, self.longitude),
            None => write!(f, "({}, {})", self.latitude, self.longitude),
        }
    }
}

impl From<&GeoCoordinate> for Value {
    fn from(coordinate: &GeoCoordinate) -> Self {
        let mut doc = larder::store::Document::new();
        doc.put_field("latitude", coordinate.latitude);
        doc.put_field("longitude", coordinate.longitude);
        if let Some(label) = &coordinate.label {
            doc.put_field("label", label.as_str());
        }
        Value::Document(doc)
    }
}
