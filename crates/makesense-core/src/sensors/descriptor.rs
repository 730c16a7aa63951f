//! Sensor descriptor and its route payload codec.
//!
//! A [`SensorDescriptor`] crosses from the list page to the detail page as a
//! route segment. The payload is the descriptor's JSON form, percent-encoded
//! so that `/`, `{`, `"` and friends never reach the route parser raw.

use log::error;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use super::SensorInfo;

/// Immutable snapshot of one sensor's static metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorDescriptor {
    name: String,
    vendor: String,
    #[serde(rename = "type")]
    sensor_type: i32,
    version: i32,
    power: f32,
    resolution: f32,
    max_range: f32,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("descriptor field `{field}` is not a finite number")]
    NonFinite { field: &'static str },
    #[error("descriptor could not be serialized")]
    Serialization,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("sensor payload is missing")]
    MissingPayload,
    #[error("sensor payload is not valid UTF-8 after percent-decoding")]
    InvalidUtf8,
    #[error("sensor payload is malformed at line {line}, column {column}")]
    Malformed { line: usize, column: usize },
    #[error("sensor payload field `{field}` is out of range")]
    NonFinite { field: &'static str },
}

impl SensorDescriptor {
    pub fn new(
        name: &str,
        vendor: &str,
        sensor_type: i32,
        version: i32,
        power: f32,
        resolution: f32,
        max_range: f32,
    ) -> Self {
        Self {
            name: name.into(),
            vendor: vendor.into(),
            sensor_type,
            version,
            power,
            resolution,
            max_range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn sensor_type(&self) -> i32 {
        self.sensor_type
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    /// Power draw in mA.
    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    pub fn max_range(&self) -> f32 {
        self.max_range
    }

    /// Encode into a route-safe payload.
    pub fn encode(&self) -> Result<String, EncodeError> {
        // JSON has no representation for NaN or infinities; serde_json would
        // quietly write `null` and the payload would never decode.
        if let Some(field) = self.non_finite_field() {
            return Err(EncodeError::NonFinite { field });
        }

        let json = serde_json::to_string(self).map_err(|e| {
            error!("Descriptor serialization failed: {}", e);
            EncodeError::Serialization
        })?;

        Ok(urlencoding::encode(&json).into_owned())
    }

    /// Decode a payload produced by [`encode`](Self::encode).
    ///
    /// Either every field is recovered or an error is returned.
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        if payload.is_empty() {
            return Err(DecodeError::MissingPayload);
        }

        let json = urlencoding::decode(payload).map_err(|_| DecodeError::InvalidUtf8)?;

        let descriptor: Self = serde_json::from_str(&json).map_err(|e| DecodeError::Malformed {
            line: e.line(),
            column: e.column(),
        })?;

        // Numbers beyond f32 range narrow to infinity during parsing.
        if let Some(field) = descriptor.non_finite_field() {
            return Err(DecodeError::NonFinite { field });
        }

        Ok(descriptor)
    }

    /// Wire name of the first float field that is NaN or infinite.
    fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("power", self.power),
            ("resolution", self.resolution),
            ("maxRange", self.max_range),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(field, _)| field)
    }
}

impl From<&SensorInfo> for SensorDescriptor {
    fn from(sensor: &SensorInfo) -> Self {
        Self {
            name: sensor.name.clone(),
            vendor: sensor.vendor.clone(),
            sensor_type: sensor.sensor_type,
            version: sensor.version,
            power: sensor.power,
            resolution: sensor.resolution,
            max_range: sensor.maximum_range,
        }
    }
}
