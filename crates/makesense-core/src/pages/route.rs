//! Route paths between pages.
//!
//! Two routes exist: the sensor list (start) and the sensor detail page,
//! which carries an encoded [`SensorDescriptor`] as its single segment:
//!
//! ```text
//! sensorList
//! sensorDetail/{payload}
//! ```

use thiserror_no_std::Error;

use crate::sensors::{EncodeError, SensorDescriptor};

const SENSOR_LIST_PATH: &str = "sensorList";
const SENSOR_DETAIL_PATH: &str = "sensorDetail";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SensorList,
    /// `payload` is produced by [`SensorDescriptor::encode`] and is only
    /// decoded when the detail page is built.
    SensorDetail { payload: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("no route matches '{0}'")]
    UnknownRoute(String),
}

impl Route {
    pub fn sensor_detail(descriptor: &SensorDescriptor) -> Result<Self, EncodeError> {
        Ok(Route::SensorDetail {
            payload: descriptor.encode()?,
        })
    }

    pub fn path(&self) -> String {
        match self {
            Route::SensorList => SENSOR_LIST_PATH.into(),
            Route::SensorDetail { payload } => format!("{SENSOR_DETAIL_PATH}/{payload}"),
        }
    }

    /// Parse a route path. A detail path without a payload parses; the
    /// missing payload surfaces when the page decodes it.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let path = path.trim_start_matches('/');

        if path == SENSOR_LIST_PATH {
            return Ok(Route::SensorList);
        }

        match path.strip_prefix(SENSOR_DETAIL_PATH) {
            Some("") => Ok(Route::SensorDetail {
                payload: String::new(),
            }),
            Some(rest) => match rest.strip_prefix('/') {
                Some(payload) => Ok(Route::SensorDetail {
                    payload: payload.into(),
                }),
                None => Err(RouteError::UnknownRoute(path.into())),
            },
            None => Err(RouteError::UnknownRoute(path.into())),
        }
    }
}
