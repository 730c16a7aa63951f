/// Well-known sensor type identifiers.
///
/// The numbering follows the Android sensor taxonomy so descriptors taken
/// from a phone keep their meaning. Identifiers outside this table are still
/// valid sensor types; they just have no label or known axis count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SensorKind {
    Accelerometer = 1,
    MagneticField = 2,
    Gyroscope = 4,
    Light = 5,
    Pressure = 6,
    Proximity = 8,
    Gravity = 9,
    LinearAcceleration = 10,
    RotationVector = 11,
    RelativeHumidity = 12,
    AmbientTemperature = 13,
}

impl SensorKind {
    pub const ALL: [SensorKind; 11] = [
        SensorKind::Accelerometer,
        SensorKind::MagneticField,
        SensorKind::Gyroscope,
        SensorKind::Light,
        SensorKind::Pressure,
        SensorKind::Proximity,
        SensorKind::Gravity,
        SensorKind::LinearAcceleration,
        SensorKind::RotationVector,
        SensorKind::RelativeHumidity,
        SensorKind::AmbientTemperature,
    ];

    pub fn from_type(sensor_type: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_id() == sensor_type)
    }

    pub const fn type_id(self) -> i32 {
        self as i32
    }

    pub const fn label(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "Accelerometer",
            SensorKind::MagneticField => "Magnetic Field",
            SensorKind::Gyroscope => "Gyroscope",
            SensorKind::Light => "Light",
            SensorKind::Pressure => "Pressure",
            SensorKind::Proximity => "Proximity",
            SensorKind::Gravity => "Gravity",
            SensorKind::LinearAcceleration => "Linear Acceleration",
            SensorKind::RotationVector => "Rotation Vector",
            SensorKind::RelativeHumidity => "Relative Humidity",
            SensorKind::AmbientTemperature => "Ambient Temperature",
        }
    }

    /// Number of values carried by each event of this kind.
    pub const fn value_count(self) -> usize {
        match self {
            SensorKind::Accelerometer
            | SensorKind::MagneticField
            | SensorKind::Gyroscope
            | SensorKind::Gravity
            | SensorKind::LinearAcceleration => 3,
            SensorKind::RotationVector => 5,
            SensorKind::Light
            | SensorKind::Pressure
            | SensorKind::Proximity
            | SensorKind::RelativeHumidity
            | SensorKind::AmbientTemperature => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_type_round_trips_every_kind() {
        for kind in SensorKind::ALL {
            assert_eq!(SensorKind::from_type(kind.type_id()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_type_has_no_kind() {
        assert_eq!(SensorKind::from_type(3), None);
        assert_eq!(SensorKind::from_type(65_536), None);
        assert_eq!(SensorKind::from_type(-1), None);
    }

    #[test]
    fn test_value_counts() {
        assert_eq!(SensorKind::Accelerometer.value_count(), 3);
        assert_eq!(SensorKind::RotationVector.value_count(), 5);
        assert_eq!(SensorKind::Light.value_count(), 1);
    }
}
