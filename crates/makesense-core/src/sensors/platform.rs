//! The operating system's sensor framework, seen as a capability.
//!
//! Nothing in this crate reaches for a global sensor manager. The platform is
//! handed to the page manager as an `Arc<P>` and from there to the pages that
//! need it, so ownership stays explicit and tests can substitute
//! [`VirtualSensorPlatform`](super::VirtualSensorPlatform).

use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;

/// Opaque reference to one physical sensor, only meaningful to the platform
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorHandle(pub u32);

/// Identifies one listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Live metadata of a physical sensor as enumerated by the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorInfo {
    pub handle: SensorHandle,
    pub name: String,
    pub vendor: String,
    pub sensor_type: i32,
    pub version: i32,
    /// Power draw in mA.
    pub power: f32,
    pub resolution: f32,
    pub maximum_range: f32,
}

/// One delivered reading. Axis count and meaning depend on the sensor type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorEvent {
    pub values: Vec<f32>,
}

impl SensorEvent {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

/// Cadence at which the platform pushes events to a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryRate {
    Fastest,
    Game,
    /// Suitable for on-screen values; used by the detail page.
    Ui,
    Normal,
}

impl DeliveryRate {
    pub const fn period(self) -> Duration {
        match self {
            DeliveryRate::Fastest => Duration::from_micros(0),
            DeliveryRate::Game => Duration::from_micros(20_000),
            DeliveryRate::Ui => Duration::from_micros(66_667),
            DeliveryRate::Normal => Duration::from_micros(200_000),
        }
    }
}

/// Receiving end handed to the platform on registration.
///
/// The platform calls `signal` from whatever thread it delivers on; a newer
/// event overwrites one that has not been taken yet.
pub type SensorListener = Arc<Signal<CriticalSectionRawMutex, SensorEvent>>;

pub fn new_listener() -> SensorListener {
    Arc::new(Signal::new())
}

/// Sensor enumeration and event subscription provided by the host platform.
pub trait SensorPlatform {
    /// Every sensor the platform exposes, in platform order.
    fn sensor_list(&self) -> Vec<SensorInfo>;

    /// The default physical sensor for a type identifier, if any.
    fn default_sensor(&self, sensor_type: i32) -> Option<SensorInfo>;

    /// Start delivering events from `sensor` to `listener`.
    ///
    /// Returns `None` when the platform refuses the registration.
    fn register_listener(
        &self,
        sensor: &SensorInfo,
        rate: DeliveryRate,
        listener: SensorListener,
    ) -> Option<ListenerId>;

    /// Stop delivering events for a registration.
    fn unregister_listener(&self, id: ListenerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_rate_is_slower_than_game_rate() {
        assert!(DeliveryRate::Ui.period() > DeliveryRate::Game.period());
        assert!(DeliveryRate::Normal.period() > DeliveryRate::Ui.period());
        assert_eq!(DeliveryRate::Fastest.period().as_micros(), 0);
    }

    #[test]
    fn test_listener_keeps_only_latest_event() {
        let listener = new_listener();
        listener.signal(SensorEvent::new(&[1.0, 2.0, 3.0]));
        listener.signal(SensorEvent::new(&[9.0]));

        assert_eq!(listener.try_take(), Some(SensorEvent::new(&[9.0])));
        assert_eq!(listener.try_take(), None);
    }
}
