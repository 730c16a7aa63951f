//! An in-process sensor platform.
//!
//! [`VirtualSensorPlatform`] stands in for the operating system's sensor
//! framework in tests and in the desktop simulator. It exposes a fixed sensor
//! catalog, keeps a registry of listeners, and produces synthetic readings
//! for each listener at its delivery rate whenever [`tick`] is called.
//!
//! [`tick`]: VirtualSensorPlatform::tick

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Duration;
use log::{debug, warn};

use super::{
    DeliveryRate, ListenerId, SensorEvent, SensorHandle, SensorInfo, SensorKind, SensorListener,
    SensorPlatform,
};

/// Standard gravity in m/s².
const STANDARD_GRAVITY: f32 = 9.806_65;

/// Sea-level pressure in hPa.
const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

/// Android reserves type identifiers from here up for vendor sensors.
const VENDOR_TYPE_BASE: i32 = 65_536;

struct Registration {
    id: ListenerId,
    handle: SensorHandle,
    sensor_type: i32,
    rate: DeliveryRate,
    listener: SensorListener,
    since_last: Duration,
}

struct Registry {
    next_id: u32,
    registrations: Vec<Registration>,
    registered: usize,
    unregistered: usize,
    deny: bool,
    clock: Duration,
}

impl Registry {
    const fn new() -> Self {
        Self {
            next_id: 0,
            registrations: Vec::new(),
            registered: 0,
            unregistered: 0,
            deny: false,
            clock: Duration::from_ticks(0),
        }
    }
}

pub struct VirtualSensorPlatform {
    sensors: Vec<SensorInfo>,
    registry: Mutex<CriticalSectionRawMutex, RefCell<Registry>>,
}

impl VirtualSensorPlatform {
    /// Build a platform exposing `sensors`. Handles are reassigned by position.
    pub fn new(sensors: Vec<SensorInfo>) -> Self {
        let sensors = sensors
            .into_iter()
            .enumerate()
            .map(|(i, mut sensor)| {
                sensor.handle = SensorHandle(i as u32);
                sensor
            })
            .collect();

        Self {
            sensors,
            registry: Mutex::new(RefCell::new(Registry::new())),
        }
    }

    /// A catalog resembling a typical phone.
    pub fn with_default_catalog() -> Self {
        let entry = |name: &str,
                     vendor: &str,
                     sensor_type: i32,
                     version: i32,
                     power: f32,
                     resolution: f32,
                     maximum_range: f32| SensorInfo {
            handle: SensorHandle(0),
            name: name.into(),
            vendor: vendor.into(),
            sensor_type,
            version,
            power,
            resolution,
            maximum_range,
        };

        Self::new(vec![
            entry("LSM6DSO Accelerometer", "STMicro", 1, 15_932, 0.17, 0.004_788_4, 78.453_2),
            entry("AK09918 Magnetometer", "AKM", 2, 1, 1.1, 0.15, 4912.0),
            entry("LSM6DSO Gyroscope", "STMicro", 4, 15_932, 0.55, 0.001_221_7, 34.906_6),
            entry("TMD3725 Ambient Light", "AMS", 5, 1, 0.13, 1.0, 60_000.0),
            entry("BMP390 Pressure", "Bosch", 6, 1, 0.004, 0.0016, 1100.0),
            entry("TMD3725 Proximity", "AMS", 8, 1, 0.13, 5.0, 5.0),
            entry("Gravity Sensor", "AOSP", 9, 3, 0.72, 0.004_788_4, STANDARD_GRAVITY),
            entry("Linear Acceleration Sensor", "AOSP", 10, 3, 0.72, 0.004_788_4, 78.453_2),
            entry("Rotation Vector Sensor", "AOSP", 11, 3, 0.72, 5.96e-8, 1.0),
            entry("SHT40 Humidity", "Sensirion", 12, 1, 0.0004, 0.01, 100.0),
            entry("SHT40 Temperature", "Sensirion", 13, 1, 0.0004, 0.01, 125.0),
            entry("Device Orientation", "Vendor", VENDOR_TYPE_BASE, 1, 0.01, 1.0, 3.0),
        ])
    }

    /// Make future registrations fail, as a platform lacking permission would.
    pub fn deny_registrations(&self, deny: bool) {
        self.registry.lock(|r| r.borrow_mut().deny = deny);
    }

    /// Total successful registrations so far.
    pub fn registration_count(&self) -> usize {
        self.registry.lock(|r| r.borrow().registered)
    }

    /// Total successful unregistrations so far.
    pub fn unregistration_count(&self) -> usize {
        self.registry.lock(|r| r.borrow().unregistered)
    }

    pub fn active_listener_count(&self) -> usize {
        self.registry.lock(|r| r.borrow().registrations.len())
    }

    /// Push `values` to every listener registered on `handle`.
    ///
    /// Returns how many listeners were notified.
    pub fn deliver(&self, handle: SensorHandle, values: &[f32]) -> usize {
        let targets: Vec<SensorListener> = self.registry.lock(|r| {
            r.borrow()
                .registrations
                .iter()
                .filter(|reg| reg.handle == handle)
                .map(|reg| reg.listener.clone())
                .collect()
        });

        for listener in &targets {
            listener.signal(SensorEvent::new(values));
        }
        targets.len()
    }

    /// Advance the platform clock and deliver a synthetic reading to every
    /// listener whose delivery period has elapsed.
    ///
    /// Returns how many events were delivered.
    pub fn tick(&self, elapsed: Duration) -> usize {
        let due: Vec<(SensorListener, SensorEvent)> = self.registry.lock(|r| {
            let mut registry = r.borrow_mut();
            registry.clock += elapsed;
            let t = registry.clock.as_micros() as f32 / 1_000_000.0;

            registry
                .registrations
                .iter_mut()
                .filter_map(|reg| {
                    reg.since_last += elapsed;
                    if reg.since_last < reg.rate.period() {
                        return None;
                    }
                    reg.since_last = Duration::from_ticks(0);
                    let event = SensorEvent {
                        values: synthetic_values(reg.sensor_type, t),
                    };
                    Some((reg.listener.clone(), event))
                })
                .collect()
        });

        // Signal outside the registry lock; listeners may be polled from
        // another thread.
        for (listener, event) in &due {
            listener.signal(event.clone());
        }

        if !due.is_empty() {
            debug!("Delivered {} synthetic events", due.len());
        }
        due.len()
    }
}

impl SensorPlatform for VirtualSensorPlatform {
    fn sensor_list(&self) -> Vec<SensorInfo> {
        self.sensors.clone()
    }

    fn default_sensor(&self, sensor_type: i32) -> Option<SensorInfo> {
        self.sensors
            .iter()
            .find(|s| s.sensor_type == sensor_type)
            .cloned()
    }

    fn register_listener(
        &self,
        sensor: &SensorInfo,
        rate: DeliveryRate,
        listener: SensorListener,
    ) -> Option<ListenerId> {
        if !self.sensors.iter().any(|s| s.handle == sensor.handle) {
            warn!("Refusing listener for unknown sensor {:?}", sensor.handle);
            return None;
        }

        self.registry.lock(|r| {
            let mut registry = r.borrow_mut();
            if registry.deny {
                return None;
            }

            let id = ListenerId(registry.next_id);
            registry.next_id += 1;
            registry.registered += 1;
            registry.registrations.push(Registration {
                id,
                handle: sensor.handle,
                sensor_type: sensor.sensor_type,
                rate,
                listener,
                // First event goes out on the next tick.
                since_last: rate.period(),
            });
            Some(id)
        })
    }

    fn unregister_listener(&self, id: ListenerId) {
        self.registry.lock(|r| {
            let mut registry = r.borrow_mut();
            let before = registry.registrations.len();
            registry.registrations.retain(|reg| reg.id != id);
            if registry.registrations.len() < before {
                registry.unregistered += 1;
            } else {
                warn!("Unregister for unknown listener {:?}", id);
            }
        });
    }
}

/// Plausible readings for a sensor type at time `t` seconds.
fn synthetic_values(sensor_type: i32, t: f32) -> Vec<f32> {
    let Some(kind) = SensorKind::from_type(sensor_type) else {
        return vec![(t / 4.0).sin()];
    };

    match kind {
        SensorKind::Accelerometer => vec![
            0.12 * (t * 1.3).sin(),
            0.08 * (t * 0.7).cos(),
            STANDARD_GRAVITY + 0.05 * (t * 2.1).sin(),
        ],
        SensorKind::MagneticField => vec![
            22.0 + 3.0 * (t / 5.0).sin(),
            -5.0 + (t / 3.0).cos(),
            -40.0 + 0.5 * (t / 7.0).sin(),
        ],
        SensorKind::Gyroscope | SensorKind::LinearAcceleration => vec![
            0.02 * (t * 1.7).sin(),
            0.015 * (t * 1.1).cos(),
            0.01 * (t * 0.9).sin(),
        ],
        SensorKind::Light => vec![300.0 + 150.0 * (t / 10.0).sin()],
        SensorKind::Pressure => vec![SEA_LEVEL_PRESSURE_HPA + 0.5 * (t / 30.0).sin()],
        SensorKind::Proximity => {
            if (t as u32 / 5) % 2 == 0 {
                vec![5.0]
            } else {
                vec![0.0]
            }
        }
        SensorKind::Gravity => vec![0.0, 0.0, STANDARD_GRAVITY],
        SensorKind::RotationVector => {
            let half = (t / 20.0).sin() * 0.5;
            vec![0.0, 0.0, half.sin(), half.cos(), -1.0]
        }
        SensorKind::RelativeHumidity => vec![45.0 + 5.0 * (t / 60.0).sin()],
        SensorKind::AmbientTemperature => vec![22.0 + 1.5 * (t / 90.0).sin()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::new_listener;

    fn first_handle(platform: &VirtualSensorPlatform, kind: SensorKind) -> SensorInfo {
        platform.default_sensor(kind.type_id()).unwrap()
    }

    #[test]
    fn test_default_catalog_handles_are_unique() {
        let platform = VirtualSensorPlatform::with_default_catalog();
        let sensors = platform.sensor_list();
        assert_eq!(sensors.len(), 12);
        for (i, sensor) in sensors.iter().enumerate() {
            assert_eq!(sensor.handle, SensorHandle(i as u32));
        }
    }

    #[test]
    fn test_default_sensor_is_first_of_type() {
        let mut sensors = VirtualSensorPlatform::with_default_catalog().sensor_list();
        let mut second = sensors[0].clone();
        second.name = "Secondary Accelerometer".into();
        sensors.push(second);

        let platform = VirtualSensorPlatform::new(sensors);
        let default = platform.default_sensor(1).unwrap();
        assert_eq!(default.name, "LSM6DSO Accelerometer");
        assert!(platform.default_sensor(3).is_none());
    }

    #[test]
    fn test_tick_respects_delivery_rate() {
        let platform = VirtualSensorPlatform::with_default_catalog();
        let sensor = first_handle(&platform, SensorKind::Accelerometer);
        let listener = new_listener();
        platform
            .register_listener(&sensor, DeliveryRate::Normal, listener.clone())
            .unwrap();

        // First tick delivers immediately.
        assert_eq!(platform.tick(Duration::from_millis(10)), 1);
        let event = listener.try_take().unwrap();
        assert_eq!(event.values.len(), 3);

        // Normal rate is 200 ms; 100 ms later nothing is due yet.
        assert_eq!(platform.tick(Duration::from_millis(100)), 0);
        assert_eq!(platform.tick(Duration::from_millis(100)), 1);
    }

    #[test]
    fn test_synthetic_value_counts_match_kind() {
        for kind in SensorKind::ALL {
            assert_eq!(synthetic_values(kind.type_id(), 12.5).len(), kind.value_count());
        }
        assert_eq!(synthetic_values(VENDOR_TYPE_BASE, 1.0).len(), 1);
    }

    #[test]
    fn test_deliver_only_reaches_matching_handle() {
        let platform = VirtualSensorPlatform::with_default_catalog();
        let light = first_handle(&platform, SensorKind::Light);
        let pressure = first_handle(&platform, SensorKind::Pressure);

        let light_listener = new_listener();
        let pressure_listener = new_listener();
        platform
            .register_listener(&light, DeliveryRate::Ui, light_listener.clone())
            .unwrap();
        platform
            .register_listener(&pressure, DeliveryRate::Ui, pressure_listener.clone())
            .unwrap();

        assert_eq!(platform.deliver(light.handle, &[123.0]), 1);
        assert_eq!(light_listener.try_take(), Some(SensorEvent::new(&[123.0])));
        assert_eq!(pressure_listener.try_take(), None);
    }

    #[test]
    fn test_unregister_unknown_id_is_not_counted() {
        let platform = VirtualSensorPlatform::with_default_catalog();
        platform.unregister_listener(ListenerId(42));
        assert_eq!(platform.unregistration_count(), 0);
    }

    #[test]
    fn test_register_unknown_sensor_is_refused() {
        let platform = VirtualSensorPlatform::with_default_catalog();
        let mut bogus = first_handle(&platform, SensorKind::Light);
        bogus.handle = SensorHandle(999);
        assert!(
            platform
                .register_listener(&bogus, DeliveryRate::Ui, new_listener())
                .is_none()
        );
        assert_eq!(platform.registration_count(), 0);
    }
}
