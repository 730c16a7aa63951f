//! Scoped listener registration.

use std::sync::Arc;

use log::{info, warn};

use super::{
    DeliveryRate, ListenerId, SensorEvent, SensorKind, SensorListener, SensorPlatform,
    new_listener,
};

/// A live listener registration that is released when dropped.
///
/// Holding a `Subscription` is the only way to receive events, and dropping
/// it is the only way to unregister, so each registration is released exactly
/// once no matter how its owner goes away.
pub struct Subscription<P: SensorPlatform> {
    platform: Arc<P>,
    id: ListenerId,
    sensor_type: i32,
    listener: SensorListener,
}

impl<P: SensorPlatform> Subscription<P> {
    /// Register for events from the platform's default sensor of `sensor_type`.
    ///
    /// Returns `None` without registering anything when the platform has no
    /// such sensor or refuses the registration.
    pub fn subscribe(platform: &Arc<P>, sensor_type: i32, rate: DeliveryRate) -> Option<Self> {
        let Some(sensor) = platform.default_sensor(sensor_type) else {
            info!("No default sensor for type {}, not subscribing", sensor_type);
            return None;
        };

        let listener = new_listener();
        let Some(id) = platform.register_listener(&sensor, rate, listener.clone()) else {
            warn!("Platform refused listener for '{}'", sensor.name);
            return None;
        };

        let kind = SensorKind::from_type(sensor_type).map_or("vendor-specific", |k| k.label());
        info!(
            "Subscribed {:?} to '{}' ({}, type {}) at {:?}",
            id, sensor.name, kind, sensor_type, rate
        );

        Some(Self {
            platform: platform.clone(),
            id,
            sensor_type,
            listener,
        })
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn sensor_type(&self) -> i32 {
        self.sensor_type
    }

    /// Take the newest event delivered since the last call, if any.
    pub fn latest(&self) -> Option<SensorEvent> {
        self.listener.try_take()
    }
}

impl<P: SensorPlatform> Drop for Subscription<P> {
    fn drop(&mut self) {
        self.platform.unregister_listener(self.id);
        info!("Unsubscribed {:?} (type {})", self.id, self.sensor_type);
    }
}
