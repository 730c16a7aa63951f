//! Sensor metadata, the platform sensor capability, and live subscriptions.

mod descriptor;
mod kind;
mod platform;
mod subscription;
pub mod virtual_platform;

pub use descriptor::{DecodeError, EncodeError, SensorDescriptor};
pub use kind::SensorKind;
pub use platform::{
    DeliveryRate, ListenerId, SensorEvent, SensorHandle, SensorInfo, SensorListener,
    SensorPlatform, new_listener,
};
pub use subscription::Subscription;
pub use virtual_platform::VirtualSensorPlatform;
