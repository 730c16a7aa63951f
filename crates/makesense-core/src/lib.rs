//! Platform-independent core library for makesense
//!
//! This crate contains everything the sensor browser needs apart from the
//! operating system's sensor framework and a display: the sensor descriptor
//! and its route payload codec, the [`SensorPlatform`](sensors::SensorPlatform)
//! capability, scoped subscriptions, pages, and the page manager that routes
//! between them.
//!
//! Pages render through `embedded-graphics`, so the same code drives the
//! desktop simulator and any `DrawTarget<Color = Rgb565>` display.

pub mod config;
pub mod pages;
pub mod sensors;
pub mod ui;
