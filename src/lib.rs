//! ScreenPilot library
//!
//! Exposes the CLI building blocks for integration testing

pub mod cli;
pub mod config;
pub mod device;

pub use config::AppConfig;
pub use device::{DeviceFixture, FixtureApp, ScreenFixture, SimulatedDevice};
