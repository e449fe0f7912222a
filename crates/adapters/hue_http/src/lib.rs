//! # huedeck-adapter-hue-http
//!
//! Hue bridge adapter over the bridge's local REST API.
//!
//! ## Responsibilities
//! - Implement the [`LightController`](huedeck_app::ports::LightController) port
//! - Build the state URL and JSON body for each command
//! - Turn bridge error items and transport failures into
//!   [`DeviceCommandFailure`](huedeck_domain::error::HueDeckError::DeviceCommandFailure)
//!
//! ## Dependency rule
//! Depends on `huedeck-app` (for port traits) and `huedeck-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod config;
mod controller;
mod error;
mod wire;

pub use config::HueHttpConfig;
pub use controller::HueHttpController;
pub use error::HueHttpError;
