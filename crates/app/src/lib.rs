//! # huedeck-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SettingsStore`: durable per-key settings
//!   - `LightController`: send a state command to a light or group
//!   - `HostFeedback`: log sink and key alert on the host surface
//! - Provide the **shared cache** (in-process, no IO)
//! - Define **driving/inbound** use-cases:
//!   - `DefaultResolver`: fill missing settings from the cache
//!   - `Dispatcher`: validate, send, reconcile the cache
//!   - `ActionService`: the live actions of the host, by context
//!
//! ## Dependency rule
//! Depends on `huedeck-domain` only (plus `tokio::sync` for async locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cache;
pub mod ports;
pub mod services;
