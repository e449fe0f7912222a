//! # huedeck-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **host API**: key lifecycle (`/api/actions`), key presses
//!   (`/api/actions/{context}/key-up`) and the bridge cache (`/api/cache`)
//! - Map HTTP requests into [`ActionService`](huedeck_app::services::action_service::ActionService)
//!   calls (driving adapter)
//! - Map application results and errors into JSON responses
//!
//! ## Dependency rule
//! Depends on `huedeck-app` (for port traits and services) and `huedeck-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
