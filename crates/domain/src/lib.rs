//! # huedeck-domain
//!
//! Pure domain model for the huedeck key-to-light engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Actions** (a key binding: context, kind, settings)
//! - Define **Settings** (the persisted, possibly incomplete configuration of a key)
//! - Define the **Cache snapshot** (bridges and their lights, groups and scenes)
//! - Deterministic **ordering** used to pick defaults
//! - **Validation** of settings against a snapshot, and **command planning**
//!   (value transforms, target selection, optimistic state updates)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod cache;
pub mod color;
pub mod command;
pub mod defaults;
pub mod ordering;
pub mod settings;
pub mod validate;
