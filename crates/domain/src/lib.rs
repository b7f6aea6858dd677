//! # homielink-domain
//!
//! Pure value-level model for the Homie IoT convention.
//!
//! ## Responsibilities
//! - Foundational types: validated topic-segment identifiers, topic paths,
//!   payload encoding, error conventions
//! - Define **Units** (measurement unit wrappers with the convention constants)
//! - Define **Colors** (HSV/RGB value objects with wire round-trip and lossy
//!   cross-conversion)
//! - Define the **value codec family** (string, boolean, integer, float, enum,
//!   mapped enum, color) that decides how typed property values round-trip to
//!   wire strings, including range and membership validation
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! It must never import anything from `core` or transport crates.

pub mod color;
pub mod error;
pub mod id;
pub mod payload;
pub mod topic;
pub mod unit;
pub mod value;
