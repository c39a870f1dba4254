//! # retouch-color
//!
//! Color-space conversion for retouch's hue and saturation adjustments.
//!
//! Conversions are pure functions on single pixels; buffer-level adjustments
//! live in `retouch-ops`.
//!
//! # Round Trip
//!
//! For every 8-bit RGB triple, `hsl_to_rgb(rgb_to_hsl(r, g, b))` lands within
//! one unit of the input, and exactly on it once stored with
//! [`retouch_core::store_channel`].
//!
//! # Used By
//!
//! - `retouch-ops` - hue rotation and saturation adjustment

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod hsl;

pub use hsl::{hsl_to_rgb, hue_to_rgb, rgb_to_hsl};
