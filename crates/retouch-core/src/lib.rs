//! # retouch-core
//!
//! Core types for the retouch image editing engine.
//!
//! - [`PixelBuffer`] - Row-major RGBA8 image buffer
//! - [`store_channel`] - Clamp-and-round rule for writing computed channels
//! - [`Error`], [`Result`] - Buffer errors
//!
//! ## Crate Structure
//!
//! ```text
//! retouch-core (this crate)
//!    ^
//!    |
//!    +-- retouch-color (RGB <-> HSL)
//!    +-- retouch-ops (convolution, color adjustments)
//!    +-- retouch-engine (catalog, stack, pipeline, scheduler, session)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod buffer;
pub mod error;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{Error, Result};
pub use pixel::{ALPHA, CHANNELS, OPAQUE, store_channel, store_rgb};
