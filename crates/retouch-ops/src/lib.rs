//! # retouch-ops
//!
//! Pixel operations behind retouch's effect catalog.
//!
//! # Modules
//!
//! - [`filter`] - Convolution kernels and separable box blur
//! - [`adjust`] - Hue, saturation, contrast and brightness
//!
//! # Example
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_ops::{adjust, filter::{box_blur, EdgeMode}};
//!
//! let mut img = PixelBuffer::filled(16, 16, [120, 80, 40, 255]);
//! adjust::adjust_contrast(&mut img, 40.0);
//! let blurred = box_blur(&img, 2, EdgeMode::Clamp);
//! assert_eq!(blurred.dimensions(), (16, 16));
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Process rows with Rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;
pub mod adjust;
pub mod filter;

pub use error::{OpsError, OpsResult};
pub use filter::{AlphaMode, EdgeMode, Kernel};
