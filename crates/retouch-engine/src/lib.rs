//! # retouch-engine
//!
//! Effect catalog, effect stack, render pipeline and render scheduling.
//!
//! # Architecture
//!
//! ```text
//! Session ──► EffectStack (ordered, one entry per key)
//!    │
//!    ├──► RenderScheduler ──► Clock
//!    │
//!    └──► RenderPipeline ──► EffectCatalog ──► retouch-ops transforms
//!                │
//!                └──► DisplaySurface
//! ```
//!
//! Every render starts from a copy of the untouched source and replays the
//! whole stack, so output depends only on the source and the stack.
//!
//! # Example
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_engine::{EngineConfig, Session};
//!
//! let mut session = Session::new(EngineConfig::default()).unwrap();
//! session.load_source(PixelBuffer::filled(8, 8, [200, 40, 40, 255]));
//! session.set_parameter("colors", "hue", 120.0).unwrap();
//! session.set_parameter("filters", "blur", 5.0).unwrap();
//! session.flush();
//!
//! let entries = session.stack_entries();
//! assert_eq!(entries[0].label, "Hue");
//! assert_eq!(entries[1].label, "Blur");
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Row-parallel pixel operations via Rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

pub mod builtin;
pub mod catalog;
pub mod config;
pub mod pipeline;
pub mod scheduler;
pub mod session;
pub mod stack;

pub use catalog::{
    Category, EffectCatalog, EffectDefinition, EffectDescriptor, ParameterKind, ScalarRange,
    TransformFn,
};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use pipeline::{RenderOptions, RenderPipeline, render};
pub use scheduler::{Clock, Decision, ManualClock, RenderScheduler, SchedulerState, SystemClock};
pub use session::{DisplaySurface, Session, StackEntry};
pub use stack::{AppliedEffect, EffectKey, EffectStack};

pub use retouch_core::PixelBuffer;
pub use retouch_ops::EdgeMode;
