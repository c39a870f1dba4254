//! Render pipeline: replays an effect stack on a copy of the source.
//!
//! Output is a pure function of the source and the stack. The source is only
//! read; every pass starts from a fresh copy, so effects never compound.
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_engine::{EffectCatalog, EffectKey, EffectStack, RenderPipeline};
//!
//! let pipeline = RenderPipeline::new(EffectCatalog::builtin());
//! let source = PixelBuffer::filled(4, 4, [100, 100, 100, 255]);
//!
//! let mut stack = EffectStack::new();
//! stack.upsert(EffectKey::new("colors", "brightness"), Some(20.0));
//!
//! let out = pipeline.render(&source, &stack);
//! assert_eq!(out.pixel(0, 0).unwrap(), [120, 120, 120, 255]);
//! assert_eq!(source.pixel(0, 0).unwrap(), [100, 100, 100, 255]);
//! ```

use crate::catalog::EffectCatalog;
use crate::stack::EffectStack;
use retouch_core::PixelBuffer;
use retouch_ops::EdgeMode;
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Options shared by every transform in a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Boundary handling for filter effects.
    pub edge_mode: EdgeMode,
}

impl RenderOptions {
    /// Options with the given edge mode.
    pub fn with_edge_mode(edge_mode: EdgeMode) -> Self {
        Self { edge_mode }
    }
}

/// A catalog plus the options its transforms run with.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    catalog: EffectCatalog,
    options: RenderOptions,
}

impl RenderPipeline {
    /// Pipeline with default options.
    pub fn new(catalog: EffectCatalog) -> Self {
        Self::with_options(catalog, RenderOptions::default())
    }

    /// Pipeline with explicit options.
    pub fn with_options(catalog: EffectCatalog, options: RenderOptions) -> Self {
        Self { catalog, options }
    }

    /// The catalog transforms are looked up in.
    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    /// Render options.
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Renders `stack` over `source`.
    pub fn render(&self, source: &PixelBuffer, stack: &EffectStack) -> PixelBuffer {
        render(&self.catalog, source, stack, &self.options)
    }
}

/// Copies `source` and applies each stack entry in order.
///
/// Entries with no catalog definition are skipped with a warning.
pub fn render(
    catalog: &EffectCatalog,
    source: &PixelBuffer,
    stack: &EffectStack,
    options: &RenderOptions,
) -> PixelBuffer {
    let start = Instant::now();
    let mut out = source.clone();

    for entry in stack {
        let Some(definition) = catalog.get(&entry.key.category, &entry.key.effect) else {
            warn!(key = %entry.key, "skipping effect missing from catalog");
            continue;
        };
        trace!(key = %entry.key, value = ?entry.value, "apply");
        definition.apply(&mut out, entry.value, options);
    }

    debug!(
        width = out.width(),
        height = out.height(),
        effects = stack.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "render pass"
    );
    out
}
