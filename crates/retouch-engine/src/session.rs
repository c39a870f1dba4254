//! Editing session: the command surface of the engine.
//!
//! A [`Session`] owns the source image, the effect stack, the render pipeline
//! and the scheduler. Commands mutate the stack and ask the scheduler for a
//! render; rendered frames go to an attached [`DisplaySurface`].
//!
//! ```rust
//! use retouch_core::PixelBuffer;
//! use retouch_engine::{EngineConfig, Session};
//!
//! let mut session = Session::new(EngineConfig::default()).unwrap();
//! session.load_source(PixelBuffer::filled(4, 4, [100, 100, 100, 255]));
//!
//! session.set_parameter("colors", "brightness", 30.0).unwrap();
//! session.flush();
//! assert_eq!(session.output().unwrap().pixel(0, 0).unwrap(), [130, 130, 130, 255]);
//! ```

use crate::catalog::{EffectCatalog, EffectDefinition, ParameterKind, ScalarRange};
use crate::config::EngineConfig;
use crate::pipeline::{RenderOptions, RenderPipeline};
use crate::scheduler::{Clock, Decision, RenderScheduler, SystemClock};
use crate::stack::{AppliedEffect, EffectKey, EffectStack};
use crate::{EngineError, EngineResult};
use retouch_core::PixelBuffer;
use serde::Serialize;
use tracing::debug;

/// Receives rendered frames.
pub trait DisplaySurface {
    /// Shows `frame`.
    fn present(&mut self, frame: &PixelBuffer);
}

/// One row of the applied-effects list shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackEntry {
    /// Category id.
    pub category: String,
    /// Effect id.
    pub effect: String,
    /// Effect label, or the effect id if the catalog lacks it.
    pub label: String,
    /// Stored parameter.
    pub value: Option<f32>,
}

/// Editing session over one source image.
pub struct Session<C: Clock = SystemClock> {
    config: EngineConfig,
    pipeline: RenderPipeline,
    stack: EffectStack,
    source: Option<PixelBuffer>,
    output: Option<PixelBuffer>,
    scheduler: RenderScheduler,
    clock: C,
    surface: Option<Box<dyn DisplaySurface>>,
    render_count: u64,
}

impl Session<SystemClock> {
    /// Session over the built-in catalog and the wall clock.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidValue`] if `config` fails validation.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_clock(config, EffectCatalog::builtin(), SystemClock)
    }
}

impl<C: Clock> Session<C> {
    /// Session with an explicit catalog and clock.
    pub fn with_clock(
        config: EngineConfig,
        catalog: EffectCatalog,
        clock: C,
    ) -> EngineResult<Self> {
        config.validate()?;
        let options = RenderOptions::with_edge_mode(config.edge_mode);
        Ok(Self {
            scheduler: RenderScheduler::new(config.render_interval()),
            pipeline: RenderPipeline::with_options(catalog, options),
            config,
            stack: EffectStack::new(),
            source: None,
            output: None,
            clock,
            surface: None,
            render_count: 0,
        })
    }

    /// Attaches the surface frames are presented to, replacing any previous one.
    ///
    /// The current output, if any, is presented right away.
    pub fn attach_surface(&mut self, surface: impl DisplaySurface + 'static) {
        let mut surface: Box<dyn DisplaySurface> = Box::new(surface);
        if let Some(frame) = &self.output {
            surface.present(frame);
        }
        self.surface = Some(surface);
    }

    /// Detaches and returns the surface.
    pub fn detach_surface(&mut self) -> Option<Box<dyn DisplaySurface>> {
        self.surface.take()
    }

    /// Replaces the source image, clears the stack and renders immediately.
    pub fn load_source(&mut self, source: PixelBuffer) {
        debug!(width = source.width(), height = source.height(), "load source");
        self.source = Some(source);
        self.stack.clear();
        self.scheduler.cancel_pending();
        self.render_now();
    }

    /// [`load_source`](Self::load_source) from raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`EngineError::Core`] if `data` does not match the dimensions.
    pub fn load_source_raw(&mut self, width: u32, height: u32, data: Vec<u8>) -> EngineResult<()> {
        let source = PixelBuffer::from_raw(width, height, data)?;
        self.load_source(source);
        Ok(())
    }

    /// Sets a scalar effect, adding it to the stack if absent.
    ///
    /// The value is clamped into the effect's range; the stored value is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidValue`] if `value` is not finite
    /// - [`EngineError::UnknownEffect`] if the catalog lacks the effect
    /// - [`EngineError::ParameterKind`] if the effect is a trigger
    pub fn set_parameter(&mut self, category: &str, effect: &str, value: f32) -> EngineResult<f32> {
        if !value.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "{category}/{effect}: {value} is not finite"
            )));
        }
        let range = *self.scalar_range(category, effect)?;
        let value = range.clamp(value);
        self.stack.upsert(EffectKey::new(category, effect), Some(value));
        debug!(category, effect, value, "set parameter");
        self.request_render();
        Ok(value)
    }

    /// Sets a scalar effect from a control position in `[0, 1]`.
    ///
    /// The position is mapped onto the range, snapped to the center within the
    /// configured threshold and rounded to the step grid.
    pub fn set_parameter_from_ratio(
        &mut self,
        category: &str,
        effect: &str,
        ratio: f32,
    ) -> EngineResult<f32> {
        if !ratio.is_finite() {
            return Err(EngineError::InvalidValue(format!(
                "{category}/{effect}: ratio {ratio} is not finite"
            )));
        }
        let range = *self.scalar_range(category, effect)?;
        let value = range.value_at(ratio, self.config.snap_threshold);
        self.set_parameter(category, effect, value)
    }

    /// Applies a trigger effect. Activating it again keeps a single instance.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownEffect`] or, for scalar effects,
    /// [`EngineError::ParameterKind`].
    pub fn activate_trigger(&mut self, category: &str, effect: &str) -> EngineResult<()> {
        let definition = self.definition(category, effect)?;
        if definition.parameter != ParameterKind::Trigger {
            return Err(EngineError::ParameterKind {
                category: category.to_string(),
                effect: effect.to_string(),
                expected: definition.parameter.name(),
            });
        }
        self.stack.upsert(EffectKey::new(category, effect), None);
        debug!(category, effect, "activate trigger");
        self.request_render();
        Ok(())
    }

    /// Reorders the stack; see [`EffectStack::reorder`].
    pub fn set_stack_order(&mut self, permutation: &[usize]) -> EngineResult<()> {
        self.stack.reorder(permutation)?;
        debug!(?permutation, "reorder stack");
        self.request_render();
        Ok(())
    }

    /// Removes the stack entry at `index`.
    pub fn remove_effect(&mut self, index: usize) -> EngineResult<AppliedEffect> {
        let removed = self.stack.remove(index)?;
        debug!(key = %removed.key, index, "remove effect");
        self.request_render();
        Ok(removed)
    }

    /// Runs a deferred render if it is due. Returns true if one ran.
    pub fn tick(&mut self) -> bool {
        if self.scheduler.poll(self.clock.now()) {
            self.render_now();
            return true;
        }
        false
    }

    /// Runs any deferred render now, ignoring the interval. Returns true if one ran.
    pub fn flush(&mut self) -> bool {
        if self.scheduler.next_due().is_some() {
            self.render_now();
            return true;
        }
        false
    }

    /// Latest rendered frame.
    pub fn output(&self) -> Option<&PixelBuffer> {
        self.output.as_ref()
    }

    /// Loaded source image.
    pub fn source(&self) -> Option<&PixelBuffer> {
        self.source.as_ref()
    }

    /// Applied effects.
    pub fn stack(&self) -> &EffectStack {
        &self.stack
    }

    /// Applied effects with their labels, in render order.
    pub fn stack_entries(&self) -> Vec<StackEntry> {
        self.stack
            .iter()
            .map(|entry| {
                let label = self
                    .catalog()
                    .get(&entry.key.category, &entry.key.effect)
                    .map_or_else(|| entry.key.effect.clone(), |d| d.label.to_string());
                StackEntry {
                    category: entry.key.category.clone(),
                    effect: entry.key.effect.clone(),
                    label,
                    value: entry.value,
                }
            })
            .collect()
    }

    /// Effect catalog.
    pub fn catalog(&self) -> &EffectCatalog {
        self.pipeline.catalog()
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Render scheduler.
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Session clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    fn definition(&self, category: &str, effect: &str) -> EngineResult<&EffectDefinition> {
        self.catalog()
            .get(category, effect)
            .ok_or_else(|| EngineError::unknown_effect(category, effect))
    }

    fn scalar_range(&self, category: &str, effect: &str) -> EngineResult<&ScalarRange> {
        let definition = self.definition(category, effect)?;
        definition.parameter.range().ok_or_else(|| EngineError::ParameterKind {
            category: category.to_string(),
            effect: effect.to_string(),
            expected: definition.parameter.name(),
        })
    }

    fn request_render(&mut self) {
        match self.scheduler.request(self.clock.now()) {
            Decision::RenderNow => self.render_now(),
            Decision::Deferred { .. } => {}
        }
    }

    fn render_now(&mut self) {
        let Some(source) = &self.source else {
            self.scheduler.cancel_pending();
            return;
        };
        self.scheduler.begin(self.clock.now());
        let frame = self.pipeline.render(source, &self.stack);
        if let Some(surface) = self.surface.as_mut() {
            surface.present(&frame);
        }
        self.output = Some(frame);
        self.render_count += 1;
        self.scheduler.finish();
    }
}
