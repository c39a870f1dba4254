//! Effect catalog: the registry of effects a session can apply.
//!
//! Each [`EffectDefinition`] is a plain record pairing a transform function
//! with its descriptive metadata (label, icon, parameter shape). Front-ends
//! build their controls from [`EffectCatalog::describe`]; the render
//! pipeline looks transforms up with [`EffectCatalog::get`].
//!
//! # Example
//!
//! ```rust
//! use retouch_engine::{EffectCatalog, ParameterKind};
//!
//! let catalog = EffectCatalog::builtin();
//! let blur = catalog.get("filters", "blur").unwrap();
//! let ParameterKind::Scalar(range) = blur.parameter else { panic!() };
//! assert_eq!((range.min, range.max, range.step), (0.0, 20.0, 5.0));
//! assert!(!range.snap_to_center);
//! ```

use crate::pipeline::RenderOptions;
use crate::{EngineError, EngineResult};
use retouch_core::PixelBuffer;
use serde::Serialize;

/// Transform signature shared by every catalog entry.
///
/// The value is `None` for trigger effects and the resolved scalar otherwise.
pub type TransformFn = fn(&mut PixelBuffer, Option<f32>, &RenderOptions);

/// Range, step and default of a scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
    /// Control increment.
    pub step: f32,
    /// Initial control value; also the value used for a stack entry without one.
    pub default: f32,
    /// Whether values close to the range center snap onto it.
    pub snap_to_center: bool,
}

impl ScalarRange {
    /// Creates a snapping range.
    pub const fn new(min: f32, max: f32, step: f32, default: f32) -> Self {
        Self {
            min,
            max,
            step,
            default,
            snap_to_center: true,
        }
    }

    /// Disables snap-to-center.
    pub const fn without_snap(mut self) -> Self {
        self.snap_to_center = false;
        self
    }

    /// Midpoint of the range.
    #[inline]
    pub fn center(&self) -> f32 {
        self.min + (self.max - self.min) / 2.0
    }

    /// Clamps `value` into `[min, max]`.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Resolves a raw control value.
    ///
    /// Snaps to [`center`](Self::center) when within `threshold * (max - min)`
    /// of it (if enabled), rounds onto the step grid anchored at `min`, then
    /// clamps.
    ///
    /// ```rust
    /// use retouch_engine::ScalarRange;
    ///
    /// let hue = ScalarRange::new(-180.0, 180.0, 1.0, 0.0);
    /// assert_eq!(hue.quantize(6.9, 0.02), 0.0);
    /// assert_eq!(hue.quantize(7.4, 0.02), 7.0);
    /// assert_eq!(hue.quantize(500.0, 0.02), 180.0);
    /// ```
    pub fn quantize(&self, raw: f32, threshold: f32) -> f32 {
        let span = self.max - self.min;
        let center = self.center();
        let mut value = raw;
        if self.snap_to_center && (raw - center).abs() < span * threshold {
            value = center;
        }
        if self.step > 0.0 {
            value = ((value - self.min) / self.step).round() * self.step + self.min;
        }
        self.clamp(value)
    }

    /// Maps a control position `ratio` in `[0, 1]` onto the range and quantizes it.
    pub fn value_at(&self, ratio: f32, threshold: f32) -> f32 {
        let ratio = ratio.clamp(0.0, 1.0);
        self.quantize(self.min + (self.max - self.min) * ratio, threshold)
    }

    /// Position of `value` within the range, in percent.
    pub fn percent(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span == 0.0 {
            return 0.0;
        }
        (value - self.min) / span * 100.0
    }
}

/// Parameter shape of an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    /// No parameter; the effect runs when activated.
    Trigger,
    /// A single scalar.
    Scalar(ScalarRange),
}

impl ParameterKind {
    /// Short name used in errors and descriptors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Scalar(_) => "scalar",
        }
    }

    /// The scalar range, if any.
    pub fn range(&self) -> Option<&ScalarRange> {
        match self {
            Self::Trigger => None,
            Self::Scalar(range) => Some(range),
        }
    }

    /// Value passed to a transform for a stored `value`.
    ///
    /// Triggers always get `None`. Scalars get the stored value clamped into
    /// range, or the default when nothing is stored.
    pub fn resolve(&self, value: Option<f32>) -> Option<f32> {
        match self {
            Self::Trigger => None,
            Self::Scalar(range) => Some(range.clamp(value.unwrap_or(range.default))),
        }
    }
}

/// A group of effects shown together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Stable id.
    pub id: &'static str,
    /// Display label.
    pub label: String,
    /// Icon name.
    pub icon: &'static str,
}

impl Category {
    /// Creates a category labelled with its id, first letter upper-cased.
    ///
    /// ```rust
    /// use retouch_engine::Category;
    ///
    /// assert_eq!(Category::new("filters", "blur_on").label, "Filters");
    /// ```
    pub fn new(id: &'static str, icon: &'static str) -> Self {
        let mut chars = id.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self { id, label, icon }
    }
}

/// One catalog entry.
#[derive(Debug, Clone)]
pub struct EffectDefinition {
    /// Category id.
    pub category: &'static str,
    /// Effect id, unique within its category.
    pub id: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Parameter shape.
    pub parameter: ParameterKind,
    /// Pixel transform.
    pub transform: TransformFn,
}

impl EffectDefinition {
    /// Runs the transform with `value` resolved against the parameter shape.
    pub fn apply(&self, buf: &mut PixelBuffer, value: Option<f32>, options: &RenderOptions) {
        (self.transform)(buf, self.parameter.resolve(value), options);
    }

    /// Read-only description for front-ends.
    pub fn descriptor(&self) -> EffectDescriptor {
        EffectDescriptor {
            category: self.category,
            effect: self.id,
            label: self.label,
            icon: self.icon,
            kind: self.parameter.name(),
            range: self.parameter.range().copied(),
        }
    }
}

/// Serializable view of an [`EffectDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDescriptor {
    /// Category id.
    pub category: &'static str,
    /// Effect id.
    pub effect: &'static str,
    /// Display label.
    pub label: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// `"scalar"` or `"trigger"`.
    pub kind: &'static str,
    /// Scalar range; absent for triggers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ScalarRange>,
}

/// Ordered registry of categories and effects.
#[derive(Debug, Clone, Default)]
pub struct EffectCatalog {
    categories: Vec<Category>,
    effects: Vec<EffectDefinition>,
}

impl EffectCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a category. Re-adding an id replaces its label and icon.
    pub fn add_category(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Registers an effect.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidValue`] if the category is unknown, the id is
    /// already taken, or the scalar range is malformed.
    pub fn register(&mut self, definition: EffectDefinition) -> EngineResult<()> {
        if self.category(definition.category).is_none() {
            return Err(EngineError::InvalidValue(format!(
                "category '{}' is not registered",
                definition.category
            )));
        }
        if self.get(definition.category, definition.id).is_some() {
            return Err(EngineError::InvalidValue(format!(
                "effect {}/{} is already registered",
                definition.category, definition.id
            )));
        }
        if let ParameterKind::Scalar(range) = &definition.parameter {
            let ordered =
                range.min <= range.max && (range.min..=range.max).contains(&range.default);
            if !ordered || range.step < 0.0 || !range.step.is_finite() {
                return Err(EngineError::InvalidValue(format!(
                    "malformed range for {}/{}",
                    definition.category, definition.id
                )));
            }
        }
        self.effects.push(definition);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_effect(mut self, definition: EffectDefinition) -> EngineResult<Self> {
        self.register(definition)?;
        Ok(self)
    }

    /// Looks up an effect.
    pub fn get(&self, category: &str, effect: &str) -> Option<&EffectDefinition> {
        self.effects
            .iter()
            .find(|d| d.category == category && d.id == effect)
    }

    /// Looks up a category.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Categories in registration order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Effects in registration order.
    pub fn effects(&self) -> &[EffectDefinition] {
        &self.effects
    }

    /// Effects of one category, in registration order.
    pub fn effects_in<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a EffectDefinition> + 'a {
        self.effects.iter().filter(move |d| d.category == category)
    }

    /// Descriptors for every effect, in registration order.
    pub fn describe(&self) -> Vec<EffectDescriptor> {
        self.effects.iter().map(EffectDefinition::descriptor).collect()
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// True when no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
