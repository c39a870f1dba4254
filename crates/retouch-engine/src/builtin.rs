//! The built-in effect set.
//!
//! | category | effect | range | step | default |
//! |---|---|---|---|---|
//! | colors | hue | -180..180 | 1 | 0 |
//! | colors | saturation | -100..100 | 1 | 0 |
//! | colors | contrast | -255..255 | 1 | 0 |
//! | colors | brightness | -255..255 | 1 | 0 |
//! | filters | blur | 0..20 (no snap) | 5 | 0 |
//! | filters | sharpen | 0..100 | 1 | 0 |
//! | filters | denoise | 0..100 | 1 | 0 |

use crate::catalog::{Category, EffectCatalog, EffectDefinition, ParameterKind, ScalarRange};
use crate::pipeline::RenderOptions;
use retouch_core::PixelBuffer;
use retouch_ops::filter::{box_blur, convolve};
use retouch_ops::{AlphaMode, Kernel, adjust};

/// Color adjustment category id.
pub const COLORS: &str = "colors";
/// Spatial filter category id.
pub const FILTERS: &str = "filters";

const COLORS_ICON: &str = "colors";
const FILTERS_ICON: &str = "blur_on";

fn scalar(
    category: &'static str,
    icon: &'static str,
    id: &'static str,
    label: &'static str,
    range: ScalarRange,
    transform: crate::catalog::TransformFn,
) -> EffectDefinition {
    EffectDefinition {
        category,
        id,
        label,
        icon,
        parameter: ParameterKind::Scalar(range),
        transform,
    }
}

/// Every built-in effect, in presentation order.
pub fn definitions() -> Vec<EffectDefinition> {
    vec![
        scalar(
            COLORS,
            COLORS_ICON,
            "hue",
            "Hue",
            ScalarRange::new(-180.0, 180.0, 1.0, 0.0),
            hue,
        ),
        scalar(
            COLORS,
            COLORS_ICON,
            "saturation",
            "Saturation",
            ScalarRange::new(-100.0, 100.0, 1.0, 0.0),
            saturation,
        ),
        scalar(
            COLORS,
            COLORS_ICON,
            "contrast",
            "Contrast",
            ScalarRange::new(-255.0, 255.0, 1.0, 0.0),
            contrast,
        ),
        scalar(
            COLORS,
            COLORS_ICON,
            "brightness",
            "Brightness",
            ScalarRange::new(-255.0, 255.0, 1.0, 0.0),
            brightness,
        ),
        scalar(
            FILTERS,
            FILTERS_ICON,
            "blur",
            "Blur",
            ScalarRange::new(0.0, 20.0, 5.0, 0.0).without_snap(),
            blur,
        ),
        scalar(
            FILTERS,
            FILTERS_ICON,
            "sharpen",
            "Sharpen",
            ScalarRange::new(0.0, 100.0, 1.0, 0.0),
            sharpen,
        ),
        scalar(
            FILTERS,
            FILTERS_ICON,
            "denoise",
            "Denoise",
            ScalarRange::new(0.0, 100.0, 1.0, 0.0),
            denoise,
        ),
    ]
}

impl EffectCatalog {
    /// The fixed catalog: four color adjustments and three filters.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.add_category(Category::new(COLORS, COLORS_ICON));
        catalog.add_category(Category::new(FILTERS, FILTERS_ICON));
        for definition in definitions() {
            // Built-in entries are unique and well-formed.
            if let Err(err) = catalog.register(definition) {
                tracing::error!(%err, "built-in effect rejected");
            }
        }
        catalog
    }
}

fn hue(buf: &mut PixelBuffer, value: Option<f32>, _: &RenderOptions) {
    adjust::rotate_hue(buf, value.unwrap_or(0.0));
}

fn saturation(buf: &mut PixelBuffer, value: Option<f32>, _: &RenderOptions) {
    adjust::adjust_saturation(buf, value.unwrap_or(0.0));
}

fn contrast(buf: &mut PixelBuffer, value: Option<f32>, _: &RenderOptions) {
    adjust::adjust_contrast(buf, value.unwrap_or(0.0));
}

fn brightness(buf: &mut PixelBuffer, value: Option<f32>, _: &RenderOptions) {
    adjust::adjust_brightness(buf, value.unwrap_or(0.0));
}

/// `amount` box-blur passes; a fractional amount runs the partial pass too.
fn blur(buf: &mut PixelBuffer, value: Option<f32>, options: &RenderOptions) {
    let amount = value.unwrap_or(0.0);
    if amount <= 0.0 {
        return;
    }
    *buf = box_blur(buf, amount.ceil() as i32, options.edge_mode);
}

fn sharpen(buf: &mut PixelBuffer, value: Option<f32>, options: &RenderOptions) {
    let amount = value.unwrap_or(0.0);
    if amount <= 0.0 {
        return;
    }
    let kernel = Kernel::sharpen(amount / 100.0);
    *buf = convolve(buf, &kernel, options.edge_mode, AlphaMode::Opaque);
}

fn denoise(buf: &mut PixelBuffer, value: Option<f32>, options: &RenderOptions) {
    let amount = value.unwrap_or(0.0);
    if amount <= 0.0 {
        return;
    }
    let kernel = Kernel::denoise(amount / 100.0);
    *buf = convolve(buf, &kernel, options.edge_mode, AlphaMode::Opaque);
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_ops::EdgeMode;

    fn photo() -> PixelBuffer {
        PixelBuffer::from_fn(9, 7, |x, y| {
            [(x * 28) as u8, (y * 36) as u8, ((x * 7 + y * 13) % 256) as u8, 255]
        })
    }

    fn apply(category: &str, effect: &str, value: f32) -> PixelBuffer {
        let catalog = EffectCatalog::builtin();
        let mut buf = photo();
        catalog
            .get(category, effect)
            .unwrap()
            .apply(&mut buf, Some(value), &RenderOptions::default());
        buf
    }

    #[test]
    fn test_builtin_shape() {
        let catalog = EffectCatalog::builtin();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.categories().len(), 2);
        assert_eq!(catalog.category(FILTERS).unwrap().icon, "blur_on");
        assert_eq!(catalog.category(COLORS).unwrap().label, "Colors");

        let ids: Vec<_> = catalog.effects_in(COLORS).map(|d| d.id).collect();
        assert_eq!(ids, vec!["hue", "saturation", "contrast", "brightness"]);
        let ids: Vec<_> = catalog.effects_in(FILTERS).map(|d| d.id).collect();
        assert_eq!(ids, vec!["blur", "sharpen", "denoise"]);
    }

    #[test]
    fn test_builtin_ranges() {
        let catalog = EffectCatalog::builtin();
        let range = |c: &str, e: &str| *catalog.get(c, e).unwrap().parameter.range().unwrap();

        assert_eq!(range(COLORS, "hue"), ScalarRange::new(-180.0, 180.0, 1.0, 0.0));
        assert_eq!(range(COLORS, "contrast").min, -255.0);
        assert_eq!(range(FILTERS, "blur").step, 5.0);
        assert!(!range(FILTERS, "blur").snap_to_center);
        assert!(range(FILTERS, "sharpen").snap_to_center);
    }

    #[test]
    fn test_neutral_values_are_noops() {
        let src = photo();
        for (category, effect) in [
            (COLORS, "hue"),
            (COLORS, "saturation"),
            (COLORS, "contrast"),
            (COLORS, "brightness"),
            (FILTERS, "blur"),
            (FILTERS, "sharpen"),
            (FILTERS, "denoise"),
        ] {
            assert_eq!(apply(category, effect, 0.0), src, "{category}/{effect}");
        }
    }

    #[test]
    fn test_blur_matches_pass_count() {
        let src = photo();
        let out = apply(FILTERS, "blur", 10.0);
        assert_eq!(out, box_blur(&src, 10, EdgeMode::Clamp));
    }

    #[test]
    fn test_sharpen_and_denoise_force_opaque() {
        let translucent = PixelBuffer::filled(3, 3, [50, 60, 70, 40]);
        let catalog = EffectCatalog::builtin();
        for effect in ["sharpen", "denoise"] {
            let mut buf = translucent.clone();
            catalog
                .get(FILTERS, effect)
                .unwrap()
                .apply(&mut buf, Some(50.0), &RenderOptions::default());
            assert!(buf.pixels().all(|p| p == [50, 60, 70, 255]), "{effect}");
        }
    }

    #[test]
    fn test_out_of_range_value_clamped_before_transform() {
        // 400 clamps to 180, the same as rotating by 180.
        assert_eq!(apply(COLORS, "hue", 400.0), apply(COLORS, "hue", 180.0));
        assert_eq!(apply(FILTERS, "blur", 99.0), apply(FILTERS, "blur", 20.0));
    }
}
