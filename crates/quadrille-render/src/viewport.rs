use serde::{Deserialize, Serialize};

use quadrille_scene::{BBox, Canvas, Vec2};

/// Maps scene coordinates (origin at canvas center, +y up) to pixel
/// coordinates (origin at the top-left corner, +y down).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    /// Canvas width in scene units.
    pub frame_width: f64,
    /// Canvas height in scene units.
    pub frame_height: f64,
    /// Scale factor (pixels per scene unit).
    pub pixels_per_unit: f64,
}

impl Viewport {
    pub fn new(canvas: Canvas, pixels_per_unit: f64) -> Self {
        Self {
            frame_width: canvas.width(),
            frame_height: canvas.height(),
            pixels_per_unit: pixels_per_unit.max(f64::EPSILON),
        }
    }

    pub fn pixel_width(&self) -> u32 {
        (self.frame_width * self.pixels_per_unit).round() as u32
    }

    pub fn pixel_height(&self) -> u32 {
        (self.frame_height * self.pixels_per_unit).round() as u32
    }

    /// Convert a scene point to pixel coordinates (flips the Y axis).
    pub fn to_pixels(&self, p: Vec2) -> (f64, f64) {
        (
            (p.x + self.frame_width / 2.0) * self.pixels_per_unit,
            (self.frame_height / 2.0 - p.y) * self.pixels_per_unit,
        )
    }

    /// Scale a scene-unit length to pixels.
    pub fn scale(&self, units: f64) -> f64 {
        units * self.pixels_per_unit
    }

    /// The visible region in scene coordinates, used for culling.
    pub fn visible_bounds(&self) -> BBox {
        BBox::centered(Vec2::ZERO, self.frame_width, self.frame_height)
    }
}
