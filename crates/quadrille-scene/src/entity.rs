use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Vec2};
use crate::text::TextBlock;

/// RGB color for scene entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// The highlight red used for marker annotations (#FC6255).
    pub const HIGHLIGHT_RED: Color = Color::new(0xFC, 0x62, 0x55);
    pub const WHITE: Color = Color::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_f32_array(&self, opacity: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            opacity,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// A straight stroke between two scene points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    pub color: Color,
}

impl LineSegment {
    pub const DEFAULT_STROKE_WIDTH: f64 = 0.04;

    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn is_vertical(&self) -> bool {
        (self.start.x - self.end.x).abs() < 1e-9
    }

    pub fn is_horizontal(&self) -> bool {
        (self.start.y - self.end.y).abs() < 1e-9
    }

    pub fn bbox(&self) -> BBox {
        let half = self.stroke_width / 2.0;
        BBox::new(
            Vec2::new(
                self.start.x.min(self.end.x) - half,
                self.start.y.min(self.end.y) - half,
            ),
            Vec2::new(
                self.start.x.max(self.end.x) + half,
                self.start.y.max(self.end.y) + half,
            ),
        )
    }
}

/// A small filled disc annotating a coordinate of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerDot {
    pub center: Vec2,
    /// Radius in scene units.
    pub radius: f64,
    pub color: Color,
}

impl MarkerDot {
    pub const DEFAULT_RADIUS: f64 = 0.08;

    pub fn new(center: Vec2, color: Color) -> Self {
        Self {
            center,
            radius: Self::DEFAULT_RADIUS,
            color,
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::centered(self.center, self.radius * 2.0, self.radius * 2.0)
    }
}

/// A drawable entity in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEntity {
    Line(LineSegment),
    Dot(MarkerDot),
    Text(TextBlock),
}

impl SceneEntity {
    pub fn bbox(&self) -> BBox {
        match self {
            SceneEntity::Line(l) => l.bbox(),
            SceneEntity::Dot(d) => d.bbox(),
            SceneEntity::Text(t) => t.bbox(),
        }
    }

    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SceneEntity::Line(_) => "line",
            SceneEntity::Dot(_) => "dot",
            SceneEntity::Text(_) => "text",
        }
    }
}
