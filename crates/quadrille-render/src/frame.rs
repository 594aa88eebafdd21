use serde::{Deserialize, Serialize};

use quadrille_scene::spatial::SceneIndex;
use quadrille_scene::{Scene, SceneEntity};

use crate::viewport::Viewport;

/// A single draw operation in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderOp {
    /// A stroked segment.
    Stroke {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: [f32; 4],
    },
    /// A filled disc.
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: [f32; 4],
    },
    /// A greeked glyph: text is painted as one filled box per glyph
    /// advance, which preserves measured placement without outline data.
    GlyphBox {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: [f32; 4],
    },
}

/// A complete frame: everything the rasterizer (or an external canvas
/// consuming the JSON form) needs to reproduce the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub scene_name: String,
    pub width_px: u32,
    pub height_px: u32,
    pub background: [f32; 4],
    pub ops: Vec<RenderOp>,
}

impl RenderFrame {
    /// Flatten the scene into draw ops. Entities outside the viewport are
    /// culled through the spatial index; survivors are emitted in scene
    /// draw order.
    pub fn compose(scene: &Scene, viewport: &Viewport, background: [f32; 4]) -> Self {
        let index = SceneIndex::build(scene);
        let bounds = viewport.visible_bounds();
        let mut visible: Vec<usize> = index
            .query_region(&bounds)
            .iter()
            .map(|e| e.entity_index)
            .collect();
        visible.sort_unstable();

        let mut ops = Vec::new();
        for idx in &visible {
            let Some(entity) = scene.get(*idx) else {
                continue;
            };
            match entity {
                SceneEntity::Line(line) => {
                    let (x1, y1) = viewport.to_pixels(line.start);
                    let (x2, y2) = viewport.to_pixels(line.end);
                    ops.push(RenderOp::Stroke {
                        x1,
                        y1,
                        x2,
                        y2,
                        width: viewport.scale(line.stroke_width).max(1.0),
                        color: line.color.to_f32_array(1.0),
                    });
                }
                SceneEntity::Dot(dot) => {
                    let (cx, cy) = viewport.to_pixels(dot.center);
                    ops.push(RenderOp::Disc {
                        cx,
                        cy,
                        radius: viewport.scale(dot.radius),
                        color: dot.color.to_f32_array(1.0),
                    });
                }
                SceneEntity::Text(text) => {
                    for (_, rect) in text.glyph_rects() {
                        let (x, y) = viewport.to_pixels(rect.top_left());
                        ops.push(RenderOp::GlyphBox {
                            x,
                            y,
                            width: viewport.scale(rect.width()),
                            height: viewport.scale(rect.height()),
                            color: [1.0, 1.0, 1.0, 1.0],
                        });
                    }
                }
            }
        }

        log::debug!(
            "composed frame for '{}': {} of {} entities visible, {} ops",
            scene.name,
            visible.len(),
            scene.len(),
            ops.len()
        );

        Self {
            scene_name: scene.name.clone(),
            width_px: viewport.pixel_width(),
            height_px: viewport.pixel_height(),
            background,
            ops,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
