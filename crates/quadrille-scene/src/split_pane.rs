//! The split-pane diagram: two dividers partitioning the canvas into panes,
//! plus one justified bilingual passage annotated with two marker dots.

use std::path::PathBuf;

use thiserror::Error;

use crate::entity::{Color, LineSegment, MarkerDot, SceneEntity};
use crate::font::{FontError, FontLibrary};
use crate::geometry::{Canvas, Vec2};
use crate::scene::Scene;
use crate::text::{LayoutError, TextBlock, TextStyle};

/// The bilingual passage placed in the upper-left pane. Adjacent fragments
/// run together with no separator, as in the source material.
pub const DEFAULT_PASSAGE: &str = concat!(
    "In the business world, when dealing with an iconic company's",
    "patent issues, there is often no quick consensus sdaf",
    "patent issues, there is often no 你好 consensus sdaf",
    "patent issues, there is often no quick consensus sdaf",
    "patent issues, there is often no 你好 consensus sdaf",
    "patent issues, there is often no quick consensus sdaf",
    "patent issues, there is often no 你好 consensus sdaf",
    "patent issues, there is often no quick consensus sdaf",
    "patent issues, there is often no 你好 consensus sdaf",
    "patent issues, there is often no quick consensus sdaf",
    "patent issues, there is often no 你好 consensus sdaf",
);

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Signature of the function that turns a laid-out text block into the
/// extra shift applied on top of the base placement vector.
pub type OffsetFn = fn(&TextBlock) -> Vec2;

/// The shift offset observed in the source material: the vector sum of the
/// block's right-edge and bottom-edge midpoints, i.e. its bottom-right
/// corner while the block is still centered at the origin. Kept behind this
/// seam so a corrected placement can be swapped in via
/// [`SplitPaneDiagram::offset_fn`] without disturbing the rest of the
/// layout.
pub fn corner_sum_offset(block: &TextBlock) -> Vec2 {
    block.edge_right() + block.edge_bottom()
}

/// Builds the split-pane scene from explicit inputs. Every field carries
/// the literal the original composition hard-coded, so a default-constructed
/// diagram reproduces the reference frame.
#[derive(Debug, Clone)]
pub struct SplitPaneDiagram {
    pub name: String,
    pub canvas: Canvas,
    /// X offset of the vertical divider, right of center. The horizontal
    /// divider also ends here.
    pub divider_inset: f64,
    pub passage: String,
    pub font_path: PathBuf,
    pub font_family: String,
    pub font_size_pt: f64,
    /// Target width of the justified text block, in scene units.
    pub text_width: f64,
    /// Target height the block is scaled down to fit, in scene units.
    pub text_height: f64,
    /// Base translation applied to the text block after layout.
    pub base_shift: Vec2,
    pub marker_color: Color,
    /// Extra shift derived from the block's own geometry; defaults to
    /// [`corner_sum_offset`].
    pub offset_fn: OffsetFn,
}

impl SplitPaneDiagram {
    pub fn new(canvas: Canvas, font_path: PathBuf, font_family: &str) -> Self {
        Self {
            name: "show".to_string(),
            canvas,
            divider_inset: 1.0,
            passage: DEFAULT_PASSAGE.to_string(),
            font_path,
            font_family: font_family.to_string(),
            font_size_pt: 48.0,
            text_width: 7.0,
            text_height: 4.0,
            base_shift: Vec2::new(-6.5, 3.5),
            marker_color: Color::HIGHLIGHT_RED,
            offset_fn: corner_sum_offset,
        }
    }

    /// Assemble the scene. Draw order: vertical divider, horizontal divider,
    /// the two marker dots, then the translated text block. Dot positions
    /// are taken from the block before its translation is applied. Any font
    /// or layout failure propagates and no scene escapes.
    pub fn build(&self, fonts: &mut FontLibrary) -> Result<Scene, DiagramError> {
        let mut scene = Scene::new(&self.name);
        let half_w = self.canvas.half_width();
        let half_h = self.canvas.half_height();

        // vertical divider: splits the canvas into left and right panes
        scene.add(SceneEntity::Line(LineSegment::new(
            Vec2::new(self.divider_inset, half_h),
            Vec2::new(self.divider_inset, -half_h),
        )));

        // horizontal divider: splits the left pane into top and bottom
        scene.add(SceneEntity::Line(LineSegment::new(
            Vec2::new(-half_w, 0.0),
            Vec2::new(self.divider_inset, 0.0),
        )));

        let style = TextStyle::new(&self.font_family, self.font_size_pt, self.text_width)
            .justified()
            .with_target_height(self.text_height);

        let (dots, text) =
            fonts.with_registered(&self.font_path, &self.font_family, |lib| {
                let mut text = TextBlock::layout(&self.passage, style, lib)
                    .map_err(DiagramError::from)?;
                let offset = (self.offset_fn)(&text);
                let dots = [
                    MarkerDot::new(text.edge_right() + text.edge_top(), self.marker_color),
                    MarkerDot::new(text.edge_left() + text.edge_top(), self.marker_color),
                ];
                text.shift(self.base_shift + offset);
                Ok::<_, DiagramError>((dots, text))
            })?;

        for dot in dots {
            scene.add(SceneEntity::Dot(dot));
        }
        scene.add(SceneEntity::Text(text));

        log::info!(
            "built scene '{}': {} entities on a {}x{} canvas",
            scene.name,
            scene.len(),
            self.canvas.width(),
            self.canvas.height()
        );
        Ok(scene)
    }
}
