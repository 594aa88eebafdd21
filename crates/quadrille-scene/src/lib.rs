//! # Quadrille Scene
//!
//! Scene graph for the Quadrille split-pane diagram composer: geometry
//! primitives, drawable entities, deterministic mixed-script text layout,
//! a scoped font registry, spatial indexing (R-tree), and the split-pane
//! diagram builder itself.
//!
//! This crate is the heart of the Quadrille pipeline.

pub mod geometry;
pub mod entity;
pub mod font;
pub mod text;
pub mod scene;
pub mod spatial;
pub mod split_pane;

pub use geometry::{Vec2, BBox, Canvas};
pub use entity::{Color, LineSegment, MarkerDot, SceneEntity};
pub use font::{FontFace, FontLibrary, FontError};
pub use text::{TextBlock, TextStyle, LayoutError};
pub use scene::Scene;
pub use split_pane::{SplitPaneDiagram, DiagramError, corner_sum_offset};
