//! # Quadrille Render
//!
//! Turns a scene into pixels: the viewport maps scene coordinates to pixel
//! coordinates, the frame composer flattens visible entities into a
//! JSON-serializable draw-op list, and the software rasterizer paints that
//! list into an RGBA buffer deterministically.

pub mod viewport;
pub mod frame;
pub mod raster;

pub use viewport::Viewport;
pub use frame::{RenderFrame, RenderOp};
pub use raster::Raster;
