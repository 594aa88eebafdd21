use crate::frame::{RenderFrame, RenderOp};

/// An RGBA8 pixel buffer. Painting the same frame always yields the same
/// bytes; there is no randomness, no time dependence, and no threading.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

fn to_rgba8(color: [f32; 4]) -> [u8; 4] {
    let chan = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [chan(color[0]), chan(color[1]), chan(color[2]), chan(color[3])]
}

impl Raster {
    pub fn new(width: u32, height: u32, background: [f32; 4]) -> Self {
        let bg = to_rgba8(background);
        // sized in usize: the pixel count can exceed u32 at large scales
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&bg);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Paint every op of the frame, in order, over the background.
    pub fn paint(frame: &RenderFrame) -> Self {
        let mut raster = Self::new(frame.width_px, frame.height_px, frame.background);
        for op in &frame.ops {
            raster.draw(op);
        }
        log::debug!(
            "rasterized '{}' at {}x{}",
            frame.scene_name,
            frame.width_px,
            frame.height_px
        );
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    fn set_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, rgba: [u8; 4]) {
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, rgba);
            }
        }
    }

    fn draw(&mut self, op: &RenderOp) {
        match *op {
            RenderOp::Stroke {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let rgba = to_rgba8(color);
                let dx = x2 - x1;
                let dy = y2 - y1;
                let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
                let brush = width.max(1.0);
                for i in 0..=(steps as u64) {
                    let t = i as f64 / steps;
                    let cx = x1 + dx * t;
                    let cy = y1 + dy * t;
                    self.fill_rect(cx - brush / 2.0, cy - brush / 2.0, brush, brush, rgba);
                }
            }
            RenderOp::Disc {
                cx,
                cy,
                radius,
                color,
            } => {
                let rgba = to_rgba8(color);
                let r = radius.max(0.5);
                let x0 = (cx - r).floor() as i64;
                let x1 = (cx + r).ceil() as i64;
                let y0 = (cy - r).floor() as i64;
                let y1 = (cy + r).ceil() as i64;
                for py in y0..=y1 {
                    for px in x0..=x1 {
                        let fx = px as f64 + 0.5 - cx;
                        let fy = py as f64 + 0.5 - cy;
                        if fx * fx + fy * fy <= r * r {
                            self.set_pixel(px, py, rgba);
                        }
                    }
                }
            }
            RenderOp::GlyphBox {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.fill_rect(x, y, width, height, to_rgba8(color));
            }
        }
    }

    /// Encode as binary PPM (P6), dropping the alpha channel.
    pub fn encode_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out =
            Vec::with_capacity(header.len() + self.width as usize * self.height as usize * 3);
        out.extend_from_slice(header.as_bytes());
        for chunk in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&chunk[..3]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn frame_with(ops: Vec<RenderOp>) -> RenderFrame {
        RenderFrame {
            scene_name: "show".to_string(),
            width_px: 100,
            height_px: 80,
            background: BLACK,
            ops,
        }
    }

    #[test]
    fn test_disc_paints_its_center() {
        let frame = frame_with(vec![RenderOp::Disc {
            cx: 50.0,
            cy: 40.0,
            radius: 8.0,
            color: [252.0 / 255.0, 98.0 / 255.0, 85.0 / 255.0, 1.0],
        }]);
        let raster = Raster::paint(&frame);
        assert_eq!(raster.pixel(50, 40).unwrap(), [252, 98, 85, 255]);
        // well outside the disc stays background
        assert_eq!(raster.pixel(5, 5).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_stroke_covers_both_endpoints() {
        let frame = frame_with(vec![RenderOp::Stroke {
            x1: 10.0,
            y1: 10.0,
            x2: 90.0,
            y2: 10.0,
            width: 2.0,
            color: WHITE,
        }]);
        let raster = Raster::paint(&frame);
        assert_eq!(raster.pixel(10, 10).unwrap(), [255, 255, 255, 255]);
        assert_eq!(raster.pixel(89, 10).unwrap(), [255, 255, 255, 255]);
        assert_eq!(raster.pixel(50, 40).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_glyph_box_fill() {
        let frame = frame_with(vec![RenderOp::GlyphBox {
            x: 20.0,
            y: 20.0,
            width: 10.0,
            height: 12.0,
            color: WHITE,
        }]);
        let raster = Raster::paint(&frame);
        assert_eq!(raster.pixel(25, 25).unwrap(), [255, 255, 255, 255]);
        assert_eq!(raster.pixel(19, 25).unwrap(), [0, 0, 0, 255]);
    }

    #[test]
    fn test_painting_is_deterministic() {
        let frame = frame_with(vec![
            RenderOp::Stroke {
                x1: 0.0,
                y1: 0.0,
                x2: 99.0,
                y2: 79.0,
                width: 3.0,
                color: WHITE,
            },
            RenderOp::Disc {
                cx: 30.0,
                cy: 30.0,
                radius: 5.0,
                color: WHITE,
            },
        ]);
        let a = Raster::paint(&frame);
        let b = Raster::paint(&frame);
        assert_eq!(a, b);
        assert_eq!(a.encode_ppm(), b.encode_ppm());
    }

    #[test]
    fn test_ppm_layout() {
        let frame = frame_with(vec![]);
        let ppm = Raster::paint(&frame).encode_ppm();
        assert!(ppm.starts_with(b"P6\n100 80\n255\n"));
        let header_len = b"P6\n100 80\n255\n".len();
        assert_eq!(ppm.len(), header_len + 100 * 80 * 3);
    }

    #[test]
    fn test_out_of_bounds_draws_are_clipped() {
        let frame = frame_with(vec![RenderOp::Disc {
            cx: -50.0,
            cy: -50.0,
            radius: 10.0,
            color: WHITE,
        }]);
        let raster = Raster::paint(&frame);
        assert_eq!(raster.pixel(0, 0).unwrap(), [0, 0, 0, 255]);
    }
}
