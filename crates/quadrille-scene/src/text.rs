use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::font::{FontFace, FontLibrary};
use crate::geometry::{BBox, Vec2};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("font family '{family}' is not registered")]
    UnknownFamily { family: String },

    #[error("text target width must be positive, got {width}")]
    NonPositiveWidth { width: f64 },
}

/// Typographic parameters for a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub family: String,
    /// Font size in typographic points.
    pub size_pt: f64,
    /// Stretch inter-word gaps so every line but the last fills the target
    /// width exactly.
    pub justify: bool,
    /// Wrap width in scene units.
    pub target_width: f64,
    /// If set and the laid-out block is taller, the whole block is scaled
    /// down uniformly to fit.
    pub target_height: Option<f64>,
}

impl TextStyle {
    pub fn new(family: &str, size_pt: f64, target_width: f64) -> Self {
        Self {
            family: family.to_string(),
            size_pt,
            justify: false,
            target_width,
            target_height: None,
        }
    }

    pub fn justified(mut self) -> Self {
        self.justify = true;
        self
    }

    pub fn with_target_height(mut self, height: f64) -> Self {
        self.target_height = Some(height);
        self
    }
}

/// A glyph placed on a line, at an x offset from the line's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedGlyph {
    pub ch: char,
    pub x: f64,
    pub advance: f64,
}

/// One laid-out line. `top` is the offset of the line slot from the top
/// edge of the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub glyphs: Vec<PlacedGlyph>,
    pub width: f64,
    pub top: f64,
    pub height: f64,
}

// Wrap tokens: a run of non-space glyphs, a collapsed space, or a single
// wide (CJK) glyph, which may break on either side.
#[derive(Debug, Clone)]
enum Token {
    Word(Vec<PlacedGlyph>),
    Space(PlacedGlyph),
}

impl Token {
    fn advance(&self) -> f64 {
        match self {
            Token::Word(glyphs) => glyphs.iter().map(|g| g.advance).sum(),
            Token::Space(g) => g.advance,
        }
    }
}

/// A justified, wrapped block of mixed-script text, measured at layout time
/// and positioned by its center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    content: String,
    style: TextStyle,
    lines: Vec<TextLine>,
    width: f64,
    height: f64,
    /// Center of the block in scene coordinates.
    position: Vec2,
}

impl TextBlock {
    /// Lay out `content` with `style`, resolving the face through the
    /// registered `fonts`. The block starts centered at the origin.
    pub fn layout(
        content: &str,
        style: TextStyle,
        fonts: &FontLibrary,
    ) -> Result<Self, LayoutError> {
        if style.target_width <= 0.0 {
            return Err(LayoutError::NonPositiveWidth {
                width: style.target_width,
            });
        }
        let face = fonts
            .face(&style.family)
            .ok_or_else(|| LayoutError::UnknownFamily {
                family: style.family.clone(),
            })?;

        let tokens = tokenize(content, face, style.size_pt);
        let line_height = face.line_height_units(style.size_pt);
        let mut lines = break_lines(&tokens, style.target_width, line_height);

        if style.justify {
            justify_lines(&mut lines, style.target_width);
        }

        let mut width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        let mut height = lines.len() as f64 * line_height;

        // Fit-to-box scaling can only shrink, so the wrap-width bound holds.
        let mut scale = 1.0_f64;
        if width > style.target_width {
            scale = style.target_width / width;
        }
        if let Some(target_height) = style.target_height {
            if height * scale > target_height {
                scale = scale.min(target_height / height);
            }
        }
        if scale < 1.0 {
            for line in &mut lines {
                line.width *= scale;
                line.top *= scale;
                line.height *= scale;
                for glyph in &mut line.glyphs {
                    glyph.x *= scale;
                    glyph.advance *= scale;
                }
            }
            width *= scale;
            height *= scale;
            log::debug!("text block scaled by {:.4} to fit its target box", scale);
        }

        Ok(Self {
            content: content.to_string(),
            style,
            lines,
            width,
            height,
            position: Vec2::ZERO,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn bbox(&self) -> BBox {
        BBox::centered(self.position, self.width, self.height)
    }

    // ── Edge midpoints (anchor points for relative placement) ───────

    pub fn edge_left(&self) -> Vec2 {
        self.bbox().left_mid()
    }

    pub fn edge_right(&self) -> Vec2 {
        self.bbox().right_mid()
    }

    pub fn edge_top(&self) -> Vec2 {
        self.bbox().top_mid()
    }

    pub fn edge_bottom(&self) -> Vec2 {
        self.bbox().bottom_mid()
    }

    /// Translate the block by `delta`.
    pub fn shift(&mut self, delta: Vec2) {
        self.position = self.position + delta;
    }

    /// Scene-space box of every placed glyph, in reading order. Glyph boxes
    /// occupy the full advance horizontally and the glyph body (everything
    /// above the internal leading) vertically.
    pub fn glyph_rects(&self) -> Vec<(char, BBox)> {
        let origin_x = self.position.x - self.width / 2.0;
        let origin_y = self.position.y + self.height / 2.0;
        let mut rects = Vec::new();
        for line in &self.lines {
            let body = line.height / crate::font::LINE_HEIGHT_EM;
            let top = origin_y - line.top - (line.height - body) / 2.0;
            for glyph in &line.glyphs {
                if glyph.ch == ' ' {
                    continue;
                }
                let left = origin_x + glyph.x;
                rects.push((
                    glyph.ch,
                    BBox::new(
                        Vec2::new(left, top - body),
                        Vec2::new(left + glyph.advance, top),
                    ),
                ));
            }
        }
        rects
    }
}

fn tokenize(content: &str, face: &FontFace, size_pt: f64) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<PlacedGlyph> = Vec::new();
    let mut pending_space = false;

    let glyph = |ch: char| PlacedGlyph {
        ch,
        x: 0.0,
        advance: face.advance_units(ch, size_pt),
    };

    for ch in content.chars() {
        if ch.is_whitespace() {
            // collapse whitespace runs into a single space token
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            pending_space = true;
            continue;
        }
        if pending_space {
            tokens.push(Token::Space(glyph(' ')));
            pending_space = false;
        }
        if crate::font::is_wide(ch) {
            // a wide glyph is its own wrap unit
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            tokens.push(Token::Word(vec![glyph(ch)]));
        } else {
            word.push(glyph(ch));
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

fn break_lines(tokens: &[Token], target_width: f64, line_height: f64) -> Vec<TextLine> {
    let mut lines: Vec<TextLine> = Vec::new();
    let mut current: Vec<PlacedGlyph> = Vec::new();
    let mut cursor = 0.0_f64;

    let flush = |current: &mut Vec<PlacedGlyph>, cursor: &mut f64, lines: &mut Vec<TextLine>| {
        // drop a trailing space left at the wrap point
        while current.last().map(|g| g.ch == ' ').unwrap_or(false) {
            let dropped = current.pop();
            if let Some(g) = dropped {
                *cursor -= g.advance;
            }
        }
        if current.is_empty() {
            return;
        }
        lines.push(TextLine {
            glyphs: std::mem::take(current),
            width: *cursor,
            top: lines.len() as f64 * line_height,
            height: line_height,
        });
        *cursor = 0.0;
    };

    for token in tokens {
        match token {
            Token::Space(g) => {
                if !current.is_empty() {
                    let mut g = *g;
                    g.x = cursor;
                    cursor += g.advance;
                    current.push(g);
                }
            }
            Token::Word(glyphs) => {
                if cursor + token.advance() > target_width && !current.is_empty() {
                    flush(&mut current, &mut cursor, &mut lines);
                }
                for g in glyphs {
                    // hard-break a token that cannot fit on any line
                    if cursor + g.advance > target_width && !current.is_empty() {
                        flush(&mut current, &mut cursor, &mut lines);
                    }
                    let mut g = *g;
                    g.x = cursor;
                    cursor += g.advance;
                    current.push(g);
                }
            }
        }
    }
    flush(&mut current, &mut cursor, &mut lines);
    lines
}

/// Stretch every line but the last to the target width by widening spaces,
/// or inter-glyph gaps on lines with no spaces.
fn justify_lines(lines: &mut [TextLine], target_width: f64) {
    let count = lines.len();
    for line in lines.iter_mut().take(count.saturating_sub(1)) {
        let slack = target_width - line.width;
        if slack <= 0.0 || line.glyphs.len() < 2 {
            continue;
        }
        let space_count = line.glyphs.iter().filter(|g| g.ch == ' ').count();
        if space_count > 0 {
            let per_space = slack / space_count as f64;
            for g in line.glyphs.iter_mut() {
                if g.ch == ' ' {
                    g.advance += per_space;
                }
            }
        } else {
            let per_gap = slack / (line.glyphs.len() - 1) as f64;
            let last = line.glyphs.len() - 1;
            for g in line.glyphs.iter_mut().take(last) {
                g.advance += per_gap;
            }
        }
        // reflow x offsets after stretching
        let mut cursor = 0.0;
        for g in line.glyphs.iter_mut() {
            g.x = cursor;
            cursor += g.advance;
        }
        line.width = cursor;
    }
}
