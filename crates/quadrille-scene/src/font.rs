use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Scene units per typographic point. A 64 pt glyph line occupies roughly
/// one canvas unit, which matches the proportions of the reference frames.
pub const POINTS_PER_UNIT: f64 = 64.0;

/// Line height as a multiple of the em size.
pub const LINE_HEIGHT_EM: f64 = 1.2;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("font file not found: {path}")]
    Missing { path: PathBuf },

    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("font file is empty: {path}")]
    Empty { path: PathBuf },
}

/// A loaded font face with a deterministic advance model.
///
/// Glyph outlines are never parsed; measurement is the contract. Wide
/// (CJK) glyphs advance a full em, everything else half an em, which is
/// exact for the monospaced hybrid faces this pipeline is fed.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    family: String,
    source: PathBuf,
}

impl FontFace {
    /// Read the face from disk. The file must exist and be non-empty.
    pub fn load(path: &Path, family: &str) -> Result<Self, FontError> {
        let data = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FontError::Missing {
                path: path.to_path_buf(),
            },
            _ => FontError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        if data.is_empty() {
            return Err(FontError::Empty {
                path: path.to_path_buf(),
            });
        }
        log::debug!("loaded font face '{}' from {:?} ({} bytes)", family, path, data.len());
        Ok(Self {
            family: family.to_string(),
            source: path.to_path_buf(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Glyph advance in em units.
    pub fn advance_em(&self, ch: char) -> f64 {
        if is_wide(ch) {
            1.0
        } else {
            0.5
        }
    }

    /// Glyph advance in scene units at the given point size.
    pub fn advance_units(&self, ch: char, size_pt: f64) -> f64 {
        self.advance_em(ch) * size_pt / POINTS_PER_UNIT
    }

    /// Line height in scene units at the given point size.
    pub fn line_height_units(&self, size_pt: f64) -> f64 {
        LINE_HEIGHT_EM * size_pt / POINTS_PER_UNIT
    }
}

/// Whether a character occupies a full em cell (CJK ideographs, kana,
/// fullwidth forms, and CJK punctuation).
pub fn is_wide(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x115F      // Hangul Jamo
        | 0x2E80..=0x303E    // CJK radicals, CJK punctuation
        | 0x3041..=0x33FF    // Kana, CJK compatibility
        | 0x3400..=0x4DBF    // CJK extension A
        | 0x4E00..=0x9FFF    // CJK unified ideographs
        | 0xA000..=0xA4CF    // Yi
        | 0xAC00..=0xD7A3    // Hangul syllables
        | 0xF900..=0xFAFF    // CJK compatibility ideographs
        | 0xFE30..=0xFE4F    // CJK compatibility forms
        | 0xFF00..=0xFF60    // Fullwidth forms
        | 0xFFE0..=0xFFE6)
}

/// Registry of font faces addressable by family name.
///
/// Registration is scoped: [`FontLibrary::with_registered`] binds a face for
/// the duration of a closure and removes it before returning, on both the
/// success and the error path.
#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: HashMap<String, FontFace>,
}

impl FontLibrary {
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
        }
    }

    pub fn face(&self, family: &str) -> Option<&FontFace> {
        self.faces.get(family)
    }

    pub fn contains(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    /// Load the face at `path`, bind it under `family`, run `body` with read
    /// access to the library, then unbind the face regardless of the
    /// closure's outcome. A face already bound under the same family is
    /// shadowed for the duration of the scope and restored afterwards.
    pub fn with_registered<T, E>(
        &mut self,
        path: &Path,
        family: &str,
        body: impl FnOnce(&FontLibrary) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<FontError>,
    {
        let face = FontFace::load(path, family)?;
        let shadowed = self.faces.insert(family.to_string(), face);
        log::debug!("registered font family '{}'", family);
        let result = body(self);
        match shadowed {
            Some(previous) => {
                self.faces.insert(family.to_string(), previous);
            }
            None => {
                self.faces.remove(family);
            }
        }
        log::debug!("released font family '{}'", family);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn temp_font(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(b"\x00\x01\x00\x00 not a real outline table").unwrap();
        path
    }

    #[test]
    fn test_missing_font_file() {
        let err = FontFace::load(Path::new("./no-such-font.ttf"), "Ghost").unwrap_err();
        assert!(matches!(err, FontError::Missing { .. }));
    }

    #[test]
    fn test_advance_model() {
        let path = temp_font("quadrille_advance.ttf");
        let face = FontFace::load(&path, "Hybrid").unwrap();
        assert_eq!(face.family(), "Hybrid");
        assert_eq!(face.source(), path.as_path());
        // half em for ASCII, full em for CJK, at 64pt one em is one unit
        assert!((face.advance_units('a', 64.0) - 0.5).abs() < 1e-10);
        assert!((face.advance_units('你', 64.0) - 1.0).abs() < 1e-10);
        assert!((face.line_height_units(64.0) - 1.2).abs() < 1e-10);
    }

    #[test]
    fn test_scoped_registration_released_on_success() {
        let path = temp_font("quadrille_scope_ok.ttf");
        let mut lib = FontLibrary::new();
        let seen: Result<bool, FontError> = lib.with_registered(&path, "Hybrid", |l| {
            Ok(l.contains("Hybrid"))
        });
        assert!(seen.unwrap());
        assert!(!lib.contains("Hybrid"));
    }

    #[test]
    fn test_scoped_registration_restores_shadowed_face() {
        let outer_path = temp_font("quadrille_shadow_outer.ttf");
        let inner_path = temp_font("quadrille_shadow_inner.ttf");
        let mut lib = FontLibrary::new();
        lib.faces
            .insert("Hybrid".to_string(), FontFace::load(&outer_path, "Hybrid").unwrap());

        let seen: Result<PathBuf, FontError> =
            lib.with_registered(&inner_path, "Hybrid", |l| {
                Ok(l.face("Hybrid").unwrap().source().to_path_buf())
            });
        // the scope saw the inner face, the outer face survives it
        assert_eq!(seen.unwrap(), inner_path);
        assert_eq!(lib.face("Hybrid").unwrap().source(), outer_path.as_path());
    }

    #[test]
    fn test_scoped_registration_released_on_error() {
        let path = temp_font("quadrille_scope_err.ttf");
        let mut lib = FontLibrary::new();
        let result: Result<(), FontError> = lib.with_registered(&path, "Hybrid", |_| {
            Err(FontError::Empty {
                path: PathBuf::from("synthetic"),
            })
        });
        assert!(result.is_err());
        assert!(!lib.contains("Hybrid"));
    }
}
