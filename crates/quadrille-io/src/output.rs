use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use quadrille_render::{Raster, RenderFrame};

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Paths of the files a render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFrame {
    pub frame_json: PathBuf,
    pub raster_image: PathBuf,
}

/// Persists composed frames under an output directory, creating the
/// directory tree on first use.
#[derive(Debug, Clone)]
pub struct FrameWriter {
    out_dir: PathBuf,
}

impl FrameWriter {
    pub fn new(out_dir: &Path) -> Self {
        Self {
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Write `<scene>.json` (the draw-op stream) and `<scene>.ppm` (the
    /// rasterized image).
    pub fn write(&self, frame: &RenderFrame, raster: &Raster) -> Result<WrittenFrame, OutputError> {
        fs::create_dir_all(&self.out_dir).map_err(|e| OutputError::CreateDir {
            path: self.out_dir.clone(),
            source: e,
        })?;

        let frame_json = self.out_dir.join(format!("{}.json", frame.scene_name));
        let json = frame.to_json()?;
        fs::write(&frame_json, json).map_err(|e| OutputError::Write {
            path: frame_json.clone(),
            source: e,
        })?;

        let raster_image = self.out_dir.join(format!("{}.ppm", frame.scene_name));
        fs::write(&raster_image, raster.encode_ppm()).map_err(|e| OutputError::Write {
            path: raster_image.clone(),
            source: e,
        })?;

        log::info!("wrote {:?} and {:?}", frame_json, raster_image);
        Ok(WrittenFrame {
            frame_json,
            raster_image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_frame() -> RenderFrame {
        RenderFrame {
            scene_name: "show".to_string(),
            width_px: 10,
            height_px: 10,
            background: [0.0, 0.0, 0.0, 1.0],
            ops: Vec::new(),
        }
    }

    #[test]
    fn test_write_creates_directory_and_files() {
        let dir = std::env::temp_dir().join("quadrille_out_test/media/images");
        let _ = fs::remove_dir_all(&dir);

        let frame = small_frame();
        let raster = Raster::paint(&frame);
        let written = FrameWriter::new(&dir).write(&frame, &raster).unwrap();

        assert!(written.frame_json.exists());
        assert!(written.raster_image.exists());
        assert_eq!(written.frame_json.file_name().unwrap(), "show.json");
        assert_eq!(written.raster_image.file_name().unwrap(), "show.ppm");

        let back = RenderFrame::from_json(&fs::read_to_string(&written.frame_json).unwrap());
        assert_eq!(back.unwrap(), frame);
    }

    #[test]
    fn test_reruns_are_bit_identical() {
        let dir = std::env::temp_dir().join("quadrille_out_repeat");
        let _ = fs::remove_dir_all(&dir);

        let frame = small_frame();
        let raster = Raster::paint(&frame);
        let writer = FrameWriter::new(&dir);

        writer.write(&frame, &raster).unwrap();
        let first = fs::read(dir.join("show.ppm")).unwrap();
        writer.write(&frame, &raster).unwrap();
        let second = fs::read(dir.join("show.ppm")).unwrap();
        assert_eq!(first, second);
    }
}
