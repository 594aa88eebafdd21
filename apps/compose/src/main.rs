//! One-shot pipeline: config → fonts → scene → frame → raster → files.
//!
//! Takes an optional config-file path as the sole argument; without one the
//! built-in defaults reproduce the reference composition.

use std::error::Error;
use std::path::PathBuf;
use std::process;

use quadrille_io::{FrameWriter, RenderConfig};
use quadrille_render::{Raster, RenderFrame, Viewport};
use quadrille_scene::{FontLibrary, SplitPaneDiagram};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("render failed: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = cause.source();
        }
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::load(&PathBuf::from(path))?,
        None => RenderConfig::default(),
    };

    let diagram = SplitPaneDiagram::new(
        config.canvas(),
        config.font_path.clone(),
        &config.font_family,
    );

    let mut fonts = FontLibrary::new();
    let mut scene = diagram.build(&mut fonts)?;
    scene.name = config.scene_name.clone();

    let viewport = Viewport::new(config.canvas(), config.pixels_per_unit);
    let frame = RenderFrame::compose(&scene, &viewport, config.background);
    let raster = Raster::paint(&frame);

    let written = FrameWriter::new(&config.output_dir).write(&frame, &raster)?;
    log::info!(
        "rendered scene '{}' to {}",
        scene.name,
        written.raster_image.display()
    );
    Ok(())
}
