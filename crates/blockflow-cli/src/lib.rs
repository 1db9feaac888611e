//! Blockflow CLI library
//!
//! This module contains the core CLI logic for the Blockflow diagram tool.

pub mod error_adapter;

mod args;
mod config;
mod error;
mod scene_file;

pub use args::Args;
pub use config::ConfigError;
pub use error::CliError;
pub use error_adapter::ErrorAdapter;

use std::{fs, path::Path, time::Duration};

use log::{info, trace};

use blockflow::{Scene, SceneBuilder, animation::ClockDriver};

/// Run the Blockflow CLI application
///
/// Loads the configuration and the scene file, builds the scene and writes
/// one of three outputs:
/// - a single frame at `--at` (or once every reveal has finished) to `--output`
/// - the self-animating document to `--output` with `--animated`
/// - `--frames` frames of simulated time into `--frames-dir`
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scene files
/// - Scene construction errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scene"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let definition = scene_file::load_scene(&args.input)?;

    // Output is batch-rendered; simulated time replaces the timer thread
    let mut scene = SceneBuilder::new(app_config)
        .with_driver(ClockDriver::Manual)
        .build(&definition)?;

    if let Some(count) = args.frames {
        return write_frames(&mut scene, count, args.fps, Path::new(&args.frames_dir));
    }

    let svg = if args.animated {
        scene.render_animated()?
    } else {
        let at = args.at.unwrap_or_else(|| scene.settle_time());
        info!(at_secs = at.as_secs_f32(); "Rendering frame");
        scene.render_frame(at)?
    };

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

fn write_frames(scene: &mut Scene, count: u32, fps: u32, dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir)?;

    let step = Duration::from_secs(1) / fps;
    let _ticks = scene.mount()?;

    for index in 0..count {
        let svg = scene.render_frame(step * index)?;
        let path = dir.join(format!("frame_{index:04}.svg"));
        fs::write(&path, svg)?;
        trace!(frame = index, phase = scene.phase(); "Frame written");
        scene.tick(step);
    }

    scene.unmount();
    info!(
        frames = count,
        fps,
        frames_dir = dir.display().to_string();
        "Frames exported successfully"
    );
    Ok(())
}
