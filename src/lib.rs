#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot deep-zoom renderer
//!
//! A deep zoom is a sequence of frames of the Mandelbrot set, each one
//! looking at the same point through a window a constant factor
//! smaller than the last.  Played back at thirty frames a second the
//! result is a dive into the boundary of the set.
//!
//! Every frame is independent of every other: its viewport follows
//! from the frame index alone, every pixel from the viewport alone.
//! So the frames are farmed out to a pool of workers, one per CPU,
//! each writing its frames to numbered PNG files as it finishes them.
//! Once every worker is done, ffmpeg turns the numbered files into a
//! video.
//!
//! All arithmetic is plain f64.  Past a zoom of roughly 10^13 the
//! spacing between pixels approaches the spacing between f64 values
//! and the frames dissolve into blocks.  A few powers of two deeper
//! the viewport collapses altogether and those frames fail.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
extern crate tempfile;

pub mod colors;
pub mod config;
pub mod errors;
pub mod escape;
pub mod jobs;
pub mod output;
pub mod planes;
pub mod pool;
pub mod render;
pub mod video;

pub use colors::{Color, ColorScheme};
pub use config::Config;
pub use errors::ZoomError;
pub use escape::escape_ratio;
pub use jobs::{FrameJob, JobQueue, ZoomSchedule};
pub use output::{FrameSink, PngDirectory};
pub use planes::{frame_viewport, Pixel, PlaneMapper, Viewport};
pub use pool::{Outcome, RenderStats, WorkerPool};
pub use render::{FrameRenderer, RenderedFrame};
pub use video::{Ffmpeg, VideoAssembler};

/// Render every frame the configuration asks for and hand each to
/// `sink`.  Returns once every frame has been dealt with; frames that
/// failed are listed in the stats, not returned as an error.
pub fn render_frames<S: FrameSink>(config: &Config, sink: &S) -> Result<RenderStats, ZoomError> {
    let jobs = config.schedule.jobs(config.center);
    let renderer = FrameRenderer::new(config);
    let stats = WorkerPool::new(config.threads).run(jobs, &renderer, sink)?;

    info!(
        "{} frames completed in {:.2?}, {:.2?} per frame",
        stats.frames_completed,
        stats.total_elapsed,
        stats.mean_frame_time()
    );
    for &(frame, ref e) in &stats.failures {
        error!("frame {} is missing: {}", frame, e);
    }
    Ok(stats)
}

/// The whole pipeline: render every frame, and if all of them made it
/// to disk and the configuration names a video, assemble it.  A video
/// is never assembled from an incomplete sequence; the frames that did
/// render stay on disk either way.
pub fn run<S: FrameSink, V: VideoAssembler>(
    config: &Config,
    sink: &S,
    assembler: &V,
) -> Result<RenderStats, ZoomError> {
    let stats = render_frames(config, sink)?;
    stats.check()?;
    if let Some(ref video) = config.video {
        info!("assembling {}", video.display());
        assembler.assemble(&config.output_dir, video)?;
        info!("wrote {}", video.display());
    }
    Ok(stats)
}
