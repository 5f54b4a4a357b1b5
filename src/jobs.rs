//! Frame jobs and the queue that hands them out.
//!
//! The whole list of jobs is known before the first frame renders, so
//! the queue is filled once, closed, and then drained by the workers.
//! Every job carries the same zoom center; a worker derives the
//! viewport of its frame from the frame index alone, so nothing about
//! one frame depends on another.

use crossbeam::channel::{self, Receiver};
use num::Complex;

use errors::ZoomError;
use planes::{frame_viewport, Viewport};

/// The frame range and zoom rate of a render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ZoomSchedule {
    start: u32,
    end: u32,
    factor: f64,
}

impl ZoomSchedule {
    /// Frames `start..=end`, each `factor` times deeper than the last.
    pub fn new(start: u32, end: u32, factor: f64) -> Result<ZoomSchedule, ZoomError> {
        if end < start {
            return Err(ZoomError::Config(format!(
                "zoom_end ({}) is before zoom_start ({})",
                end, start
            )));
        }
        if !(factor > 1.0) || !factor.is_finite() {
            return Err(ZoomError::Config(format!(
                "zoom_factor must be a finite number greater than 1, not {}",
                factor
            )));
        }
        Ok(ZoomSchedule { start, end, factor })
    }

    /// First frame index.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last frame index, inclusive.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Per-frame zoom multiplier.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of frames in the schedule.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }

    /// A schedule always covers at least one frame.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// One job per frame, in frame order, all zooming toward `center`.
    pub fn jobs(&self, center: Complex<f64>) -> Vec<FrameJob> {
        (self.start..=self.end)
            .map(|frame_index| FrameJob {
                frame_index,
                center,
                zoom_factor: self.factor,
            })
            .collect()
    }
}

/// The unit of work: one frame of the zoom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameJob {
    frame_index: u32,
    center: Complex<f64>,
    zoom_factor: f64,
}

impl FrameJob {
    /// Which frame this is.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// The point every frame of the render is centered on.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Per-frame zoom multiplier.
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    /// The window this frame looks through.  Fails once the zoom has
    /// gone deeper than f64 can represent.
    pub fn viewport(&self) -> Result<Viewport, ZoomError> {
        frame_viewport(self.center, self.zoom_factor, self.frame_index)
    }
}

/// A closed, multi-consumer queue of frame jobs.  Each job is handed to
/// exactly one caller of `next`; once the queue is drained every
/// caller sees `None`.
#[derive(Clone)]
pub struct JobQueue {
    receiver: Receiver<FrameJob>,
    total: usize,
}

impl JobQueue {
    /// Enqueue every job and close the queue behind them.
    pub fn new(jobs: Vec<FrameJob>) -> JobQueue {
        let total = jobs.len();
        let (sender, receiver) = channel::unbounded();
        for job in jobs {
            // The receiver is alive until the end of this function, so
            // sending cannot fail.
            let _ = sender.send(job);
        }
        // Dropping the sender here closes the queue.
        JobQueue { receiver, total }
    }

    /// Take the next job, if any are left.
    pub fn next(&self) -> Option<FrameJob> {
        self.receiver.recv().ok()
    }

    /// How many jobs the queue was filled with.
    pub fn total(&self) -> usize {
        self.total
    }
}
