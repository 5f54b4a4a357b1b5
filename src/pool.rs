// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The worker pool.
//!
//! A fixed number of scoped threads drain a shared `JobQueue`.  Each
//! worker renders a frame, hands it to the sink, and notes how it went
//! in a report list of its own; nothing else is shared except an atomic
//! count of finished frames.  The end of the crossbeam scope is the
//! completion barrier: the coordinator only gets to look at the
//! reports once every worker has run out of jobs.
//!
//! A frame that fails, whether it could not be rendered or could not
//! be written, is recorded as failed and the worker moves on to the
//! next job.  Nothing is retried.

use crossbeam::thread::ScopedJoinHandle;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use errors::ZoomError;
use jobs::{FrameJob, JobQueue};
use output::FrameSink;
use render::FrameRenderer;

/// What became of one frame.
#[derive(Debug)]
pub struct FrameReport {
    /// The frame.
    pub frame_index: u32,
    /// Time spent rendering and writing it.
    pub elapsed: Duration,
    /// Where it was written, or why it was not.
    pub result: Result<PathBuf, ZoomError>,
}

/// How a whole run went.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every frame is on disk.
    Success,
    /// Some frames are on disk, some are not.
    PartialFailure,
    /// No frame made it.
    Failure,
}

/// Totals for a run, assembled by the coordinator after the barrier.
#[derive(Debug, Default)]
pub struct RenderStats {
    /// Frames rendered and written.
    pub frames_completed: usize,
    /// What the workers' shared counter read once the barrier released:
    /// the number of jobs taken off the queue and finished, either way.
    pub frames_processed: usize,
    /// Frames that failed, with the reason, in frame order.
    pub failures: Vec<(u32, ZoomError)>,
    /// Wall-clock time from the first dequeue to the barrier.
    pub total_elapsed: Duration,
    /// Sum of the per-frame times across all workers.
    pub frame_time: Duration,
}

impl RenderStats {
    /// Number of frames that failed.
    pub fn frames_failed(&self) -> usize {
        self.failures.len()
    }

    /// Number of frames attempted.
    pub fn frames_total(&self) -> usize {
        self.frames_completed + self.frames_failed()
    }

    /// Mean time a single frame took, across all workers.
    pub fn mean_frame_time(&self) -> Duration {
        match self.frames_total() {
            0 => Duration::from_secs(0),
            n => self.frame_time / (n as u32),
        }
    }

    /// Classify the run.
    pub fn outcome(&self) -> Outcome {
        match (self.frames_completed, self.frames_failed()) {
            (_, 0) => Outcome::Success,
            (0, _) => Outcome::Failure,
            _ => Outcome::PartialFailure,
        }
    }

    /// Ok if every frame made it, otherwise the count of failures.
    pub fn check(&self) -> Result<(), ZoomError> {
        match self.outcome() {
            Outcome::Success => Ok(()),
            _ => Err(ZoomError::FramesFailed {
                failed: self.frames_failed(),
                total: self.frames_total(),
            }),
        }
    }

    fn record(&mut self, report: FrameReport) {
        self.frame_time += report.elapsed;
        match report.result {
            Ok(_) => self.frames_completed += 1,
            Err(e) => self.failures.push((report.frame_index, e)),
        }
    }
}

/// A fixed-size set of render workers.
#[derive(Copy, Clone, Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// A pool of `workers` threads; at least one.
    pub fn new(workers: usize) -> WorkerPool {
        WorkerPool {
            workers: workers.max(1),
        }
    }

    /// How many workers the pool runs.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render and write every job, returning once all of them have
    /// been dealt with.  Per-frame failures end up in the stats; the
    /// only error is a worker that panicked.
    pub fn run<S: FrameSink>(
        &self,
        jobs: Vec<FrameJob>,
        renderer: &FrameRenderer,
        sink: &S,
    ) -> Result<RenderStats, ZoomError> {
        let queue = JobQueue::new(jobs);
        let total = queue.total();
        let completed = AtomicUsize::new(0);
        let start = Instant::now();
        info!("rendering {} frames on {} workers", total, self.workers);

        let mut reports: Vec<FrameReport> = Vec::with_capacity(total);
        let mut panicked = false;
        ::crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Vec<FrameReport>>> = (0..self.workers)
                .map(|worker| {
                    let queue = queue.clone();
                    let completed = &completed;
                    spawner.spawn(move |_| {
                        let mut reports: Vec<FrameReport> = vec![];
                        while let Some(job) = queue.next() {
                            let report = render_one(&job, renderer, sink);
                            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                            match report.result {
                                Ok(ref path) => info!(
                                    "[{}/{}] frame {} written to {} in {:.2?}",
                                    done,
                                    total,
                                    report.frame_index,
                                    path.display(),
                                    report.elapsed
                                ),
                                Err(ref e) => error!(
                                    "[{}/{}] frame {} failed: {}",
                                    done, total, report.frame_index, e
                                ),
                            }
                            reports.push(report);
                        }
                        debug!("worker {} found the queue empty", worker);
                        reports
                    })
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(worker_reports) => reports.extend(worker_reports),
                    Err(_) => panicked = true,
                }
            }
        })
        .map_err(|_| ZoomError::WorkerPanicked)?;

        if panicked {
            return Err(ZoomError::WorkerPanicked);
        }

        let mut stats = RenderStats::default();
        reports.sort_by_key(|r| r.frame_index);
        for report in reports {
            stats.record(report);
        }
        stats.total_elapsed = start.elapsed();
        stats.frames_processed = completed.load(Ordering::SeqCst);
        Ok(stats)
    }
}

// Queued -> Rendering -> Written -> Completed, or Failed at either step.
fn render_one<S: FrameSink>(job: &FrameJob, renderer: &FrameRenderer, sink: &S) -> FrameReport {
    let start = Instant::now();
    let result = renderer.render(job).and_then(|frame| sink.write(&frame));
    FrameReport {
        frame_index: job.frame_index(),
        elapsed: start.elapsed(),
        result,
    }
}
