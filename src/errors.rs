// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong between parsing the arguments and
//! handing the frames to the video encoder.

use std::io;

/// The error type shared by every stage of the pipeline.
#[derive(Debug, Fail)]
pub enum ZoomError {
    /// The arguments describe a render we refuse to schedule.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// A viewport whose corners are out of order or have collapsed
    /// together.  Deep zooms end up here once f64 runs out of digits.
    #[fail(display = "invalid viewport: {}", _0)]
    Viewport(String),

    /// The directory the frames go into could not be created.
    #[fail(display = "could not create frame directory {}: {}", path, cause)]
    OutputDirectory {
        /// The directory we tried to create.
        path: String,
        /// The underlying I/O failure.
        #[cause]
        cause: io::Error,
    },

    /// The frame could not be created, encoded or written to disk.
    #[fail(display = "could not write frame {}: {}", frame, cause)]
    FrameWrite {
        /// Index of the frame that was lost.
        frame: u32,
        /// The underlying I/O failure.
        #[cause]
        cause: io::Error,
    },

    /// Some frames failed; the rest are on disk.
    #[fail(display = "{} of {} frames failed", failed, total)]
    FramesFailed {
        /// Number of frames that did not make it to disk.
        failed: usize,
        /// Number of frames scheduled.
        total: usize,
    },

    /// The encoder binary could not be started at all.
    #[fail(display = "could not launch {}: {}", program, cause)]
    EncoderLaunch {
        /// The program we tried to run.
        program: String,
        /// Why the launch failed.
        #[cause]
        cause: io::Error,
    },

    /// The encoder ran and reported failure.
    #[fail(display = "video encoder exited with {}: {}", status, stderr)]
    EncoderFailed {
        /// The exit status, as reported by the OS.
        status: String,
        /// Whatever the encoder had to say about it.
        stderr: String,
    },

    /// A worker thread died before reporting its frames.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

impl ZoomError {
    /// The process exit code the binary uses for this error.
    pub fn exit_code(&self) -> i32 {
        match *self {
            ZoomError::Config(_) => 1,
            ZoomError::Viewport(_)
            | ZoomError::OutputDirectory { .. }
            | ZoomError::FrameWrite { .. }
            | ZoomError::FramesFailed { .. }
            | ZoomError::WorkerPanicked => 2,
            ZoomError::EncoderLaunch { .. } | ZoomError::EncoderFailed { .. } => 3,
        }
    }
}
