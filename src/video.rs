//! Video assembly.  Once every frame is on disk an external encoder
//! stitches them together; this module only knows how to ask it.

use std::path::Path;
use std::process::Command;

use config::FRAME_RATE;
use errors::ZoomError;
use output::frame_pattern;

/// Turns a directory of numbered frames into a video.
pub trait VideoAssembler {
    /// Assemble the frames found in `frame_directory` into `output_path`.
    fn assemble(&self, frame_directory: &Path, output_path: &Path) -> Result<(), ZoomError>;
}

/// Runs ffmpeg: 30 fps, H.264, YUV 4:2:0, overwriting any existing
/// output.
#[derive(Clone, Debug)]
pub struct Ffmpeg {
    program: String,
    prefix: String,
    start_number: u32,
}

impl Ffmpeg {
    /// `program` is the ffmpeg binary, `prefix` the frame filename
    /// prefix and `start_number` the index of the first frame.  ffmpeg
    /// only probes the first few indices on its own, so a zoom that
    /// starts deeper has to say where.
    pub fn new(program: &str, prefix: &str, start_number: u32) -> Ffmpeg {
        Ffmpeg {
            program: program.to_string(),
            prefix: prefix.to_string(),
            start_number,
        }
    }

    /// The command line that will be run, without the program name.
    pub fn args(&self, frame_directory: &Path, output_path: &Path) -> Vec<String> {
        let input = frame_directory.join(frame_pattern(&self.prefix));
        vec![
            "-y".to_string(),
            "-framerate".to_string(),
            FRAME_RATE.to_string(),
            "-start_number".to_string(),
            self.start_number.to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            output_path.to_string_lossy().into_owned(),
        ]
    }
}

impl VideoAssembler for Ffmpeg {
    fn assemble(&self, frame_directory: &Path, output_path: &Path) -> Result<(), ZoomError> {
        let args = self.args(frame_directory, output_path);
        info!("running {} {}", self.program, args.join(" "));
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|cause| ZoomError::EncoderLaunch {
                program: self.program.clone(),
                cause,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // ffmpeg is chatty; the last few lines carry the actual complaint.
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            return Err(ZoomError::EncoderFailed {
                status: output.status.to_string(),
                stderr: tail.into_iter().rev().collect::<Vec<_>>().join("\n"),
            });
        }
        debug!("{}", String::from_utf8_lossy(&output.stderr));
        Ok(())
    }
}
