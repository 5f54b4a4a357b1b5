//! Where finished frames go.  Workers hand every frame to a sink; the
//! real one writes numbered PNG files, tests substitute their own.

use image::png::PNGEncoder;
use image::ColorType;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use errors::ZoomError;
use render::RenderedFrame;

/// Something that can take a rendered frame off a worker's hands.
pub trait FrameSink: Sync {
    /// Persist the frame, returning where it went.
    fn write(&self, frame: &RenderedFrame) -> Result<PathBuf, ZoomError>;
}

/// The filename of a frame: the prefix, an underscore, and the frame
/// index padded to four digits, so that a directory listing sorts in
/// frame order no matter which worker finished first.
pub fn frame_filename(prefix: &str, frame_index: u32) -> String {
    format!("{}_{:04}.png", prefix, frame_index)
}

/// The printf-style pattern ffmpeg uses to find the frames again.
pub fn frame_pattern(prefix: &str) -> String {
    format!("{}_%04d.png", prefix)
}

/// Writes every frame as a PNG into one directory.
#[derive(Clone, Debug)]
pub struct PngDirectory {
    directory: PathBuf,
    prefix: String,
}

impl PngDirectory {
    /// Creates the directory, and any missing parents, if needed.
    pub fn create<P: AsRef<Path>>(directory: P, prefix: &str) -> Result<PngDirectory, ZoomError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|cause| ZoomError::OutputDirectory {
            path: directory.display().to_string(),
            cause,
        })?;
        Ok(PngDirectory {
            directory,
            prefix: prefix.to_string(),
        })
    }

    /// The full path frame `frame_index` is written to.
    pub fn path_for(&self, frame_index: u32) -> PathBuf {
        self.directory.join(frame_filename(&self.prefix, frame_index))
    }
}

impl FrameSink for PngDirectory {
    fn write(&self, frame: &RenderedFrame) -> Result<PathBuf, ZoomError> {
        let path = self.path_for(frame.frame_index);
        let failed = |cause| ZoomError::FrameWrite {
            frame: frame.frame_index,
            cause,
        };
        // Encode in memory first, so that every byte that reaches the
        // file goes through a call whose error we get to see.
        let mut encoded: Vec<u8> = Vec::new();
        PNGEncoder::new(&mut encoded)
            .encode(
                &frame.to_rgb_bytes(),
                frame.width as u32,
                frame.height as u32,
                ColorType::RGB(8),
            )
            .map_err(failed)?;
        let mut output = File::create(&path).map_err(failed)?;
        output.write_all(&encoded).map_err(failed)?;
        output.sync_all().map_err(failed)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colors::Color;
    use tempfile::tempdir;

    fn frame(frame_index: u32) -> RenderedFrame {
        RenderedFrame {
            frame_index,
            width: 4,
            height: 2,
            pixels: vec![Color::new(10, 20, 30); 8],
        }
    }

    #[test]
    fn filenames_are_zero_padded() {
        assert_eq!(frame_filename("zoom", 7), "zoom_0007.png");
        assert_eq!(frame_filename("zoom", 0), "zoom_0000.png");
        assert_eq!(frame_filename("zoom", 12345), "zoom_12345.png");
        assert_eq!(frame_pattern("zoom"), "zoom_%04d.png");
    }

    #[test]
    fn writes_a_png_per_frame() {
        let dir = tempdir().unwrap();
        let sink = PngDirectory::create(dir.path().join("frames"), "zoom").unwrap();
        let path = sink.write(&frame(3)).unwrap();
        assert_eq!(path, dir.path().join("frames").join("zoom_0003.png"));
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn write_failures_name_the_frame() {
        let dir = tempdir().unwrap();
        let sink = PngDirectory::create(dir.path(), "zoom").unwrap();
        // A directory squatting on the frame's filename makes the create fail.
        fs::create_dir(sink.path_for(5)).unwrap();
        match sink.write(&frame(5)) {
            Err(ZoomError::FrameWrite { frame, .. }) => assert_eq!(frame, 5),
            other => panic!("expected a write failure, got {:?}", other),
        }
    }
}
