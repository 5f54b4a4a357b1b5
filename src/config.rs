//! The immutable description of a render.  The command line is parsed
//! into exactly one of these, and it is passed by reference to every
//! stage that needs it.

use num::Complex;
use std::path::PathBuf;
use std::str::FromStr;

use colors::ColorScheme;
use errors::ZoomError;
use jobs::ZoomSchedule;

/// The point both original programs dove toward: a spot on the real
/// axis, deep in the antenna west of the main cardioid.
pub const DEFAULT_CENTER: (f64, f64) = (-1.749_998_410_993_740_8, -1.657_124_692_954_186_9e-15);

/// Default raster size, in pixels.
pub const DEFAULT_SIZE: (usize, usize) = (1200, 1200);

/// Frames per second of the assembled video.
pub const FRAME_RATE: u32 = 30;

/// Everything a render needs to know.
#[derive(Clone, Debug)]
pub struct Config {
    /// Iteration budget per pixel.
    pub max_iter: u32,
    /// Which frames to render, and how fast to zoom.
    pub schedule: ZoomSchedule,
    /// Raster width in pixels.
    pub width: usize,
    /// Raster height in pixels.
    pub height: usize,
    /// The point the zoom closes in on.
    pub center: Complex<f64>,
    /// How escape ratios become colors.
    pub scheme: ColorScheme,
    /// Invert every frame before writing it.
    pub invert: bool,
    /// Number of render workers.
    pub threads: usize,
    /// Directory the frames are written into.
    pub output_dir: PathBuf,
    /// Frame filenames are `<prefix>_<index:04>.png`.
    pub prefix: String,
    /// Where the assembled video goes, if anywhere.
    pub video: Option<PathBuf>,
    /// The encoder binary.
    pub ffmpeg: String,
}

impl Config {
    /// A configuration with the given required parameters and defaults
    /// for everything else.  Fails if the parameters make no sense.
    pub fn new(
        max_iter: u32,
        zoom_start: u32,
        zoom_end: u32,
        zoom_factor: f64,
    ) -> Result<Config, ZoomError> {
        Config {
            max_iter,
            schedule: ZoomSchedule::new(zoom_start, zoom_end, zoom_factor)?,
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            center: Complex::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
            scheme: ColorScheme::default(),
            invert: false,
            threads: ::num_cpus::get(),
            output_dir: PathBuf::from("frames"),
            prefix: "mandelbrot_set".to_string(),
            video: Some(PathBuf::from("out.mp4")),
            ffmpeg: "ffmpeg".to_string(),
        }
        .validate()
    }

    /// Check every field, consuming and returning the configuration so
    /// that callers who tweak fields by hand can re-validate in one go.
    pub fn validate(self) -> Result<Config, ZoomError> {
        if self.max_iter == 0 {
            return Err(ZoomError::Config(
                "max_iter must be a positive integer".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ZoomError::Config(format!(
                "frame size {}x{} has no pixels",
                self.width, self.height
            )));
        }
        if !(self.center.re.is_finite() && self.center.im.is_finite()) {
            return Err(ZoomError::Config(format!(
                "zoom center {} is not a finite point",
                self.center
            )));
        }
        if self.threads == 0 {
            return Err(ZoomError::Config(
                "at least one worker thread is required".to_string(),
            ));
        }
        if self.prefix.is_empty() {
            return Err(ZoomError::Config("frame prefix is empty".to_string()));
        }
        ZoomSchedule::new(
            self.schedule.start(),
            self.schedule.end(),
            self.schedule.factor(),
        )?;
        Ok(self)
    }
}

/// Given a string and a separator, returns the two values separated
/// by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A specific implementation of parse_pair using a comma and expecting
/// floating point numbers.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_original_render() {
        let config = Config::new(50, 0, 4, 2.0).unwrap();
        assert_eq!((config.width, config.height), (1200, 1200));
        assert_eq!(config.scheme, ColorScheme::Linear);
        assert_eq!(config.prefix, "mandelbrot_set");
        assert!(config.threads >= 1);
    }

    #[test]
    fn rejects_zero_iterations() {
        assert!(Config::new(0, 0, 4, 2.0).is_err());
    }

    #[test]
    fn rejects_backwards_schedules() {
        assert!(Config::new(50, 5, 4, 2.0).is_err());
    }

    #[test]
    fn rejects_zoom_factors_that_do_not_zoom() {
        assert!(Config::new(50, 0, 4, 1.0).is_err());
        assert!(Config::new(50, 0, 4, 0.5).is_err());
        assert!(Config::new(50, 0, 4, ::std::f64::NAN).is_err());
    }

    #[test]
    fn validate_catches_hand_edited_fields() {
        let mut config = Config::new(50, 0, 4, 2.0).unwrap();
        config.threads = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new(50, 0, 4, 2.0).unwrap();
        config.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_pairs() {
        assert_eq!(parse_pair::<usize>("640x480", 'x'), Some((640, 480)));
        assert_eq!(parse_pair::<usize>("640x", 'x'), None);
        assert_eq!(parse_pair::<usize>("640", 'x'), None);
        assert_eq!(
            parse_complex("-1.25,0.5"),
            Some(Complex::new(-1.25, 0.5))
        );
        assert_eq!(parse_complex("-1.25;0.5"), None);
    }
}
