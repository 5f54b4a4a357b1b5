//! Color schemes.  A scheme turns an escape ratio into an opaque RGB
//! color and nothing else; it is picked once, when the configuration
//! is built, and handed to the renderer.

use num::clamp;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// An opaque RGB pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Pure black, used for points inside the set.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// Constructor.
    pub fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// The photographic negative of this color.
    pub fn inverted(self) -> Color {
        Color {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
        }
    }
}

/// The available mappings from escape ratio to color.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    /// Fades from blue, for points that escape quickly, to yellow, for
    /// points inside the set.
    Linear,
    /// Three sine waves a third of a turn apart, one per channel.
    /// Points inside the set are black.
    Sinebow,
}

impl ColorScheme {
    /// Map an escape ratio in (0, 1] to a color.
    pub fn color(self, ratio: f64) -> Color {
        match self {
            ColorScheme::Linear => linear(ratio),
            ColorScheme::Sinebow => sinebow(ratio),
        }
    }

    /// Every scheme, in the order they are listed on the command line.
    pub fn names() -> &'static [&'static str] {
        &["linear", "sinebow"]
    }
}

impl Default for ColorScheme {
    fn default() -> ColorScheme {
        ColorScheme::Linear
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ColorScheme::Linear => write!(f, "linear"),
            ColorScheme::Sinebow => write!(f, "sinebow"),
        }
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<ColorScheme, String> {
        match s {
            "linear" => Ok(ColorScheme::Linear),
            "sinebow" => Ok(ColorScheme::Sinebow),
            _ => Err(format!(
                "unknown color scheme '{}', expected one of: {}",
                s,
                ColorScheme::names().join(", ")
            )),
        }
    }
}

fn channel(v: f64) -> u8 {
    clamp(v.floor(), 0.0, 255.0) as u8
}

fn linear(ratio: f64) -> Color {
    let t = channel(ratio * 255.0);
    Color::new(t, t, 255 - t)
}

const THIRD_TURN: f64 = 2.0 * PI / 3.0;

fn sinebow(ratio: f64) -> Color {
    if ratio >= 1.0 {
        return Color::BLACK;
    }
    let angle = 2.0 * PI * ratio;
    Color::new(
        channel(255.0 * angle.sin()),
        channel(255.0 * (angle + THIRD_TURN).sin()),
        channel(255.0 * (angle + 2.0 * THIRD_TURN).sin()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_runs_from_blue_to_yellow() {
        assert_eq!(ColorScheme::Linear.color(0.0), Color::new(0, 0, 255));
        assert_eq!(ColorScheme::Linear.color(1.0), Color::new(255, 255, 0));
        assert_eq!(ColorScheme::Linear.color(0.5), Color::new(127, 127, 128));
    }

    #[test]
    fn sinebow_paints_the_inside_black() {
        assert_eq!(ColorScheme::Sinebow.color(1.0), Color::BLACK);
        assert_ne!(ColorScheme::Sinebow.color(0.25), Color::BLACK);
    }

    #[test]
    fn sinebow_channels_are_phase_shifted() {
        // A quarter turn puts the red wave at its peak, and the other two
        // below zero, where they clamp.
        let c = ColorScheme::Sinebow.color(0.25);
        assert_eq!(c.r, 255);
        assert_eq!(c.g, 0);
        assert_eq!(c.b, 0);
    }

    #[test]
    fn mapping_is_deterministic() {
        for scheme in &[ColorScheme::Linear, ColorScheme::Sinebow] {
            for i in 0..=100 {
                let ratio = f64::from(i) / 100.0;
                assert_eq!(scheme.color(ratio), scheme.color(ratio));
            }
        }
    }

    #[test]
    fn schemes_parse_from_their_names() {
        for name in ColorScheme::names() {
            let scheme: ColorScheme = name.parse().unwrap();
            assert_eq!(&scheme.to_string(), name);
        }
        assert!("plaid".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn inverting_twice_is_a_no_op() {
        let c = Color::new(12, 200, 255);
        assert_eq!(c.inverted(), Color::new(243, 55, 0));
        assert_eq!(c.inverted().inverted(), c);
    }
}
