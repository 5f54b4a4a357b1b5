// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a frame job into pixels.  The renderer owns nothing mutable:
//! the same job always produces the same frame, and any number of
//! threads may share one renderer.

use itertools::iproduct;

use colors::{Color, ColorScheme};
use config::Config;
use errors::ZoomError;
use escape::escape_ratio;
use jobs::FrameJob;
use planes::{Pixel, PlaneMapper};

/// One finished frame.  It belongs to the worker that rendered it until
/// it is handed to a sink, and is dropped once encoded.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFrame {
    /// Which frame of the zoom this is.
    pub frame_index: u32,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Row-major pixels, `width * height` of them.
    pub pixels: Vec<Color>,
}

impl RenderedFrame {
    /// The packed RGB8 bytes an encoder expects.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            bytes.extend_from_slice(&[p.r, p.g, p.b]);
        }
        bytes
    }

    /// The color at a pixel, if it lies within the frame.
    pub fn pixel(&self, pixel: Pixel) -> Option<Color> {
        if pixel.0 >= self.width || pixel.1 >= self.height {
            return None;
        }
        self.pixels.get(pixel.1 * self.width + pixel.0).cloned()
    }
}

/// The fixed part of every frame: raster size, iteration budget and
/// palette.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    width: usize,
    height: usize,
    max_iter: u32,
    scheme: ColorScheme,
    invert: bool,
}

impl FrameRenderer {
    /// Build a renderer from the render configuration.
    pub fn new(config: &Config) -> FrameRenderer {
        FrameRenderer {
            width: config.width,
            height: config.height,
            max_iter: config.max_iter,
            scheme: config.scheme,
            invert: config.invert,
        }
    }

    /// Render one frame.  Fails only if the frame's viewport cannot be
    /// represented.
    pub fn render(&self, job: &FrameJob) -> Result<RenderedFrame, ZoomError> {
        let viewport = job.viewport()?;
        if viewport.exceeds_precision(self.width, self.height) {
            warn!(
                "frame {}: zoom is past f64 precision, expect blocky output",
                job.frame_index()
            );
        }
        let plane = PlaneMapper::new(self.width, self.height, viewport)?;
        let mut pixels = vec![Color::default(); plane.len()];
        for (row, column) in iproduct!(0..plane.height(), 0..plane.width()) {
            let pixel = Pixel(column, row);
            let ratio = escape_ratio(plane.pixel_to_point(&pixel), self.max_iter);
            let color = self.scheme.color(ratio);
            pixels[plane.offset(&pixel)] = if self.invert { color.inverted() } else { color };
        }
        Ok(RenderedFrame {
            frame_index: job.frame_index(),
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs::ZoomSchedule;
    use num::Complex;

    fn config(scheme: ColorScheme) -> Config {
        let mut config = Config::new(50, 0, 3, 2.0).unwrap();
        config.width = 32;
        config.height = 24;
        config.scheme = scheme;
        config.center = Complex::new(-0.5, 0.0);
        config
    }

    fn job(config: &Config, frame: u32) -> FrameJob {
        config.schedule.jobs(config.center)[frame as usize]
    }

    #[test]
    fn frames_have_the_configured_shape() {
        let config = config(ColorScheme::Linear);
        let frame = FrameRenderer::new(&config).render(&job(&config, 2)).unwrap();
        assert_eq!(frame.frame_index, 2);
        assert_eq!((frame.width, frame.height), (32, 24));
        assert_eq!(frame.pixels.len(), 32 * 24);
        assert_eq!(frame.to_rgb_bytes().len(), 32 * 24 * 3);
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        for &scheme in &[ColorScheme::Linear, ColorScheme::Sinebow] {
            let config = config(scheme);
            let renderer = FrameRenderer::new(&config);
            let job = job(&config, 1);
            let a = renderer.render(&job).unwrap();
            let b = renderer.render(&job).unwrap();
            assert_eq!(a.to_rgb_bytes(), b.to_rgb_bytes());
        }
    }

    #[test]
    fn the_center_of_the_set_is_inside() {
        // The 32x24 raster puts pixel (16, 12) on the viewport center,
        // -0.5+0i, which sits in the main cardioid.
        let config = config(ColorScheme::Sinebow);
        let frame = FrameRenderer::new(&config).render(&job(&config, 0)).unwrap();
        assert_eq!(frame.pixel(Pixel(16, 12)), Some(Color::BLACK));
        // The top left corner, -2.5-2i, escapes at once.
        assert_ne!(frame.pixel(Pixel(0, 0)), Some(Color::BLACK));
        assert_eq!(frame.pixel(Pixel(32, 0)), None);
    }

    #[test]
    fn inversion_applies_to_every_pixel() {
        let plain = config(ColorScheme::Linear);
        let mut inverted = plain.clone();
        inverted.invert = true;
        let a = FrameRenderer::new(&plain).render(&job(&plain, 0)).unwrap();
        let b = FrameRenderer::new(&inverted).render(&job(&inverted, 0)).unwrap();
        for (p, q) in a.pixels.iter().zip(b.pixels.iter()) {
            assert_eq!(p.inverted(), *q);
        }
    }

    #[test]
    fn collapsed_viewports_fail() {
        let config = config(ColorScheme::Linear);
        let deep = ZoomSchedule::new(200, 200, 2.0).unwrap().jobs(config.center)[0];
        assert!(FrameRenderer::new(&config).render(&deep).is_err());
    }
}
