//! Contains the Viewport, a rectangle on the complex plane, and the
//! PlaneMapper, which describes the relationship between an integral
//! raster with its origin at 0,0 and the viewport it is looking at.
//!
//! Every frame of a zoom is the classic framing around a fixed center,
//! shrunk by `zoom_factor^frame`.  All of this is done in f64, so once
//! the pixel step drops below the spacing of representable numbers
//! near the center the image turns into blocks, and a little deeper
//! than that the viewport collapses altogether.
use num::Complex;

use errors::ZoomError;

/// Half the width of the classic, unzoomed Mandelbrot framing.
pub const BASE_HALF_EXTENT: f64 = 2.0;

/// Describes the x, y of a pixel in the raster, row-major, with 0,0
/// in the first row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// A rectangular window onto the complex plane.  The real part runs
/// along x, the imaginary part along y.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Viewport {
    /// Constructor.  Fails unless every edge is finite and both ranges
    /// are strictly increasing.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Viewport, ZoomError> {
        if ![x_min, x_max, y_min, y_max].iter().all(|e| e.is_finite()) {
            return Err(ZoomError::Viewport(format!(
                "viewport [{}, {}] x [{}, {}] is not finite",
                x_min, x_max, y_min, y_max
            )));
        }
        if !(x_min < x_max) {
            return Err(ZoomError::Viewport(format!(
                "x range [{}, {}] is empty",
                x_min, x_max
            )));
        }
        if !(y_min < y_max) {
            return Err(ZoomError::Viewport(format!(
                "y range [{}, {}] is empty",
                y_min, y_max
            )));
        }
        Ok(Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// A square viewport reaching `half_extent` from `center` in each
    /// direction.
    pub fn centered(center: Complex<f64>, half_extent: f64) -> Result<Viewport, ZoomError> {
        Viewport::new(
            center.re - half_extent,
            center.re + half_extent,
            center.im - half_extent,
            center.im + half_extent,
        )
    }

    /// Left edge.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right edge.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Top edge; row 0 of the raster.
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// Bottom edge.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The midpoint of the window.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            self.x_min + self.width() / 2.0,
            self.y_min + self.height() / 2.0,
        )
    }

    /// True when neighbouring pixels of a `width` x `height` raster
    /// land on the same or adjacent f64 values near the center.  Frames
    /// past this point render, but as visible blocks.
    pub fn exceeds_precision(&self, width: usize, height: usize) -> bool {
        let center = self.center();
        let step_x = self.width() / (width as f64);
        let step_y = self.height() / (height as f64);
        let ulp_x = center.re.abs().max(f64::MIN_POSITIVE) * ::std::f64::EPSILON;
        let ulp_y = center.im.abs().max(f64::MIN_POSITIVE) * ::std::f64::EPSILON;
        step_x <= 2.0 * ulp_x || step_y <= 2.0 * ulp_y
    }
}

/// The viewport of frame `frame_index` of a zoom toward `center`: the
/// classic framing (half-extent 2.0) divided by `zoom_factor^frame_index`.
/// Fails once the window is too small for f64 to tell its edges apart.
pub fn frame_viewport(
    center: Complex<f64>,
    zoom_factor: f64,
    frame_index: u32,
) -> Result<Viewport, ZoomError> {
    let scale = BASE_HALF_EXTENT / zoom_factor.powf(f64::from(frame_index));
    Viewport::centered(center, scale)
}

/// Contains the definitions of two planes: an integral raster and
/// the viewport on the complex plane.  Maps pixels from one to the
/// other.
#[derive(Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    viewport: Viewport,
    // Complex distance between neighbouring pixels, along x and y.
    steps: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the raster and the viewport it
    /// looks at.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper, ZoomError> {
        if width == 0 || height == 0 {
            return Err(ZoomError::Config(format!(
                "raster {}x{} has no pixels",
                width, height
            )));
        }
        Ok(PlaneMapper {
            width,
            height,
            viewport,
            steps: (
                viewport.width() / (width as f64),
                viewport.height() / (height as f64),
            ),
        })
    }

    /// The total number of pixels in the raster.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// A raster always has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of the raster in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the raster in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The viewport this raster covers.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Given a pixel on the raster, linearly interpolate its position
    /// across the viewport.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.viewport.x_min + (pixel.0 as f64) * self.steps.0,
            self.viewport.y_min + (pixel.1 as f64) * self.steps.1,
        )
    }

    /// Row-major offset of a pixel in a frame buffer.
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.width + pixel.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs())
    }

    #[test]
    fn viewport_fails_on_bad_shape() {
        assert!(Viewport::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, 1.0, -1.0).is_err());
        assert!(Viewport::new(0.0, 0.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(::std::f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Viewport::new(::std::f64::NEG_INFINITY, ::std::f64::INFINITY, -1.0, 1.0).is_err());
        assert!(Viewport::new(-1.0, 1.0, -1.0, ::std::f64::INFINITY).is_err());
    }

    #[test]
    fn viewport_passes_on_good_shape() {
        assert!(Viewport::new(-1.0, 1.0, -1.0, 1.0).is_ok());
    }

    #[test]
    fn frame_zero_is_the_classic_framing() {
        let center = Complex::new(-0.75, 0.5);
        let vp = frame_viewport(center, 1.02, 0).unwrap();
        assert_eq!(vp, Viewport::new(-2.75, 1.25, -1.5, 2.5).unwrap());
    }

    #[test]
    fn frame_width_shrinks_geometrically() {
        let center = Complex::new(0.0, 0.0);
        for &factor in &[1.02, 1.5, 2.0, 3.7] {
            for i in 0..40 {
                let vp = frame_viewport(center, factor, i).unwrap();
                assert!(close(vp.width(), 4.0 / factor.powi(i as i32)));
                assert!(close(vp.height(), 4.0 / factor.powi(i as i32)));
            }
        }
    }

    #[test]
    fn frame_width_shrinks_off_center() {
        let center = Complex::new(-1.25, 0.05);
        for i in 0..20 {
            let vp = frame_viewport(center, 1.5, i).unwrap();
            let expected = 4.0 / 1.5f64.powi(i as i32);
            assert!((vp.width() - expected).abs() <= 1e-9 * expected);
            assert!((vp.height() - expected).abs() <= 1e-9 * expected);
        }
    }

    #[test]
    fn frame_viewport_is_deterministic() {
        let center = Complex::new(-1.7499984109937408, -1.6571246929541869e-15);
        assert_eq!(
            frame_viewport(center, 1.1, 57).unwrap(),
            frame_viewport(center, 1.1, 57).unwrap()
        );
    }

    #[test]
    fn frames_keep_a_tiny_center_offset() {
        // The default center sits 1.66e-15 below the real axis; deep
        // frames must stay centered on it rather than on zero.
        let center = Complex::new(-1.7499984109937408, -1.6571246929541869e-15);
        let vp = frame_viewport(center, 2.0, 48).unwrap();
        let half = BASE_HALF_EXTENT / 2f64.powf(48.0);
        assert_eq!(vp.y_min(), center.im - half);
        assert_eq!(vp.y_max(), center.im + half);
        assert!(vp.y_max() < 6.0e-15 && vp.y_min() > -9.0e-15);
    }

    #[test]
    fn deep_zoom_is_flagged_then_collapses() {
        let center = Complex::new(-1.75, 0.0);
        assert!(!frame_viewport(center, 2.0, 10).unwrap().exceeds_precision(1200, 1200));
        assert!(frame_viewport(center, 2.0, 50).unwrap().exceeds_precision(1200, 1200));
        assert!(frame_viewport(center, 2.0, 80).is_err());
    }

    #[test]
    fn huge_frame_indices_fail_instead_of_covering_the_plane() {
        let center = Complex::new(-1.75, 0.0);
        match frame_viewport(center, 2.0, 3_000_000_000) {
            Err(ZoomError::Viewport(_)) => (),
            other => panic!("expected a viewport error, got {:?}", other),
        }
    }

    #[test]
    fn planemapper_fails_on_empty_raster() {
        let vp = Viewport::new(-1.0, 1.0, -1.0, 1.0).unwrap();
        assert!(PlaneMapper::new(0, 4, vp).is_err());
        assert!(PlaneMapper::new(4, 0, vp).is_err());
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let vp = Viewport::new(0.0, 5.0, 0.0, 5.0).unwrap();
        let pm = PlaneMapper::new(5, 5, vp).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 3)), Complex::new(4.0, 3.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let vp = Viewport::new(-2.0, 2.0, -2.0, 2.0).unwrap();
        let pm = PlaneMapper::new(4, 4, vp).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(3, 1)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn offsets_are_row_major() {
        let vp = Viewport::new(-2.0, 2.0, -1.0, 1.0).unwrap();
        let pm = PlaneMapper::new(8, 3, vp).unwrap();
        assert_eq!(pm.len(), 24);
        assert_eq!(pm.offset(&Pixel(0, 0)), 0);
        assert_eq!(pm.offset(&Pixel(7, 0)), 7);
        assert_eq!(pm.offset(&Pixel(0, 1)), 8);
        assert_eq!(pm.offset(&Pixel(7, 2)), 23);
    }
}
