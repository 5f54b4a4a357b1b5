//! The escape-time evaluator.  This is the hot loop; everything else
//! in the crate exists to feed it points and carry its answers away.

use num::Complex;

/// The squared escape radius.  Once |z| > 2 the orbit is guaranteed to
/// run off to infinity.
const ESCAPE_NORM_SQR: f64 = 4.0;

/// Iterate `z = z * z + c` from zero and report how far through the
/// iteration budget the orbit got before |z| exceeded 2, as a ratio in
/// (0, 1].  A ratio of exactly 1.0 means the point never escaped and is
/// treated as inside the set.
///
/// Points (or orbits) that overflow into infinity or NaN are treated as
/// escaping immediately and report 0.0, so a bad viewport shows up as a
/// flat region rather than as garbage.
pub fn escape_ratio(c: Complex<f64>, max_iter: u32) -> f64 {
    if max_iter == 0 {
        return 1.0;
    }
    if !(c.re.is_finite() && c.im.is_finite()) {
        return 0.0;
    }
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    for n in 1..=max_iter {
        z = z * z + c;
        let norm = z.norm_sqr();
        if !norm.is_finite() {
            return 0.0;
        }
        if norm > ESCAPE_NORM_SQR {
            return f64::from(n) / f64::from(max_iter);
        }
    }
    1.0
}
