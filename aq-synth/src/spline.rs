//! Cubic interpolation over a day treated as one period of a cycle.
//!
//! The 24 hourly points are repeated three times (previous day, this day,
//! next day) and a natural cubic spline is fitted over all 72 knots. Only the
//! middle copy is sampled, so the curve joins hour 23 to hour 0 with the same
//! shape it has everywhere else instead of the free ends of a single-day fit.

use crate::{DailyCurve, HOURS_PER_DAY};

const CYCLES: usize = 3;
const KNOTS: usize = HOURS_PER_DAY * CYCLES;

/// Natural cubic spline on unit-spaced knots at x = -24, -23, ..., 47.
#[derive(Debug, Clone)]
pub struct CyclicSpline {
    values: [f64; KNOTS],
    /// Second derivative at each knot.
    curvature: [f64; KNOTS],
}

impl CyclicSpline {
    pub fn fit(day: &DailyCurve) -> Self {
        let mut values = [0.0; KNOTS];
        for (i, value) in values.iter_mut().enumerate() {
            *value = day[i % HOURS_PER_DAY];
        }
        CyclicSpline {
            values,
            curvature: solve_curvature(&values),
        }
    }

    /// Evaluate the spline at hour `x`, where 0.0 is midnight of the middle
    /// day. Arguments outside [-24, 47] extrapolate the end segments.
    pub fn evaluate(&self, x: f64) -> f64 {
        let offset = x + HOURS_PER_DAY as f64;
        let i = (offset.floor().max(0.0) as usize).min(KNOTS - 2);
        let t = offset - i as f64;
        let u = 1.0 - t;
        u * self.values[i]
            + t * self.values[i + 1]
            + ((u * u * u - u) * self.curvature[i] + (t * t * t - t) * self.curvature[i + 1]) / 6.0
    }

    /// The middle day sampled on the hour.
    pub fn sample_hours(&self) -> DailyCurve {
        let mut curve = [0.0; HOURS_PER_DAY];
        for (hour, value) in curve.iter_mut().enumerate() {
            *value = self.evaluate(hour as f64);
        }
        curve
    }
}

/// Solve M[i-1] + 4 M[i] + M[i+1] = 6 (y[i+1] - 2 y[i] + y[i-1]) with
/// M[0] = M[n-1] = 0, using the Thomas algorithm.
fn solve_curvature(y: &[f64; KNOTS]) -> [f64; KNOTS] {
    let mut m = [0.0; KNOTS];
    let interior = KNOTS - 2;
    let mut c_prime = vec![0.0; interior];
    let mut d_prime = vec![0.0; interior];

    for k in 0..interior {
        let i = k + 1;
        let rhs = 6.0 * (y[i + 1] - 2.0 * y[i] + y[i - 1]);
        if k == 0 {
            c_prime[k] = 1.0 / 4.0;
            d_prime[k] = rhs / 4.0;
        } else {
            let denom = 4.0 - c_prime[k - 1];
            c_prime[k] = 1.0 / denom;
            d_prime[k] = (rhs - d_prime[k - 1]) / denom;
        }
    }

    for k in (0..interior).rev() {
        let next = if k + 1 < interior { m[k + 2] } else { 0.0 };
        m[k + 1] = d_prime[k] - c_prime[k] * next;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sawtooth() -> DailyCurve {
        let mut day = [0.0; HOURS_PER_DAY];
        for (h, v) in day.iter_mut().enumerate() {
            *v = 50.0 + 5.0 * h as f64;
        }
        day
    }

    #[test]
    fn test_passes_through_knots() {
        let day = sawtooth();
        let spline = CyclicSpline::fit(&day);
        let sampled = spline.sample_hours();
        for h in 0..HOURS_PER_DAY {
            assert!((sampled[h] - day[h]).abs() < 1e-9, "hour {h}");
        }
    }

    #[test]
    fn test_constant_day_stays_flat() {
        let spline = CyclicSpline::fit(&[80.0; HOURS_PER_DAY]);
        for step in 0..48 {
            let x = step as f64 * 0.5;
            assert!((spline.evaluate(x) - 80.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wraps_smoothly_across_midnight() {
        // The middle copy sees the same neighbourhood at midnight as the
        // previous copy does, so the curve is periodic in the interior.
        let spline = CyclicSpline::fit(&sawtooth());
        for step in 0..10 {
            let x = -0.5 + step as f64 * 0.1;
            let a = spline.evaluate(x);
            let b = spline.evaluate(x + HOURS_PER_DAY as f64);
            assert!((a - b).abs() < 1e-6, "x={x}: {a} vs {b}");
        }
    }

    #[test]
    fn test_between_knots_is_bounded_for_smooth_input() {
        let mut day = [0.0; HOURS_PER_DAY];
        for (h, v) in day.iter_mut().enumerate() {
            let angle = h as f64 / HOURS_PER_DAY as f64 * std::f64::consts::TAU;
            *v = 100.0 + 20.0 * angle.sin();
        }
        let spline = CyclicSpline::fit(&day);
        for step in 0..240 {
            let x = step as f64 * 0.1;
            let value = spline.evaluate(x);
            assert!(value > 79.0 && value < 121.0, "x={x}: {value}");
        }
    }
}
