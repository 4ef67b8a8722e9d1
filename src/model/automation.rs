//! Automation Curves
//!
//! Breakpoint automation over normalized song position. Each curve keeps at
//! least two breakpoints with `t` in [0, 1] sorted ascending; the endpoints
//! mirror the track's static fader/pan value.

use serde::{Deserialize, Serialize};

/// One automation breakpoint at normalized position `t`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub t: f32,
    pub value: f32,
}

/// Level and pan curves for one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Automation {
    pub level: Vec<Breakpoint>,
    pub pan: Vec<Breakpoint>,
}

impl Automation {
    /// Flat curves at the given fader and pan values
    pub fn flat(level: f32, pan: f32) -> Self {
        Self {
            level: flat_curve(level),
            pan: flat_curve(pan),
        }
    }
}

fn flat_curve(value: f32) -> Vec<Breakpoint> {
    vec![
        Breakpoint { t: 0.0, value },
        Breakpoint { t: 1.0, value },
    ]
}

/// Evaluate a curve at normalized position `t`
///
/// Total function: outside the covered range the nearest endpoint's value
/// holds; inside it the bracketing pair is interpolated linearly. An empty
/// curve evaluates to 0. Callers holding the sorted invariant pay nothing;
/// an unsorted curve is sorted into a local copy first.
pub fn interpolate(breakpoints: &[Breakpoint], t: f32) -> f32 {
    if breakpoints.windows(2).all(|pair| pair[0].t <= pair[1].t) {
        return interpolate_sorted(breakpoints, t);
    }
    let mut sorted = breakpoints.to_vec();
    sorted.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
    interpolate_sorted(&sorted, t)
}

fn interpolate_sorted(breakpoints: &[Breakpoint], t: f32) -> f32 {
    if breakpoints.is_empty() {
        return 0.0;
    }
    let first = &breakpoints[0];
    let last = &breakpoints[breakpoints.len() - 1];
    if t <= first.t {
        return first.value;
    }
    if t >= last.t {
        return last.value;
    }
    for pair in breakpoints.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.t && t <= b.t {
            let span = b.t - a.t;
            if span <= 0.0 {
                return b.value;
            }
            let frac = (t - a.t) / span;
            return a.value + frac * (b.value - a.value);
        }
    }
    last.value
}

/// Mirror a fader edit into the curve's first and last breakpoints
pub fn mirror_endpoints(breakpoints: &mut [Breakpoint], value: f32) {
    if breakpoints.len() < 2 {
        return;
    }
    breakpoints[0].value = value;
    let last = breakpoints.len() - 1;
    breakpoints[last].value = value;
}

/// Insert a breakpoint and keep the curve sorted by `t`
pub fn add_point(breakpoints: &mut Vec<Breakpoint>, t: f32, value: f32) {
    breakpoints.push(Breakpoint { t, value });
    breakpoints.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Vec<Breakpoint> {
        vec![
            Breakpoint { t: 0.0, value: 0.2 },
            Breakpoint { t: 1.0, value: 0.8 },
        ]
    }

    #[test]
    fn test_endpoints() {
        let curve = ramp();
        assert_relative_eq!(interpolate(&curve, 0.0), 0.2);
        assert_relative_eq!(interpolate(&curve, 1.0), 0.8);
    }

    #[test]
    fn test_midpoint_is_linear() {
        let curve = ramp();
        assert_relative_eq!(interpolate(&curve, 0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(interpolate(&curve, 0.25), 0.35, epsilon = 1e-6);
    }

    #[test]
    fn test_outside_range_clamps_to_endpoints() {
        let curve = vec![
            Breakpoint { t: 0.25, value: 0.4 },
            Breakpoint { t: 0.75, value: 1.0 },
        ];
        assert_relative_eq!(interpolate(&curve, 0.0), 0.4);
        assert_relative_eq!(interpolate(&curve, -5.0), 0.4);
        assert_relative_eq!(interpolate(&curve, 1.0), 1.0);
        assert_relative_eq!(interpolate(&curve, 9.0), 1.0);
    }

    #[test]
    fn test_empty_curve_is_zero() {
        assert_eq!(interpolate(&[], 0.5), 0.0);
    }

    #[test]
    fn test_unsorted_curve_is_sorted_before_evaluation() {
        let curve = vec![
            Breakpoint { t: 1.0, value: 0.8 },
            Breakpoint { t: 0.0, value: 0.2 },
        ];
        assert_relative_eq!(interpolate(&curve, 0.0), 0.2);
        assert_relative_eq!(interpolate(&curve, 0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(interpolate(&curve, 1.0), 0.8);
    }

    #[test]
    fn test_multi_segment() {
        let curve = vec![
            Breakpoint { t: 0.0, value: 0.0 },
            Breakpoint { t: 0.5, value: 1.0 },
            Breakpoint { t: 1.0, value: 0.0 },
        ];
        assert_relative_eq!(interpolate(&curve, 0.25), 0.5, epsilon = 1e-6);
        assert_relative_eq!(interpolate(&curve, 0.5), 1.0, epsilon = 1e-6);
        assert_relative_eq!(interpolate(&curve, 0.75), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_mirror_endpoints_leaves_interior_alone() {
        let mut curve = vec![
            Breakpoint { t: 0.0, value: 0.8 },
            Breakpoint { t: 0.5, value: 1.5 },
            Breakpoint { t: 1.0, value: 0.8 },
        ];
        mirror_endpoints(&mut curve, 0.3);
        assert_eq!(curve[0].value, 0.3);
        assert_eq!(curve[1].value, 1.5);
        assert_eq!(curve[2].value, 0.3);
    }

    #[test]
    fn test_add_point_keeps_sorted() {
        let mut curve = ramp();
        add_point(&mut curve, 0.5, 1.2);
        add_point(&mut curve, 0.1, 0.1);
        let ts: Vec<f32> = curve.iter().map(|b| b.t).collect();
        assert_eq!(ts, vec![0.0, 0.1, 0.5, 1.0]);
    }

    #[test]
    fn test_flat_automation_defaults() {
        let auto = Automation::flat(0.8, 0.0);
        assert_eq!(auto.level.len(), 2);
        assert_relative_eq!(interpolate(&auto.level, 0.37), 0.8);
        assert_relative_eq!(interpolate(&auto.pan, 0.9), 0.0);
    }
}
