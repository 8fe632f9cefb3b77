//! Smoothed 1-D noise built from cubic-interpolated control points.

use crate::rng::MapRng;

/// Cubic interpolation between `v1` and `v2` using outer samples `v0`, `v3`.
#[must_use]
pub fn cubic(v0: f64, v1: f64, v2: f64, v3: f64, t: f64) -> f64 {
    let p = (v3 - v2) - (v0 - v1);
    let q = (v0 - v1) - p;
    let r = v2 - v0;
    let s = v1;
    ((p * t + q) * t + r) * t + s
}

/// Closed-loop noise around a circle of circumference `perimeter`.
///
/// `control_points` values uniform in `[0, 2)` are spaced evenly around the
/// loop and interpolated at each of `samples` unit positions.
pub fn perimeter_noise(
    rng: &mut MapRng,
    samples: usize,
    perimeter: f64,
    control_points: usize,
) -> Vec<f64> {
    let n = control_points.max(1);
    let coords: Vec<f64> = (0..n).map(|i| i as f64 * perimeter / n as f64).collect();
    let values: Vec<f64> = (0..n).map(|_| 2.0 * rng.float()).collect();

    let mut noise = Vec::with_capacity(samples);
    let mut c = 0;
    let mut looped = n == 1;
    for i in 0..samples {
        let pos = i as f64;
        if !looped && coords[(c + 1) % n] < pos {
            c = (c + 1) % n;
            if c == n - 1 {
                looped = true;
            }
        }
        let next = if looped { perimeter } else { coords[(c + 1) % n] };
        let t = (pos - coords[c]) / (next - coords[c]);
        noise.push(cubic(
            values[(c + n - 1) % n],
            values[c],
            values[(c + 1) % n],
            values[(c + 2) % n],
            t,
        ));
    }
    noise
}

/// Open noise along a path: `steps` control values in `[-amplitude, amplitude)`
/// with both ends pinned to zero, each span split into `substeps` samples.
///
/// Returns `steps * substeps + 1` samples; the last one is the pinned end.
pub fn path_noise(rng: &mut MapRng, steps: usize, substeps: usize, amplitude: f64) -> Vec<f64> {
    let steps = steps.max(1);
    let substeps = substeps.max(1);
    let mut control = vec![0.0; steps];
    for value in control.iter_mut().take(steps.saturating_sub(1)).skip(1) {
        *value = rng.float_between(-amplitude, amplitude);
    }

    let mut noise = vec![0.0; steps * substeps + 1];
    for j in 0..steps {
        let v0 = control[(j + steps - 1) % steps];
        let v1 = control[j];
        let v2 = control[(j + 1) % steps];
        let v3 = control[(j + 2) % steps];
        for k in 0..substeps {
            let t = k as f64 / substeps as f64;
            noise[j * substeps + k] = cubic(v0, v1, v2, v3, t);
        }
    }
    noise
}
