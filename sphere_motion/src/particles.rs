//! Particle field, the points of the sphere.
//!
//! Points sit on a Fibonacci sphere.  Every tick each point's target is its
//! base position scaled by the smoothed `scale`, plus a small traveling wave
//! while two hands are active; the point then blends toward that target so
//! scale changes never pop.

use serde::Deserialize;

use crate::smoother::VisualParams;

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count:  usize,
    pub radius: f32,
    /// Per-tick blend of positions and colours toward their targets.
    pub blend:  f32,
    /// Wave gain while two hands are active.
    pub wave_gain: f32,
    /// HSL saturation of the starting palette.
    pub saturation: f32,
}

impl ParticleConfig {
    /// The sparser, softer field shown while tracking is off.
    pub fn ambient() -> Self {
        ParticleConfig {
            count:      3000,
            saturation: 0.8,
            ..ParticleConfig::default()
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        ParticleConfig {
            count:      6000,
            radius:     3.0,
            blend:      0.15,
            wave_gain:  0.2,
            saturation: 1.0,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Colour helpers
// ════════════════════════════════════════════════════════════════════════════

/// HSL (all in `0..=1`) → linear RGB triple.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0      { p + (q - p) * 6.0 * t }
        else if t < 0.5       { q }
        else if t < 2.0 / 3.0 { p + (q - p) * (2.0 / 3.0 - t) * 6.0 }
        else                  { p }
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

/// Colour every particle drifts toward at a given glow level.
pub fn glow_color(glow: f32) -> [f32; 3] {
    [0.1 + glow * 0.7, 0.4 + glow * 0.6, 0.8 + glow * 0.2]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct ParticleField {
    config:    ParticleConfig,
    base:      Vec<[f32; 3]>,
    positions: Vec<[f32; 3]>,
    colors:    Vec<[f32; 3]>,
}

impl ParticleField {
    pub fn new(config: ParticleConfig) -> Self {
        let n = config.count;
        let base: Vec<[f32; 3]> = (0..n).map(|i| fibonacci_point(i, n, config.radius)).collect();
        let colors = (0..n)
            .map(|i| hsl_to_rgb(0.55 + (i as f32 / n as f32) * 0.1, config.saturation, 0.5))
            .collect();
        ParticleField {
            positions: base.clone(),
            base,
            colors,
            config,
        }
    }

    pub fn len(&self) -> usize           { self.positions.len() }
    pub fn is_empty(&self) -> bool       { self.positions.is_empty() }
    pub fn positions(&self) -> &[[f32; 3]] { &self.positions }
    pub fn colors(&self) -> &[[f32; 3]]    { &self.colors }
    pub fn base(&self) -> &[[f32; 3]]      { &self.base }

    /// Advance one render tick.  `time` is animation time in seconds;
    /// `reactive` gates the traveling wave.
    pub fn update(&mut self, params: &VisualParams, time: f32, reactive: bool) {
        let k    = self.config.blend;
        let gain = if reactive { self.config.wave_gain } else { 0.0 };
        let glow = glow_color(params.glow);
        let sc   = params.scale;

        for (i, ((pos, base), col)) in self
            .positions
            .iter_mut()
            .zip(&self.base)
            .zip(self.colors.iter_mut())
            .enumerate()
        {
            let wave = (time * 0.5 + i as f32 * 0.003).sin() * 0.01 * gain;
            let target = [base[0] * sc + wave, base[1] * sc + wave, base[2] * sc];
            for axis in 0..3 {
                pos[axis] = lerp(pos[axis], target[axis], k);
                col[axis] = lerp(col[axis], glow[axis], k);
            }
        }
    }
}

impl Default for ParticleField {
    fn default() -> Self {
        ParticleField::new(ParticleConfig::default())
    }
}

/// Point `i` of `n` spread evenly over a sphere of radius `r`.
pub fn fibonacci_point(i: usize, n: usize, r: f32) -> [f32; 3] {
    let golden = std::f32::consts::PI * (1.0 + 5.0f32.sqrt());
    let phi    = (1.0 - 2.0 * (i as f32 + 0.5) / n as f32).acos();
    let theta  = golden * i as f32;
    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ParticleField {
        ParticleField::new(ParticleConfig { count: 200, ..ParticleConfig::default() })
    }

    fn norm(p: &[f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn points_lie_on_sphere() {
        let f = small();
        assert_eq!(f.len(), 200);
        for p in f.base() {
            assert!((norm(p) - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn neutral_params_keep_positions() {
        let mut f = small();
        let before = f.positions().to_vec();
        f.update(&VisualParams::NEUTRAL, 1.0, false);
        assert_eq!(f.positions(), &before[..]);
    }

    #[test]
    fn scale_is_approached_gradually() {
        let mut f = small();
        let params = VisualParams { scale: 2.0, ..VisualParams::NEUTRAL };
        f.update(&params, 0.0, false);
        let r = norm(&f.positions()[10]);
        assert!(r > 3.0 && r < 6.0);
        for _ in 0..200 { f.update(&params, 0.0, false); }
        assert!((norm(&f.positions()[10]) - 6.0).abs() < 1e-3);
    }

    #[test]
    fn colors_follow_glow() {
        let mut f = small();
        let params = VisualParams { glow: 1.0, ..VisualParams::NEUTRAL };
        for _ in 0..200 { f.update(&params, 0.0, false); }
        let c = f.colors()[0];
        assert!((c[0] - 0.8).abs() < 1e-3);
        assert!((c[1] - 1.0).abs() < 1e-3);
        assert!((c[2] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn ambient_palette_is_less_saturated() {
        let vivid   = ParticleField::new(ParticleConfig { count: 10, ..ParticleConfig::default() });
        let ambient = ParticleField::new(ParticleConfig { count: 10, ..ParticleConfig::ambient() });
        let spread = |c: &[f32; 3]| c.iter().cloned().fold(f32::MIN, f32::max)
            - c.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread(&ambient.colors()[0]) < spread(&vivid.colors()[0]));
        assert_eq!(ParticleConfig::ambient().count, 3000);
    }

    #[test]
    fn hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);
        assert_eq!(hsl_to_rgb(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]);
    }
}
