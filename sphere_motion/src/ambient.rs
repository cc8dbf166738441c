//! The sphere shown while hand tracking is off.
//!
//! No smoothing and no gestures: rotation is a pure function of animation
//! time, a slow turn about Y with a gentle nod about X.  The field keeps its
//! own sparser particle set and never reshapes.

use serde::Deserialize;

use crate::particles::{ParticleConfig, ParticleField};
use crate::smoother::VisualParams;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Turn about Y, radians per second.
    pub spin:      f32,
    /// Angular frequency of the nod about X, radians per second.
    pub nod_rate:  f32,
    /// Peak nod about X, radians.
    pub nod_depth: f32,
    pub particles: ParticleConfig,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        AmbientConfig {
            spin:      0.1,
            nod_rate:  0.2,
            nod_depth: 0.1,
            particles: ParticleConfig::ambient(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AmbientSphere {
    config: AmbientConfig,
    field:  ParticleField,
}

impl AmbientSphere {
    pub fn new(config: AmbientConfig) -> Self {
        let field = ParticleField::new(config.particles.clone());
        AmbientSphere { config, field }
    }

    pub fn field(&self) -> &ParticleField { &self.field }

    /// Parameters at `time` seconds of animation time.
    pub fn params(&self, time: f32) -> VisualParams {
        VisualParams {
            rotation_y: time * self.config.spin,
            rotation_x: (time * self.config.nod_rate).sin() * self.config.nod_depth,
            ..VisualParams::NEUTRAL
        }
    }
}

impl Default for AmbientSphere {
    fn default() -> Self {
        AmbientSphere::new(AmbientConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_follows_the_clock() {
        let s = AmbientSphere::new(AmbientConfig {
            particles: ParticleConfig { count: 8, ..ParticleConfig::ambient() },
            ..AmbientConfig::default()
        });
        for t in [0.0f32, 1.0, 7.5, 40.0] {
            let p = s.params(t);
            assert!((p.rotation_y - t * 0.1).abs() < 1e-6);
            assert!((p.rotation_x - (t * 0.2).sin() * 0.1).abs() < 1e-6);
            assert_eq!(p.scale, 1.0);
            assert_eq!(p.glow, 0.0);
        }
    }

    #[test]
    fn field_is_the_ambient_set() {
        let s = AmbientSphere::default();
        assert_eq!(s.field().len(), 3000);
        assert_eq!(s.field().positions(), s.field().base());
    }
}
