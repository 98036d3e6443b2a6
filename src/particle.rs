// Plain particle record. Particles have no identity beyond their slot in the
// field; they are re-rolled in place, never removed.

use crate::config::FieldConfig;
use rand::Rng;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
    /// Resting opacity the particle relaxes back to once the pointer leaves.
    pub base_opacity: f64,
}

impl Particle {
    pub fn new(pos: Vector2<f64>, vel: Vector2<f64>, radius: f64, base_opacity: f64) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            opacity: base_opacity,
            base_opacity,
        }
    }

    // Fresh particle somewhere on a surface of the given size
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: Vector2<f64>,
        config: &FieldConfig,
    ) -> Particle {
        let mut particle = Particle::new([0.0, 0.0], [0.0, 0.0], config.min_spawn_radius, 0.0);
        particle.reset(rng, bounds, config);
        let span = config.max_base_opacity - config.min_base_opacity;
        particle.base_opacity = rng.gen::<f64>() * span + config.min_base_opacity;
        particle.opacity = particle.base_opacity;
        particle
    }

    /// Re-rolls position, velocity and radius. Opacity is left alone.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: Vector2<f64>,
        config: &FieldConfig,
    ) {
        self.pos = [rng.gen::<f64>() * bounds[0], rng.gen::<f64>() * bounds[1]];
        self.vel = [
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
        ];
        let span = config.max_spawn_radius - config.min_spawn_radius;
        self.radius = rng.gen::<f64>() * span + config.min_spawn_radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_spawn_ranges(p: &Particle, bounds: Vector2<f64>, config: &FieldConfig) {
        assert!(p.pos[0] >= 0.0 && p.pos[0] <= bounds[0], "x = {}", p.pos[0]);
        assert!(p.pos[1] >= 0.0 && p.pos[1] <= bounds[1], "y = {}", p.pos[1]);
        assert!(p.vel[0].abs() <= config.max_speed);
        assert!(p.vel[1].abs() <= config.max_speed);
        assert!(p.radius >= config.min_spawn_radius && p.radius < config.max_spawn_radius);
    }

    #[test]
    fn reset_stays_in_range() {
        let config = FieldConfig::default();
        let bounds = [800.0, 600.0];
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = Particle::spawn(&mut rng, bounds, &config);
        for _ in 0..500 {
            p.reset(&mut rng, bounds, &config);
            assert_spawn_ranges(&p, bounds, &config);
        }
    }

    #[test]
    fn reset_twice_with_same_seed() {
        let config = FieldConfig::default();
        let bounds = [320.0, 240.0];
        let mut p = Particle::new([5.0, 5.0], [0.0, 0.0], 2.0, 0.5);

        let mut rng = StdRng::seed_from_u64(42);
        p.reset(&mut rng, bounds, &config);
        let first = p;
        let mut rng = StdRng::seed_from_u64(42);
        p.reset(&mut rng, bounds, &config);

        assert_spawn_ranges(&first, bounds, &config);
        assert_spawn_ranges(&p, bounds, &config);
        assert_eq!(first, p);
    }

    #[test]
    fn reset_keeps_opacity() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particle::new([1.0, 1.0], [0.0, 0.0], 2.0, 0.3);
        p.opacity = 0.8;
        p.reset(&mut rng, [100.0, 100.0], &config);
        assert_eq!(p.opacity, 0.8);
        assert_eq!(p.base_opacity, 0.3);
    }

    #[test]
    fn spawn_draws_base_opacity() {
        let config = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let p = Particle::spawn(&mut rng, [640.0, 480.0], &config);
            assert!(p.base_opacity >= 0.2 && p.base_opacity < 1.0);
            assert_eq!(p.opacity, p.base_opacity);
        }
    }
}
