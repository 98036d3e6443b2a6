// Advances one particle by one frame: Euler move, per-axis wall bounce, then
// the pointer proximity response.

use crate::config::FieldConfig;
use crate::particle::Particle;
use vecmath::{vec2_add, vec2_len, vec2_sub, Vector2};

pub fn step(
    particle: &mut Particle,
    pointer: Vector2<f64>,
    bounds: Vector2<f64>,
    config: &FieldConfig,
) {
    particle.pos = vec2_add(particle.pos, particle.vel);

    // Axes bounce independently, so a corner hit is two clamps rather than a
    // diagonal reflection.
    for axis in 0..2 {
        let limit = bounds[axis];
        if particle.pos[axis] < 0.0 || particle.pos[axis] > limit {
            particle.vel[axis] *= -config.bounce;
            particle.pos[axis] = particle.pos[axis].min(limit).max(0.0);
        }
    }

    let distance = vec2_len(vec2_sub(pointer, particle.pos));
    match proximity_force(distance, config) {
        Some(force) => {
            particle.opacity = (particle.base_opacity + force * config.opacity_boost).min(1.0);
            particle.radius =
                (particle.radius * (1.0 + force * config.growth)).min(config.max_radius);
        }
        None => {
            particle.opacity = (particle.opacity - config.opacity_decay).max(particle.base_opacity);
            particle.radius = (particle.radius * config.radius_decay).max(config.min_radius);
        }
    }
}

/// Force in (0, 1] for a particle inside the pointer radius, None outside it.
pub fn proximity_force(distance: f64, config: &FieldConfig) -> Option<f64> {
    if distance < config.pointer_radius {
        Some((config.pointer_radius - distance) / config.pointer_radius)
    } else {
        None
    }
}
