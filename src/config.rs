// Compiled-in tuning for the particle background. Nothing here is read at
// runtime; tests build variants with struct-update syntax.

use vecmath::Vector2;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    /// Id of the canvas element the background draws into.
    pub canvas_id: &'static str,
    pub max_particles: usize,
    /// Surface area (px²) that earns one particle.
    pub area_per_particle: f64,
    /// Each velocity component is drawn from [-max_speed, max_speed].
    pub max_speed: f64,
    pub min_spawn_radius: f64,
    pub max_spawn_radius: f64,
    pub min_base_opacity: f64,
    pub max_base_opacity: f64,
    /// Velocity multiplier applied on a wall hit.
    pub bounce: f64,
    pub pointer_radius: f64,
    pub growth: f64,
    pub opacity_boost: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub radius_decay: f64,
    pub opacity_decay: f64,
    pub link_distance: f64,
    pub link_alpha: f64,
    pub pointer_idle_ms: f64,
    /// Where the pointer is parked when nobody is moving it.
    pub absent_pointer: Vector2<f64>,
}

impl FieldConfig {
    // Number of particles seeded for a surface, fixed for the life of the field
    pub fn particle_count(&self, width: f64, height: f64) -> usize {
        if !(width > 0.0 && height > 0.0) {
            return 0;
        }
        let by_area = (width * height / self.area_per_particle).floor() as usize;
        by_area.min(self.max_particles)
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            canvas_id: "bg",
            max_particles: 150,
            area_per_particle: 8000.0,
            max_speed: 0.4,
            min_spawn_radius: 1.0,
            max_spawn_radius: 4.0,
            min_base_opacity: 0.2,
            max_base_opacity: 1.0,
            bounce: 0.8,
            pointer_radius: 100.0,
            growth: 0.3,
            opacity_boost: 0.5,
            min_radius: 1.0,
            max_radius: 6.0,
            radius_decay: 0.99,
            opacity_decay: 0.01,
            link_distance: 120.0,
            link_alpha: 0.2,
            pointer_idle_ms: 2000.0,
            absent_pointer: [-1000.0, -1000.0],
        }
    }
}
