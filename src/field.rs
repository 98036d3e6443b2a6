// Simulation context: the particle store plus everything a step reads. Event
// callbacks never touch particles directly; they queue a FieldInput that is
// applied at the start of the next advance.

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::pointer::PointerTracker;
use crate::stepper;
use rand::Rng;
use std::collections::VecDeque;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FieldInput {
    PointerMoved { x: f64, y: f64, at_ms: f64 },
    Resized { width: f64, height: f64 },
}

pub struct ParticleField {
    config: FieldConfig,
    bounds: Vector2<f64>,
    particles: Vec<Particle>,
    pointer: PointerTracker,
    inputs: VecDeque<FieldInput>,
}

impl ParticleField {
    pub fn new(config: FieldConfig, width: f64, height: f64) -> Self {
        ParticleField::seeded(config, width, height, &mut rand::thread_rng())
    }

    /// Seeds the store once; the particle count never changes afterwards.
    pub fn seeded<R: Rng + ?Sized>(
        config: FieldConfig,
        width: f64,
        height: f64,
        rng: &mut R,
    ) -> Self {
        let bounds = [width, height];
        let count = config.particle_count(width, height);
        let particles = (0..count)
            .map(|_| Particle::spawn(rng, bounds, &config))
            .collect();
        let pointer = PointerTracker::new(config.absent_pointer, config.pointer_idle_ms);
        ParticleField {
            config,
            bounds,
            particles,
            pointer,
            inputs: VecDeque::new(),
        }
    }

    pub fn push(&mut self, input: FieldInput) {
        self.inputs.push_back(input);
    }

    /// Applies queued inputs in arrival order, lets an idle pointer lapse, then
    /// steps every particle once.
    pub fn advance(&mut self, now_ms: f64) {
        while let Some(input) = self.inputs.pop_front() {
            self.apply(input);
        }
        self.pointer.expire(now_ms);

        let pointer = self.pointer.position();
        for particle in &mut self.particles {
            stepper::step(particle, pointer, self.bounds, &self.config);
        }
    }

    // Existing positions are left alone on resize; the next step clamps them.
    fn apply(&mut self, input: FieldInput) {
        match input {
            FieldInput::PointerMoved { x, y, at_ms } => self.pointer.move_to([x, y], at_ms),
            FieldInput::Resized { width, height } => self.bounds = [width, height],
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn bounds(&self) -> Vector2<f64> {
        self.bounds
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}
