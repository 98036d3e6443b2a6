// Renderer that turns the particle field into one frame: a soft glowing disk
// per particle, then a faint line between every pair close enough to link.
// Drawing goes through the Surface trait so frames can be recorded off-browser.

use crate::color::Color;
use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::field::ParticleField;
use std::f64::consts::PI;
use vecmath::{vec2_len, vec2_sub, Vector2};
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), FieldError>;

    /// Filled disk with a radial fade from `color` at `opacity` to transparent.
    fn draw_glow(
        &mut self,
        center: Vector2<f64>,
        radius: f64,
        opacity: f64,
        color: Color,
    ) -> Result<(), FieldError>;

    fn draw_line(
        &mut self,
        from: Vector2<f64>,
        to: Vector2<f64>,
        alpha: f64,
        color: Color,
    ) -> Result<(), FieldError>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub particles: usize,
    pub connections: usize,
}

/// Line alpha for a pair `distance` apart, or None when they are too far to link.
pub fn connection_alpha(distance: f64, config: &FieldConfig) -> Option<f64> {
    if distance < config.link_distance {
        Some((config.link_distance - distance) / config.link_distance * config.link_alpha)
    } else {
        None
    }
}

pub struct Renderer<S: Surface> {
    pub surface: S,
    pub color: Color,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Renderer {
            surface,
            color: Color::WHITE,
        }
    }

    pub fn clear(&mut self, field: &ParticleField) -> Result<(), FieldError> {
        let [width, height] = field.bounds();
        self.surface.clear(width, height)
    }

    // The link pass checks every unordered pair, n(n-1)/2 distances per frame.
    // That is fine at the 150 particle cap; a few hundred more would need a
    // spatial grid.
    pub fn render(&mut self, field: &ParticleField) -> Result<FrameStats, FieldError> {
        self.clear(field)?;

        let particles = field.particles();
        for p in particles {
            self.surface.draw_glow(p.pos, p.radius, p.opacity, self.color)?;
        }

        let mut connections = 0;
        for (i, a) in particles.iter().enumerate() {
            for b in &particles[i + 1..] {
                let distance = vec2_len(vec2_sub(a.pos, b.pos));
                if let Some(alpha) = connection_alpha(distance, field.config()) {
                    self.surface.draw_line(a.pos, b.pos, alpha, self.color)?;
                    connections += 1;
                }
            }
        }

        Ok(FrameStats {
            particles: particles.len(),
            connections,
        })
    }
}

pub struct CanvasSurface {
    pub context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        CanvasSurface { context }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), FieldError> {
        self.context.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn draw_glow(
        &mut self,
        center: Vector2<f64>,
        radius: f64,
        opacity: f64,
        color: Color,
    ) -> Result<(), FieldError> {
        let ctx = &self.context;
        let [x, y] = center;
        let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
        gradient.add_color_stop(0.0, &color.rgba(opacity))?;
        gradient.add_color_stop(1.0, &color.transparent())?;

        ctx.save();
        ctx.set_global_alpha(opacity);
        ctx.begin_path();
        ctx.set_fill_style_canvas_gradient(&gradient);
        let drawn = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
        if drawn.is_ok() {
            ctx.fill();
        }
        ctx.restore();
        drawn.map_err(FieldError::from)
    }

    fn draw_line(
        &mut self,
        from: Vector2<f64>,
        to: Vector2<f64>,
        alpha: f64,
        color: Color,
    ) -> Result<(), FieldError> {
        let ctx = &self.context;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_stroke_style_str(&color.rgba(0.3));
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(from[0], from[1]);
        ctx.line_to(to[0], to[1]);
        ctx.stroke();
        ctx.restore();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(f64, f64),
        Glow { radius: f64, opacity: f64 },
        Line { from: Vector2<f64>, to: Vector2<f64>, alpha: f64 },
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn clear(&mut self, width: f64, height: f64) -> Result<(), FieldError> {
            self.ops.push(Op::Clear(width, height));
            Ok(())
        }

        fn draw_glow(
            &mut self,
            _: Vector2<f64>,
            radius: f64,
            opacity: f64,
            _: Color,
        ) -> Result<(), FieldError> {
            self.ops.push(Op::Glow { radius, opacity });
            Ok(())
        }

        fn draw_line(
            &mut self,
            from: Vector2<f64>,
            to: Vector2<f64>,
            alpha: f64,
            _: Color,
        ) -> Result<(), FieldError> {
            self.ops.push(Op::Line { from, to, alpha });
            Ok(())
        }
    }

    fn field_with(positions: &[Vector2<f64>]) -> ParticleField {
        let mut rng = StdRng::seed_from_u64(1);
        // 400x400 seeds 20 particles, more than any test places
        let mut field = ParticleField::seeded(FieldConfig::default(), 400.0, 400.0, &mut rng);
        for (i, p) in field.particles_mut().iter_mut().enumerate() {
            // Park the rest 200px apart off to the right so they never link
            let pos = positions.get(i).copied().unwrap_or([1000.0 + i as f64 * 200.0, 0.0]);
            *p = Particle::new(pos, [0.0, 0.0], 2.0, 0.5);
        }
        field
    }

    #[test]
    fn alpha_falls_off_with_distance() {
        let config = FieldConfig::default();
        assert!((connection_alpha(60.0, &config).unwrap() - 0.1).abs() < 1e-12);
        assert!((connection_alpha(0.0, &config).unwrap() - 0.2).abs() < 1e-12);
        assert_eq!(connection_alpha(120.0, &config), None);
        assert_eq!(connection_alpha(500.0, &config), None);
    }

    #[test]
    fn pair_at_sixty_links_at_one_tenth() {
        let field = field_with(&[[100.0, 100.0], [160.0, 100.0]]);
        let mut renderer = Renderer::new(Recorder::default());
        let stats = renderer.render(&field).unwrap();

        assert_eq!(stats.connections, 1);
        let lines: Vec<&Op> = renderer
            .surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Line { .. }))
            .collect();
        match lines.as_slice() {
            [Op::Line { from, to, alpha }] => {
                assert_eq!(*from, [100.0, 100.0]);
                assert_eq!(*to, [160.0, 100.0]);
                assert!((alpha - 0.1).abs() < 1e-12);
            }
            other => panic!("expected one line, got {:?}", other),
        }
    }

    #[test]
    fn pair_at_link_distance_is_not_drawn() {
        let field = field_with(&[[100.0, 100.0], [220.0, 100.0]]);
        let mut renderer = Renderer::new(Recorder::default());
        let stats = renderer.render(&field).unwrap();
        assert_eq!(stats.connections, 0);
        assert!(!renderer.surface.ops.iter().any(|op| matches!(op, Op::Line { .. })));
    }

    #[test]
    fn frame_clears_then_draws_every_particle() {
        let field = field_with(&[[10.0, 10.0], [20.0, 10.0], [30.0, 10.0]]);
        let mut renderer = Renderer::new(Recorder::default());
        let stats = renderer.render(&field).unwrap();

        let ops = &renderer.surface.ops;
        assert_eq!(ops[0], Op::Clear(400.0, 400.0));
        let glows = ops.iter().filter(|op| matches!(op, Op::Glow { .. })).count();
        assert_eq!(glows, field.particles().len());
        assert_eq!(stats.particles, field.particles().len());
        // three close particles form a triangle
        assert_eq!(stats.connections, 3);
    }
}
