//! A single flow line: a fixed-length trailing polyline advanced through a
//! scripted velocity field.

use nalgebra as na;
use rand::Rng;

use super::class::{FlowClass, FlowSeed};
use crate::parameters::TunnelParameters;

pub const DEFAULT_POINTS_PER_LINE: usize = 50;

/// Depth gap between neighbouring points of a fresh line.
pub const POINT_SPACING: f64 = 0.1;

/// Lines whose head passes this depth start over.
pub const RESET_DEPTH: f64 = -15.0;

const SPEED_SCALE: f64 = 0.02;
const ANGLE_DRIFT: f64 = 0.1;
const WING_BIAS: f64 = 0.003;
const TURBULENCE: f64 = 0.003;
const RESEED_JITTER: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Reseeded,
}

#[derive(Debug, Clone)]
pub struct FlowLine {
    seed: FlowSeed,
    /// Head first.
    points: Vec<na::Point3<f64>>,
}

impl FlowLine {
    /// Lay the line out straight behind its origin.
    pub fn new(seed: FlowSeed, num_points: usize) -> Self {
        let o = seed.origin;
        let points = (0..num_points)
            .map(|i| na::Point3::new(o.x, o.y, o.z + i as f64 * POINT_SPACING))
            .collect();

        FlowLine { seed, points }
    }

    pub fn class(&self) -> FlowClass {
        self.seed.class
    }

    pub fn origin(&self) -> na::Point3<f64> {
        self.seed.origin
    }

    pub fn base_speed(&self) -> f64 {
        self.seed.base_speed
    }

    pub fn points(&self) -> &[na::Point3<f64>] {
        &self.points
    }

    pub fn head(&self) -> na::Point3<f64> {
        self.points[0]
    }

    /// `[x0, y0, z0, x1, ...]`, the layout a vertex buffer wants.
    pub fn flat_positions(&self) -> Vec<f32> {
        self.points
            .iter()
            .flat_map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    /// Advance the head one step and drag the tail along behind it.
    pub fn tick<R: Rng + ?Sized>(&mut self, params: &TunnelParameters, rng: &mut R) -> TickOutcome {
        let head = self.head();
        let base_speed = self.seed.base_speed;
        let speed_effect = base_speed * SPEED_SCALE;

        let new_z = head.z - speed_effect;
        let new_y = head.y + params.angle_of_attack * ANGLE_DRIFT * speed_effect;

        let wing_effect = ((params.front_wing - 50.0) * WING_BIAS
            + (params.rear_wing - 50.0) * WING_BIAS)
            * speed_effect;

        let new_x = head.x + (rng.gen::<f64>() - 0.5) * TURBULENCE * base_speed;

        if new_z < RESET_DEPTH {
            self.reseed(rng);
            return TickOutcome::Reseeded;
        }

        self.points.rotate_right(1);
        self.points[0] = na::Point3::new(new_x, new_y + wing_effect, new_z);
        TickOutcome::Advanced
    }

    /// Scatter every point around the origin again, receding in depth.
    fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let o = self.seed.origin;
        for (i, p) in self.points.iter_mut().enumerate() {
            let x = o.x + (rng.gen::<f64>() - 0.5) * RESEED_JITTER;
            let y = o.y + (rng.gen::<f64>() - 0.5) * RESEED_JITTER;
            *p = na::Point3::new(x, y, o.z - i as f64 * POINT_SPACING);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seed(base_speed: f64) -> FlowSeed {
        FlowSeed {
            class: FlowClass::HighPressure,
            origin: na::Point3::new(0.25, 0.9, 3.0),
            base_speed,
        }
    }

    fn neutral() -> TunnelParameters {
        TunnelParameters {
            angle_of_attack: 0.0,
            front_wing: 50.0,
            rear_wing: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn new_line_trails_behind_origin() {
        let line = FlowLine::new(seed(3.0), DEFAULT_POINTS_PER_LINE);
        assert_eq!(line.points().len(), 50);
        assert_eq!(line.head(), na::Point3::new(0.25, 0.9, 3.0));
        let last = line.points()[49];
        assert!((last.z - (3.0 + 4.9)).abs() < 1e-12);
        assert_eq!(line.flat_positions().len(), 150);
    }

    #[test]
    fn tick_moves_head_downstream_and_shifts_tail() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut line = FlowLine::new(seed(3.0), DEFAULT_POINTS_PER_LINE);
        let before = line.points().to_vec();

        assert_eq!(line.tick(&neutral(), &mut rng), TickOutcome::Advanced);

        let head = line.head();
        assert!((head.z - (3.0 - 0.06)).abs() < 1e-12);
        assert_eq!(head.y, 0.9);
        assert!((head.x - 0.25).abs() <= 0.5 * TURBULENCE * 3.0);
        assert_eq!(&line.points()[1..], &before[..49]);
    }

    #[test]
    fn angle_of_attack_lifts_the_head() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut line = FlowLine::new(seed(4.0), DEFAULT_POINTS_PER_LINE);
        let params = TunnelParameters {
            angle_of_attack: 5.0,
            ..neutral()
        };
        line.tick(&params, &mut rng);
        // 5 * 0.1 * (4 * 0.02)
        assert!((line.head().y - (0.9 + 0.04)).abs() < 1e-12);
    }

    #[test]
    fn wing_trim_biases_vertically() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut line = FlowLine::new(seed(5.0), DEFAULT_POINTS_PER_LINE);
        let params = TunnelParameters {
            front_wing: 100.0,
            rear_wing: 0.0,
            ..neutral()
        };
        line.tick(&params, &mut rng);
        // Opposite trims cancel out
        assert!((line.head().y - 0.9).abs() < 1e-12);

        let params = TunnelParameters {
            front_wing: 100.0,
            rear_wing: 100.0,
            ..neutral()
        };
        line.tick(&params, &mut rng);
        // (50 * 0.003 + 50 * 0.003) * 0.1
        assert!((line.head().y - (0.9 + 0.03)).abs() < 1e-12);
    }

    #[test]
    fn still_air_line_does_not_move() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut line = FlowLine::new(seed(0.0), DEFAULT_POINTS_PER_LINE);
        line.tick(&neutral(), &mut rng);
        assert_eq!(line.head(), na::Point3::new(0.25, 0.9, 3.0));
    }

    #[test]
    fn crossing_reset_depth_reseeds_every_point() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut line = FlowLine::new(seed(16.0), DEFAULT_POINTS_PER_LINE);

        let mut before = line.points().to_vec();
        let mut outcome = TickOutcome::Advanced;
        for _ in 0..1000 {
            before = line.points().to_vec();
            outcome = line.tick(&neutral(), &mut rng);
            if outcome == TickOutcome::Reseeded {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::Reseeded);
        assert!(before[0].z - 16.0 * SPEED_SCALE < RESET_DEPTH);

        let origin = line.origin();
        for (i, p) in line.points().iter().enumerate() {
            assert!((p.z - (origin.z - i as f64 * POINT_SPACING)).abs() < 1e-12);
            assert!((p.x - origin.x).abs() <= 0.1);
            assert!((p.y - origin.y).abs() <= 0.1);
            assert!(!before.contains(p), "point {i} kept its old position");
        }
        for pair in line.points().windows(2) {
            assert!((pair[0].z - pair[1].z - POINT_SPACING).abs() < 1e-9);
        }
    }
}
