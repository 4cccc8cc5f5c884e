//! Flow line classes and the spawner that seeds a full set of lines.

use nalgebra as na;
use rand::Rng;

/// Lines are bucketed by index modulo 4, so each class gets a quarter of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowClass {
    /// Above the body
    HighPressure,
    /// Under the body
    LowPressure,
    /// Outboard of the sidepods
    Vortex,
    /// Hugging the floor
    BoundaryLayer,
}

pub const ALL_FLOW_CLASSES: [FlowClass; 4] = [
    FlowClass::HighPressure,
    FlowClass::LowPressure,
    FlowClass::Vortex,
    FlowClass::BoundaryLayer,
];

impl FlowClass {
    pub fn for_index(index: usize) -> Self {
        ALL_FLOW_CLASSES[index % ALL_FLOW_CLASSES.len()]
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            FlowClass::HighPressure => [0xff, 0x00, 0x00],
            FlowClass::LowPressure => [0x00, 0x88, 0xff],
            FlowClass::Vortex => [0xff, 0x00, 0xff],
            FlowClass::BoundaryLayer => [0xff, 0xff, 0x00],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowClass::HighPressure => "High pressure",
            FlowClass::LowPressure => "Low pressure",
            FlowClass::Vortex => "Vortex",
            FlowClass::BoundaryLayer => "Boundary layer",
        }
    }

    /// Boundary layer air is slowed by the floor, vortices spin up.
    pub fn speed_multiplier(&self) -> f64 {
        match self {
            FlowClass::BoundaryLayer => 0.3,
            FlowClass::Vortex => 1.5,
            FlowClass::HighPressure | FlowClass::LowPressure => 1.0,
        }
    }

    /// Line speed for this class at the given wind speed (km/h).
    pub fn base_speed(&self, wind_speed: f64) -> f64 {
        wind_speed / 20.0 * self.speed_multiplier()
    }

    /// Random start position inside this class's spawn volume.
    pub fn sample_origin<R: Rng + ?Sized>(&self, rng: &mut R) -> na::Point3<f64> {
        let z_of = |r: f64| r * 8.0 - 2.0;

        match self {
            FlowClass::HighPressure => {
                let x = (rng.gen::<f64>() - 0.5) * 3.0;
                let y = rng.gen::<f64>() * 0.5 + 0.7;
                na::Point3::new(x, y, z_of(rng.gen()))
            }
            FlowClass::LowPressure => {
                let x = (rng.gen::<f64>() - 0.5) * 3.0;
                let y = rng.gen::<f64>() * 0.3;
                na::Point3::new(x, y, z_of(rng.gen()))
            }
            FlowClass::Vortex => {
                let side = if rng.gen::<f64>() > 0.5 { 1.0 } else { -1.0 };
                let x = side * (0.8 + rng.gen::<f64>() * 0.5);
                let y = rng.gen::<f64>() * 0.8 + 0.2;
                na::Point3::new(x, y, z_of(rng.gen()))
            }
            FlowClass::BoundaryLayer => {
                let x = (rng.gen::<f64>() - 0.5) * 3.0;
                let y = rng.gen::<f64>() * 0.1;
                na::Point3::new(x, y, z_of(rng.gen()))
            }
        }
    }
}

/// Where a line starts and how fast it moves. Fixed for the line's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowSeed {
    pub class: FlowClass,
    pub origin: na::Point3<f64>,
    pub base_speed: f64,
}

pub fn spawn_seeds<R: Rng + ?Sized>(count: usize, wind_speed: f64, rng: &mut R) -> Vec<FlowSeed> {
    (0..count)
        .map(|i| {
            let class = FlowClass::for_index(i);
            FlowSeed {
                class,
                origin: class.sample_origin(rng),
                base_speed: class.base_speed(wind_speed),
            }
        })
        .collect()
}
