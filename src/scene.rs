//! What a renderer needs each frame. Geometry, materials and cameras are the
//! renderer's business; this only hands over positions and angles.

use std::f64::consts::TAU;

use crate::flow::FlowLine;
use crate::parameters::TunnelParameters;

/// Degrees the DRS flap opens to.
pub const DRS_FLAP_OPEN_DEG: f64 = 70.0;

/// Fan spin rate in rad/s for the given wind speed (km/h).
pub fn fan_angular_speed(wind_speed: f64) -> f64 {
    wind_speed / 30.0
}

/// Advance the fan by `dt` seconds, kept in [0, 2pi).
pub fn spin_fan(rotation: f64, dt: f64, wind_speed: f64) -> f64 {
    (rotation + dt * fan_angular_speed(wind_speed)).rem_euclid(TAU)
}

/// Angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub body_pitch: f64,
    pub front_wing_pitch: f64,
    pub rear_wing_pitch: f64,
    pub drs_flap: f64,
}

impl VehiclePose {
    pub fn from_parameters(params: &TunnelParameters) -> Self {
        Self {
            body_pitch: params.angle_of_attack * 0.5,
            front_wing_pitch: (params.front_wing - 50.0) * 0.1,
            rear_wing_pitch: (params.rear_wing - 50.0) * -0.1,
            drs_flap: if params.drs.engaged() { DRS_FLAP_OPEN_DEG } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub lines: &'a [FlowLine],
    pub fan_rotation: f64,
    pub pose: VehiclePose,
    pub generation: u64,
}
