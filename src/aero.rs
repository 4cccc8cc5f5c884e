//! Closed-form aero model.
//!
//! Coefficients come from the wing/sidepod settings and the angle of attack;
//! forces scale them by the dynamic pressure of the tunnel air. Nothing here
//! reads the flow lines, and the flow lines never read this.

use std::f64::consts::PI;

use crate::parameters::TunnelParameters;

const BASE_CL: f64 = 2.5;
const BASE_CD: f64 = 0.8;

const FRONT_WING_GAIN: f64 = 0.4;
const REAR_WING_GAIN: f64 = 0.5;
const SIDEPODS_GAIN: f64 = 0.1;

// Effective span factor used for induced drag. Both factors are kept as-is.
const INDUCED_DRAG_DIVISOR: f64 = PI * 3.14;

/// kg/m^3, sea level
pub const AIR_DENSITY: f64 = 1.225;
/// m^2
pub const REFERENCE_AREA: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroCoefficients {
    pub cl: f64, // Lift (downforce) coefficient
    pub cd: f64, // Drag coefficient, induced part included
}

/// Unrounded forces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AeroForces {
    pub downforce: f64,
    pub drag: f64,
    pub efficiency: f64,
}

pub fn compute_coefficients(params: &TunnelParameters) -> AeroCoefficients {
    let front_wing_effect = (params.front_wing / 100.0) * FRONT_WING_GAIN;
    let rear_wing_effect = (params.rear_wing / 100.0) * REAR_WING_GAIN;
    let sidepods_effect = (params.sidepods / 100.0) * SIDEPODS_GAIN;

    // Negative once |angle| passes 10 degrees; parameters are clamped before they get here.
    let angle_effect = 1.0 - params.angle_of_attack.abs() / 10.0;

    let cl = BASE_CL * (front_wing_effect + rear_wing_effect + sidepods_effect) * angle_effect;

    let induced_drag = cl.powi(2) / INDUCED_DRAG_DIVISOR;
    let cd = BASE_CD * (front_wing_effect * 0.5 + rear_wing_effect * 0.7 + sidepods_effect * 0.3)
        + induced_drag;

    AeroCoefficients { cl, cd }
}

/// q = 0.5 * rho * v^2, with v given in km/h.
pub fn dynamic_pressure(wind_speed_kmh: f64) -> f64 {
    let velocity = wind_speed_kmh / 3.6;
    0.5 * AIR_DENSITY * velocity.powi(2)
}

pub fn compute_forces(coefficients: AeroCoefficients, wind_speed_kmh: f64) -> AeroForces {
    let q = dynamic_pressure(wind_speed_kmh);

    let downforce = coefficients.cl * q * REFERENCE_AREA;
    let drag = coefficients.cd * q * REFERENCE_AREA;

    // Zero drag (still air) would divide by zero
    let efficiency = downforce / if drag == 0.0 { 1.0 } else { drag };

    AeroForces {
        downforce,
        drag,
        efficiency,
    }
}

/// Rounds halves toward positive infinity, so -2.5 becomes -2.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Rounds to one decimal place with the same half-up rule.
pub fn round_one_decimal(x: f64) -> f64 {
    round_half_up(x * 10.0) / 10.0
}

/// The three numbers shown to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    pub downforce: i64,
    pub drag: i64,
    pub efficiency: f64,
}

impl Telemetry {
    pub fn from_forces(forces: &AeroForces) -> Self {
        Self {
            downforce: round_half_up(forces.downforce) as i64,
            drag: round_half_up(forces.drag) as i64,
            efficiency: round_one_decimal(forces.efficiency),
        }
    }

    /// Coefficients, forces and rounding in one go.
    pub fn evaluate(params: &TunnelParameters) -> Self {
        let coefficients = compute_coefficients(params);
        Self::from_forces(&compute_forces(coefficients, params.wind_speed))
    }

    /// Gauge fills in [0, 1]. Each gauge saturates at 1000 kg downforce,
    /// 500 kg drag and 10:1 efficiency.
    pub fn downforce_fill(&self) -> f32 {
        (self.downforce as f32 / 1000.0).clamp(0.0, 1.0)
    }

    pub fn drag_fill(&self) -> f32 {
        (self.drag as f32 / 500.0).clamp(0.0, 1.0)
    }

    pub fn efficiency_fill(&self) -> f32 {
        (self.efficiency as f32 / 10.0).clamp(0.0, 1.0)
    }

    pub fn downforce_label(&self) -> String {
        format!("{} kg", self.downforce)
    }

    pub fn drag_label(&self) -> String {
        format!("{} kg", self.drag)
    }

    pub fn efficiency_label(&self) -> String {
        format!("{}:1", self.efficiency)
    }
}
