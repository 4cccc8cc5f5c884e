use serde::{Deserialize, Serialize};

use crate::drs::DrsState;
use crate::error::{Result, TunnelError};

pub const WIND_SPEED_RANGE: (f64, f64) = (0.0, 320.0);
pub const ANGLE_OF_ATTACK_RANGE: (f64, f64) = (-10.0, 10.0);
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

pub const WIND_SPEED_STEP: f64 = 5.0;
pub const ANGLE_OF_ATTACK_STEP: f64 = 0.5;
pub const PERCENT_STEP: f64 = 1.0;

/// Everything the control surface can set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelParameters {
    /// km/h
    pub wind_speed: f64,
    /// degrees
    pub angle_of_attack: f64,
    /// percent
    pub front_wing: f64,
    /// percent
    pub rear_wing: f64,
    /// percent
    pub sidepods: f64,
    pub drs: DrsState,
}

impl Default for TunnelParameters {
    fn default() -> Self {
        Self {
            wind_speed: 60.0,
            angle_of_attack: 0.0,
            front_wing: 50.0,
            rear_wing: 50.0,
            sidepods: 50.0,
            drs: DrsState::default(),
        }
    }
}

fn clamp_to(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

fn snap_to(value: f64, step: f64, range: (f64, f64)) -> f64 {
    clamp_to((value / step).round() * step, range)
}

impl TunnelParameters {
    /// Pull every numeric field into its domain. NaN maps to the lower bound.
    pub fn clamped(self) -> Self {
        Self {
            wind_speed: clamp_to(self.wind_speed, WIND_SPEED_RANGE),
            angle_of_attack: clamp_to(self.angle_of_attack, ANGLE_OF_ATTACK_RANGE),
            front_wing: clamp_to(self.front_wing, PERCENT_RANGE),
            rear_wing: clamp_to(self.rear_wing, PERCENT_RANGE),
            sidepods: clamp_to(self.sidepods, PERCENT_RANGE),
            drs: self.drs,
        }
    }

    /// Clamp, then round each field to its slider step.
    pub fn snapped(self) -> Self {
        let p = self.clamped();
        Self {
            wind_speed: snap_to(p.wind_speed, WIND_SPEED_STEP, WIND_SPEED_RANGE),
            angle_of_attack: snap_to(
                p.angle_of_attack,
                ANGLE_OF_ATTACK_STEP,
                ANGLE_OF_ATTACK_RANGE,
            ),
            front_wing: snap_to(p.front_wing, PERCENT_STEP, PERCENT_RANGE),
            rear_wing: snap_to(p.rear_wing, PERCENT_STEP, PERCENT_RANGE),
            sidepods: snap_to(p.sidepods, PERCENT_STEP, PERCENT_RANGE),
            drs: p.drs,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("wind_speed", self.wind_speed, WIND_SPEED_RANGE),
            ("angle_of_attack", self.angle_of_attack, ANGLE_OF_ATTACK_RANGE),
            ("front_wing", self.front_wing, PERCENT_RANGE),
            ("rear_wing", self.rear_wing, PERCENT_RANGE),
            ("sidepods", self.sidepods, PERCENT_RANGE),
        ];

        for (field, value, (min, max)) in fields {
            if !(min..=max).contains(&value) {
                return Err(TunnelError::OutOfDomain {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// True when anything that steers the flow lines differs: wind speed,
    /// angle of attack or a wing. Sidepods and DRS only affect telemetry and
    /// the flap.
    pub fn flow_inputs_differ(&self, other: &Self) -> bool {
        self.wind_speed != other.wind_speed
            || self.angle_of_attack != other.angle_of_attack
            || self.front_wing != other.front_wing
            || self.rear_wing != other.rear_wing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_landing_state() {
        let p = TunnelParameters::default();
        assert_eq!(p.wind_speed, 60.0);
        assert_eq!(p.angle_of_attack, 0.0);
        assert!(!p.drs.engaged());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn clamped_pulls_values_into_domain() {
        let p = TunnelParameters {
            wind_speed: 500.0,
            angle_of_attack: -12.0,
            front_wing: -1.0,
            rear_wing: 101.0,
            sidepods: f64::NAN,
            drs: DrsState::default(),
        }
        .clamped();

        assert_eq!(
            p,
            TunnelParameters {
                wind_speed: 320.0,
                angle_of_attack: -10.0,
                front_wing: 0.0,
                rear_wing: 100.0,
                sidepods: 0.0,
                drs: DrsState::default(),
            }
        );
    }

    #[test]
    fn snapped_uses_slider_steps() {
        let p = TunnelParameters {
            wind_speed: 212.4,
            angle_of_attack: 3.3,
            front_wing: 42.6,
            ..Default::default()
        }
        .snapped();

        assert_eq!(p.wind_speed, 210.0);
        assert_eq!(p.angle_of_attack, 3.5);
        assert_eq!(p.front_wing, 43.0);
    }

    #[test]
    fn validate_reports_first_bad_field() {
        let p = TunnelParameters {
            rear_wing: 140.0,
            ..Default::default()
        };
        match p.validate() {
            Err(TunnelError::OutOfDomain { field, value, .. }) => {
                assert_eq!(field, "rear_wing");
                assert_eq!(value, 140.0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_nan() {
        let p = TunnelParameters {
            angle_of_attack: f64::NAN,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn drs_and_sidepods_are_not_flow_inputs() {
        let a = TunnelParameters::default();
        let mut b = a;
        b.drs.toggle();
        assert!(!a.flow_inputs_differ(&b));

        b.sidepods = 90.0;
        assert!(!a.flow_inputs_differ(&b));

        b.front_wing = 70.0;
        assert!(a.flow_inputs_differ(&b));
    }
}
