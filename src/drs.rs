//! Drag Reduction System state.
//!
//! Two sources write DRS: the driver's toggle and the speed-triggered auto
//! engagement. They are kept apart so the precedence is explicit: the flap is
//! open when either source asks for it, so above the threshold a manual
//! "deactivate" lasts only until the next evaluation.

use serde::{Deserialize, Serialize};

/// Wind speed (km/h) above which DRS engages on its own.
pub const DRS_THRESHOLD_KMH: f64 = 200.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrsState {
    /// Driver request from the toggle.
    pub manual: bool,
    /// Set by [`DrsState::evaluate`] while the speed is above the threshold.
    #[serde(default)]
    pub auto_engaged: bool,
}

impl DrsState {
    pub fn new(manual: bool) -> Self {
        Self {
            manual,
            auto_engaged: false,
        }
    }

    /// Whether the flap is open.
    pub fn engaged(&self) -> bool {
        self.manual || self.auto_engaged
    }

    /// Flip what the driver sees: an engaged DRS is requested off, a closed one on.
    pub fn toggle(&mut self) {
        self.manual = !self.engaged();
    }

    /// Re-derive the automatic half from the current wind speed. Returns true
    /// when the effective state changed.
    pub fn evaluate(&mut self, wind_speed: f64, threshold: f64) -> bool {
        let before = self.engaged();
        self.auto_engaged = wind_speed > threshold;
        before != self.engaged()
    }
}
