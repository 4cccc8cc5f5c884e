//! The wind tunnel session: parameters, telemetry, flow lines and the clock
//! that drives them.
//!
//! Flow lines advance on a fixed tick independent of the frame rate. The
//! caller feeds real elapsed time into [`WindTunnel::advance`], which runs as
//! many whole ticks as fit (bounded by `max_catch_up_ticks`). Pausing or
//! shutting down stops every line at once since there is only one loop.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::aero::Telemetry;
use crate::error::Result;
use crate::flow::{FlowField, TickReport};
use crate::parameters::TunnelParameters;
use crate::scene::{spin_fan, FrameSnapshot, VehiclePose};
use crate::settings::{RespawnPolicy, TunnelSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nothing launched yet
    Idle,
    /// Launched, waiting out the auto-start delay
    Launching { remaining: Duration },
    Running,
    Paused,
}

pub struct WindTunnel {
    settings: TunnelSettings,
    params: TunnelParameters,
    phase: SessionPhase,
    telemetry: Telemetry,
    field: FlowField,
    fan_rotation: f64,
    accumulator: Duration,
    ticks: u64,
    rng: StdRng,
}

impl WindTunnel {
    /// Build an idle session. Fails if `settings` do not validate.
    pub fn new(settings: TunnelSettings) -> Result<Self> {
        settings.validate()?;

        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut params = settings.parameters.clamped();
        params.drs.evaluate(params.wind_speed, settings.drs_threshold_kmh);

        Ok(Self {
            telemetry: Telemetry::evaluate(&params),
            settings,
            params,
            phase: SessionPhase::Idle,
            field: FlowField::new(),
            fan_rotation: 0.0,
            accumulator: Duration::ZERO,
            ticks: 0,
            rng,
        })
    }

    pub fn settings(&self) -> &TunnelSettings {
        &self.settings
    }

    pub fn parameters(&self) -> &TunnelParameters {
        &self.params
    }

    pub fn telemetry(&self) -> Telemetry {
        self.telemetry
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    pub fn fan_rotation(&self) -> f64 {
        self.fan_rotation
    }

    /// Fixed ticks run since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pose(&self) -> VehiclePose {
        VehiclePose::from_parameters(&self.params)
    }

    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            lines: self.field.lines(),
            fan_rotation: self.fan_rotation,
            pose: self.pose(),
            generation: self.field.generation(),
        }
    }

    /// Apply new parameters from the control surface.
    ///
    /// Values are clamped into their domains and DRS auto-engagement is
    /// re-evaluated. While running, the flow lines are respawned according to
    /// the respawn policy; telemetry is refreshed unless the session is
    /// launching or paused.
    pub fn set_parameters(&mut self, params: TunnelParameters) {
        let mut params = params.clamped();
        if params.drs.evaluate(params.wind_speed, self.settings.drs_threshold_kmh) {
            debug!(engaged = params.drs.engaged(), wind_speed = params.wind_speed, "DRS changed");
        }

        let previous = std::mem::replace(&mut self.params, params);

        if self.is_running() {
            let respawn = match self.settings.respawn_policy {
                RespawnPolicy::WindSpeed => previous.wind_speed != self.params.wind_speed,
                RespawnPolicy::AnyParameter => previous.flow_inputs_differ(&self.params),
            };
            if respawn {
                self.respawn();
            }
        }

        self.refresh_telemetry();
    }

    pub fn toggle_drs(&mut self) {
        let mut params = self.params;
        params.drs.toggle();
        self.set_parameters(params);
    }

    /// Leave the landing state; the simulation starts by itself after the
    /// configured delay.
    pub fn launch(&mut self) {
        if self.phase != SessionPhase::Idle {
            return;
        }
        let remaining = self.settings.auto_start_delay();
        info!(delay_ms = remaining.as_millis() as u64, "launching wind tunnel");
        self.phase = SessionPhase::Launching { remaining };
    }

    /// Start (or restart) the simulation with a fresh set of flow lines.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.phase = SessionPhase::Running;
        self.accumulator = Duration::ZERO;
        self.respawn();
        self.refresh_telemetry();
        info!(wind_speed = self.params.wind_speed, "simulation running");
    }

    /// Stop ticking. Lines stay where they are for display.
    pub fn pause(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = SessionPhase::Paused;
        self.accumulator = Duration::ZERO;
        info!(ticks = self.ticks, "simulation paused");
    }

    pub fn toggle_running(&mut self) {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Stop ticking and drop every flow line.
    pub fn shutdown(&mut self) {
        self.pause();
        self.field.clear();
        self.accumulator = Duration::ZERO;
    }

    /// Feed real elapsed time. Returns the number of fixed ticks run.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if let SessionPhase::Launching { remaining } = self.phase {
            match remaining.checked_sub(dt) {
                Some(left) if !left.is_zero() => {
                    self.phase = SessionPhase::Launching { remaining: left };
                    return 0;
                }
                _ => self.start(),
            }
            // Time spent waiting does not count towards the first tick
            return 0;
        }

        if !self.is_running() {
            return 0;
        }

        self.fan_rotation = spin_fan(self.fan_rotation, dt.as_secs_f64(), self.params.wind_speed);

        let interval = self.settings.tick_interval();
        self.accumulator += dt;

        let mut ran = 0;
        while self.accumulator >= interval {
            if ran == self.settings.max_catch_up_ticks {
                debug!(
                    dropped_ms = self.accumulator.as_millis() as u64,
                    "frame too long, dropping time"
                );
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= interval;
            self.step();
            ran += 1;
        }
        ran
    }

    /// Run exactly one tick if the simulation is running.
    pub fn step(&mut self) -> TickReport {
        if !self.is_running() {
            return TickReport::default();
        }
        self.ticks += 1;
        self.field.tick(&self.params, &mut self.rng)
    }

    fn respawn(&mut self) {
        self.field.respawn(
            self.settings.line_count,
            self.settings.points_per_line,
            self.params.wind_speed,
            &mut self.rng,
        );
    }

    fn refresh_telemetry(&mut self) {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Running => {
                self.telemetry = Telemetry::evaluate(&self.params);
            }
            SessionPhase::Launching { .. } | SessionPhase::Paused => {}
        }
    }
}

impl Drop for WindTunnel {
    fn drop(&mut self) {
        if !self.field.is_empty() {
            self.shutdown();
        }
    }
}
