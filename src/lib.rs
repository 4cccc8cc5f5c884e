/*!
Wind tunnel model: closed-form aero telemetry plus decorative flow lines.

The two halves are independent. [`aero`] turns [`TunnelParameters`] into
downforce, drag and efficiency; [`flow`] animates streamlines through a
scripted field. [`WindTunnel`] owns both and the clock that drives them.
*/

pub mod aero;
pub mod drs;
pub mod error;
pub mod flow;
pub mod parameters;
pub mod scene;
pub mod settings;
pub mod simulation;

pub use aero::{compute_coefficients, compute_forces, AeroCoefficients, AeroForces, Telemetry};
pub use drs::DrsState;
pub use error::TunnelError;
pub use parameters::TunnelParameters;
pub use scene::{FrameSnapshot, VehiclePose};
pub use settings::{RespawnPolicy, TunnelSettings};
pub use simulation::{SessionPhase, WindTunnel};
