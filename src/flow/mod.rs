//! Decorative streamlines. The velocity field here is hand-authored and has
//! no coupling to the aero model.

pub mod class;
pub mod field;
pub mod line;

pub use class::{spawn_seeds, FlowClass, FlowSeed, ALL_FLOW_CLASSES};
pub use field::{FlowField, TickReport};
pub use line::{FlowLine, TickOutcome, DEFAULT_POINTS_PER_LINE, POINT_SPACING, RESET_DEPTH};
