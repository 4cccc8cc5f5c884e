use rand::Rng;
use tracing::{debug, trace};

use super::class::spawn_seeds;
use super::line::{FlowLine, TickOutcome};
use crate::parameters::TunnelParameters;

/// All live flow lines, advanced together in one pass per tick.
///
/// Replacing or clearing the set bumps `generation`; nothing survives from
/// one generation into the next.
#[derive(Debug, Default)]
pub struct FlowField {
    lines: Vec<FlowLine>,
    generation: u64,
    writes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub advanced: usize,
    pub reseeded: usize,
}

impl FlowField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Throw away the current lines and seed a fresh set.
    pub fn respawn<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        points_per_line: usize,
        wind_speed: f64,
        rng: &mut R,
    ) {
        self.lines = spawn_seeds(count, wind_speed, rng)
            .into_iter()
            .map(|seed| FlowLine::new(seed, points_per_line))
            .collect();
        self.generation += 1;
        debug!(
            generation = self.generation,
            count, wind_speed, "spawned flow lines"
        );
    }

    /// Drop every line. Nothing is ticked until the next respawn.
    pub fn clear(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        self.lines.clear();
        self.generation += 1;
        debug!(generation = self.generation, "cleared flow lines");
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, params: &TunnelParameters, rng: &mut R) -> TickReport {
        let mut report = TickReport::default();

        for (i, line) in self.lines.iter_mut().enumerate() {
            match line.tick(params, rng) {
                TickOutcome::Advanced => report.advanced += 1,
                TickOutcome::Reseeded => {
                    trace!(line = i, "flow line reseeded");
                    report.reseeded += 1;
                }
            }
        }

        self.writes += self.lines.len() as u64;
        report
    }

    pub fn lines(&self) -> &[FlowLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Line buffer updates performed so far, across all generations.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}
