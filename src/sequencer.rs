use std::error::Error;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Filling,
    Clearing,
}

#[derive(Clone, Copy, Debug)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub base_interval: Duration,
    pub fast_interval: Duration,
}

impl Default for GridSpec {
    fn default() -> Self {
        GridSpec {
            rows: 10,
            cols: 10,
            base_interval: Duration::from_millis(100),
            fast_interval: Duration::from_millis(25),
        }
    }
}

impl GridSpec {
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// One render event: the cell touched by a tick and its new visual state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    pub filled: bool,
}

/// A tick arrived while the active phase's permutation was already empty.
/// The permutation and the progress counter are always reset together, so
/// this can only mean the sequencing logic itself broke.
#[derive(Debug)]
pub struct SequenceExhausted {
    pub phase: Phase,
    pub count: usize,
}

impl fmt::Display for SequenceExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick with an empty permutation during {:?} at count {}",
            self.phase, self.count
        )
    }
}

impl Error for SequenceExhausted {}

/// Timer-driven fill/clear state machine over a shuffled grid.
///
/// Each tick consumes one coordinate from the current phase's permutation
/// and reports the cell to repaint. The tick that completes a phase also
/// flips the phase, swaps the cadence, and reshuffles for the next phase.
pub struct Sequencer {
    spec: GridSpec,
    phase: Phase,
    count: usize,
    pending: Vec<usize>,
    interval: Duration,
    rng: StdRng,
}

impl Sequencer {
    pub fn new(spec: GridSpec) -> Self {
        Self::with_seed(spec, rand::rng().random())
    }

    pub fn with_seed(spec: GridSpec, seed: u64) -> Self {
        let mut seq = Sequencer {
            spec,
            phase: Phase::Filling,
            count: 0,
            pending: Vec::new(),
            interval: spec.base_interval,
            rng: StdRng::seed_from_u64(seed),
        };
        seq.reshuffle();
        seq
    }

    fn reshuffle(&mut self) {
        self.pending = (0..self.spec.cell_count()).collect();
        self.pending.shuffle(&mut self.rng);
    }

    pub fn tick(&mut self) -> Result<CellChange, SequenceExhausted> {
        let Some(index) = self.pending.pop() else {
            return Err(SequenceExhausted {
                phase: self.phase,
                count: self.count,
            });
        };

        let change = CellChange {
            row: index / self.spec.cols,
            col: index % self.spec.cols,
            filled: self.phase == Phase::Filling,
        };

        // The boundary check runs after the cell action, so the last cell of
        // a phase is updated on the same tick that flips the phase.
        match self.phase {
            Phase::Filling => {
                self.count += 1;
                if self.count == self.spec.cell_count() {
                    self.phase = Phase::Clearing;
                    self.interval = self.spec.fast_interval;
                    self.reshuffle();
                }
            }
            Phase::Clearing => {
                self.count -= 1;
                if self.count == 0 {
                    self.phase = Phase::Filling;
                    self.interval = self.spec.base_interval;
                    self.reshuffle();
                }
            }
        }

        Ok(change)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn spec(&self) -> GridSpec {
        self.spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn spec_2x2() -> GridSpec {
        GridSpec {
            rows: 2,
            cols: 2,
            base_interval: Duration::from_millis(100),
            fast_interval: Duration::from_millis(25),
        }
    }

    fn drain_phase(seq: &mut Sequencer) -> Vec<CellChange> {
        let total = seq.spec().cell_count();
        (0..total).map(|_| seq.tick().unwrap()).collect()
    }

    #[test]
    fn filling_phase_covers_every_cell_once() {
        let mut seq = Sequencer::with_seed(GridSpec::default(), 7);
        let changes = drain_phase(&mut seq);

        assert!(changes.iter().all(|c| c.filled));
        let coords: HashSet<(usize, usize)> =
            changes.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(coords.len(), 100);
        assert!(coords.iter().all(|&(r, c)| r < 10 && c < 10));
    }

    #[test]
    fn counter_is_strictly_monotonic_within_a_phase() {
        let mut seq = Sequencer::with_seed(GridSpec::default(), 11);
        let total = seq.spec().cell_count();

        for expected in 1..=total {
            seq.tick().unwrap();
            if expected < total {
                assert_eq!(seq.count(), expected);
            }
        }
        // Boundary tick completed the fill and entered Clearing at full count.
        assert_eq!(seq.count(), total);
        for expected in (0..total).rev() {
            seq.tick().unwrap();
            if expected > 0 {
                assert_eq!(seq.count(), expected);
            }
        }
        assert_eq!(seq.count(), 0);
    }

    #[test]
    fn full_cycle_fills_and_clears_each_cell_exactly_once() {
        let mut seq = Sequencer::with_seed(GridSpec::default(), 3);
        let total = seq.spec().cell_count();

        let mut fills = Vec::new();
        let mut clears = Vec::new();
        for _ in 0..total * 2 {
            let change = seq.tick().unwrap();
            if change.filled {
                fills.push((change.row, change.col));
            } else {
                clears.push((change.row, change.col));
            }
        }

        assert_eq!(fills.len(), total);
        assert_eq!(clears.len(), total);
        assert_eq!(fills.iter().copied().collect::<HashSet<_>>().len(), total);
        assert_eq!(clears.iter().copied().collect::<HashSet<_>>().len(), total);
    }

    #[test]
    fn boundary_tick_flips_phase_interval_and_permutation_together() {
        let mut seq = Sequencer::with_seed(GridSpec::default(), 42);
        let spec = seq.spec();
        let total = spec.cell_count();

        for _ in 0..total - 1 {
            seq.tick().unwrap();
            assert_eq!(seq.phase(), Phase::Filling);
            assert_eq!(seq.interval(), spec.base_interval);
        }

        let last_fill = seq.tick().unwrap();
        assert!(last_fill.filled);
        assert_eq!(seq.phase(), Phase::Clearing);
        assert_eq!(seq.interval(), spec.fast_interval);
        assert_eq!(seq.pending.len(), total);

        for _ in 0..total - 1 {
            seq.tick().unwrap();
            assert_eq!(seq.phase(), Phase::Clearing);
        }
        let last_clear = seq.tick().unwrap();
        assert!(!last_clear.filled);
        assert_eq!(seq.phase(), Phase::Filling);
        assert_eq!(seq.interval(), spec.base_interval);
        assert_eq!(seq.pending.len(), total);
    }

    #[test]
    fn identical_seeds_emit_identical_sequences() {
        let mut a = Sequencer::with_seed(GridSpec::default(), 99);
        let mut b = Sequencer::with_seed(GridSpec::default(), 99);

        for _ in 0..a.spec().cell_count() * 6 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
            assert_eq!(a.interval(), b.interval());
        }
    }

    #[test]
    fn two_by_two_boundary_scenario() {
        let spec = spec_2x2();
        let mut seq = Sequencer::with_seed(spec, 5);

        for expected in 1..=3 {
            let change = seq.tick().unwrap();
            assert!(change.filled);
            assert_eq!(seq.count(), expected);
            assert_eq!(seq.phase(), Phase::Filling);
            assert_eq!(seq.interval(), spec.base_interval);
        }

        let fourth = seq.tick().unwrap();
        assert!(fourth.filled);
        assert_eq!(seq.count(), 4);
        assert_eq!(seq.phase(), Phase::Clearing);
        assert_eq!(seq.interval(), spec.fast_interval);
        assert_eq!(seq.pending.len(), 4);
    }

    #[test]
    fn exhausted_permutation_is_an_error() {
        let mut seq = Sequencer::with_seed(spec_2x2(), 1);
        seq.pending.clear();

        let err = seq.tick().unwrap_err();
        assert_eq!(err.phase, Phase::Filling);
        assert_eq!(err.count, 0);
        assert!(err.to_string().contains("empty permutation"));
    }
}
