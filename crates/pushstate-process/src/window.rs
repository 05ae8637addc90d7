//! Sliding-window example construction.
//!
//! For a trajectory with state indices `[0, L)` and `N` steps per example,
//! list `k` is the index list rotated left by `k`. Zipping the `N` lists gives
//! one index tuple per start position; the last `N - 1` tuples wrap around
//! the trajectory end and are discarded. Step `k` of every example forms
//! stream `k + 1`, written to its own output file.
//!
//! Example ids come from a running counter owned by the caller: within one
//! call every stream is numbered from the same starting id, and the returned
//! counter continues after the last example.

use pushstate_core::error::DataError;
use pushstate_core::types::{StateVector, StepCount};
use tracing::debug;

// ---------------------------------------------------------------------------
// ExampleSink
// ---------------------------------------------------------------------------

/// One output row: a state tagged with its example id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExampleRow<'a> {
    pub id: u64,
    pub state: &'a StateVector,
}

/// Destination of windowed example streams.
pub trait ExampleSink {
    /// Append the rows of stream `part` (1-based).
    fn append_stream(&mut self, part: usize, rows: &[ExampleRow<'_>]) -> Result<(), DataError>;
}

/// In-memory sink, mainly for inspection and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySink {
    /// `streams[k]` holds the `(id, state)` rows of part `k + 1`.
    pub streams: Vec<Vec<(u64, StateVector)>>,
}

impl ExampleSink for MemorySink {
    fn append_stream(&mut self, part: usize, rows: &[ExampleRow<'_>]) -> Result<(), DataError> {
        if self.streams.len() < part {
            self.streams.resize_with(part, Vec::new);
        }
        self.streams[part - 1].extend(rows.iter().map(|r| (r.id, r.state.clone())));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Index construction
// ---------------------------------------------------------------------------

/// Index tuples of every example of a trajectory of length `len`.
///
/// Yields `len - (N - 1)` tuples, or none when the trajectory is shorter
/// than `N`.
pub fn example_indices(len: usize, steps: StepCount) -> Vec<Vec<usize>> {
    let n = steps.get();
    let base: Vec<usize> = (0..len).collect();
    let rotated: Vec<Vec<usize>> = (0..n)
        .map(|k| {
            let mut list = base.clone();
            if len > 0 {
                list.rotate_left(k % len);
            }
            list
        })
        .collect();

    let mut tuples: Vec<Vec<usize>> = (0..len)
        .map(|i| rotated.iter().map(|list| list[i]).collect())
        .collect();
    tuples.truncate(len.saturating_sub(n - 1));
    tuples
}

// ---------------------------------------------------------------------------
// ExampleWindower
// ---------------------------------------------------------------------------

/// Slices trajectories into `N`-step examples.
#[derive(Debug, Clone, Copy)]
pub struct ExampleWindower {
    steps: StepCount,
}

impl ExampleWindower {
    pub const fn new(steps: StepCount) -> Self {
        Self { steps }
    }

    pub const fn steps(&self) -> StepCount {
        self.steps
    }

    /// Number of examples a trajectory of `len` states yields.
    pub const fn example_count(&self, len: usize) -> u64 {
        len.saturating_sub(self.steps.get() - 1) as u64
    }

    /// Group the examples of `states` by step offset.
    ///
    /// `streams[k][j]` is step `k` of example `j`.
    pub fn streams<'a>(&self, states: &'a [StateVector]) -> Vec<Vec<&'a StateVector>> {
        let tuples = example_indices(states.len(), self.steps);
        (0..self.steps.get())
            .map(|k| tuples.iter().map(|t| &states[t[k]]).collect())
            .collect()
    }

    /// Write the examples of one trajectory and return the next free id.
    ///
    /// A trajectory shorter than `N` writes nothing and returns `next_id`
    /// unchanged.
    pub fn write(
        &self,
        states: &[StateVector],
        next_id: u64,
        sink: &mut impl ExampleSink,
    ) -> Result<u64, DataError> {
        let streams = self.streams(states);
        let count = streams.first().map_or(0, Vec::len);
        if count == 0 {
            debug!(
                states = states.len(),
                steps = self.steps.get(),
                "trajectory too short for one example"
            );
            return Ok(next_id);
        }

        for (k, stream) in streams.iter().enumerate() {
            let rows: Vec<ExampleRow<'_>> = stream
                .iter()
                .zip(next_id..)
                .map(|(&state, id)| ExampleRow { id, state })
                .collect();
            sink.append_stream(k + 1, &rows)?;
        }
        Ok(next_id + count as u64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: usize) -> StepCount {
        StepCount::new(n).unwrap()
    }

    fn states(len: usize) -> Vec<StateVector> {
        (0..len).map(|i| StateVector(vec![i as f64; 12])).collect()
    }

    #[test]
    fn indices_pairs() {
        assert_eq!(
            example_indices(5, steps(2)),
            vec![vec![0, 1], vec![1, 2], vec![2, 3], vec![3, 4]]
        );
    }

    #[test]
    fn indices_quads() {
        assert_eq!(
            example_indices(6, steps(4)),
            vec![vec![0, 1, 2, 3], vec![1, 2, 3, 4], vec![2, 3, 4, 5]]
        );
    }

    #[test]
    fn indices_count_for_all_step_counts() {
        for n in 2..=4 {
            for len in 0..12 {
                let tuples = example_indices(len, steps(n));
                assert_eq!(tuples.len(), len.saturating_sub(n - 1));
                assert_eq!(
                    ExampleWindower::new(steps(n)).example_count(len),
                    tuples.len() as u64
                );
                for t in &tuples {
                    assert_eq!(t.len(), n);
                    // consecutive and never wrapping
                    assert!(t.windows(2).all(|w| w[1] == w[0] + 1));
                }
            }
        }
    }

    #[test]
    fn streams_group_by_offset() {
        let s = states(4);
        let w = ExampleWindower::new(steps(3));
        let streams = w.streams(&s);
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0], vec![&s[0], &s[1]]);
        assert_eq!(streams[2], vec![&s[2], &s[3]]);
    }

    #[test]
    fn write_numbers_each_stream_from_counter() {
        let s = states(5);
        let w = ExampleWindower::new(steps(2));
        let mut sink = MemorySink::default();
        let next = w.write(&s, 10, &mut sink).unwrap();
        assert_eq!(next, 14);
        assert_eq!(sink.streams.len(), 2);
        for stream in &sink.streams {
            let ids: Vec<u64> = stream.iter().map(|(id, _)| *id).collect();
            assert_eq!(ids, vec![10, 11, 12, 13]);
        }
        // stream 2 is stream 1 shifted by one state
        assert_eq!(sink.streams[1][0].1, s[1]);
    }

    #[test]
    fn write_accumulates_across_trajectories() {
        let w = ExampleWindower::new(steps(3));
        let mut sink = MemorySink::default();
        let next = w.write(&states(5), 0, &mut sink).unwrap();
        let next = w.write(&states(4), next, &mut sink).unwrap();
        assert_eq!(next, 5);
        let ids: Vec<u64> = sink.streams[0].iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn short_trajectory_keeps_counter() {
        let w = ExampleWindower::new(steps(4));
        let mut sink = MemorySink::default();
        assert_eq!(w.write(&states(3), 7, &mut sink).unwrap(), 7);
        assert!(sink.streams.is_empty());
    }
}
