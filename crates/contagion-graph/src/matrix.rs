//! Temporal adjacency matrix: one ordered timestamp set per entity pair.
//!
//! The matrix is logically square and symmetric. Each unordered pair is
//! stored exactly once in a lower-triangular layout (row = larger id,
//! column = smaller id), so `cell(i, j)` and `cell(j, i)` are the same set
//! rather than two mirrored copies.
//!
//! Growth is linear: when an id falls outside the current dimension, whole
//! rows are appended in steps of the configured increment. Existing rows are
//! never touched by growth and the matrix never shrinks.

use std::collections::BTreeSet;

use contagion_types::{EntityId, Timestamp};
use tracing::debug;

use crate::error::TracerError;

/// Ordered, duplicate-free contact times for a single pair.
pub type TimeCell = BTreeSet<Timestamp>;

/// Resizable symmetric matrix of contact time sets.
#[derive(Debug, Clone)]
pub struct TemporalMatrix {
    /// Row `k` holds the cells `(k, 0) ..= (k, k)`.
    rows: Vec<Vec<TimeCell>>,
    /// Number of rows added per growth step.
    increment: usize,
    /// Total distinct `(pair, timestamp)` events stored.
    events: usize,
}

impl TemporalMatrix {
    /// Create a matrix of dimension `initial`, which is also the growth step.
    ///
    /// A zero `initial` is clamped to one so growth always makes progress.
    pub fn with_capacity(initial: usize) -> Self {
        let increment = initial.max(1);
        let mut matrix = Self {
            rows: Vec::with_capacity(increment),
            increment,
            events: 0,
        };
        matrix.append_rows(increment);
        matrix
    }

    /// Current logical dimension (rows == columns).
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Number of distinct events recorded across all pairs.
    pub const fn event_count(&self) -> usize {
        self.events
    }

    /// Grow until the matrix can index `required` entities.
    ///
    /// # Errors
    ///
    /// Returns [`TracerError::ArithmeticOverflow`] if the next dimension does
    /// not fit in `usize`.
    pub fn ensure_capacity(&mut self, required: usize) -> Result<(), TracerError> {
        while required > self.dimension() {
            let from = self.dimension();
            let to = from
                .checked_add(self.increment)
                .ok_or(TracerError::ArithmeticOverflow)?;
            self.append_rows(to);
            debug!(from, to, required, "contact matrix grown");
        }
        Ok(())
    }

    /// Insert `time` into the cell for `(a, b)`.
    ///
    /// Returns `false` if the timestamp was already present for the pair.
    ///
    /// # Errors
    ///
    /// Returns [`TracerError::CapacityExceeded`] if either id lies outside
    /// the current dimension. Callers must run [`Self::ensure_capacity`]
    /// first.
    pub fn record_event(
        &mut self,
        a: EntityId,
        b: EntityId,
        time: Timestamp,
    ) -> Result<bool, TracerError> {
        let dimension = self.dimension();
        let (hi, lo) = ordered(a, b);
        let cell = self
            .rows
            .get_mut(hi.index())
            .and_then(|row| row.get_mut(lo.index()))
            .ok_or(TracerError::CapacityExceeded { id: hi, dimension })?;
        let inserted = cell.insert(time);
        if inserted {
            self.events = self.events.saturating_add(1);
        }
        Ok(inserted)
    }

    /// All recorded times for the pair in ascending order.
    pub fn times_between(&self, a: EntityId, b: EntityId) -> Vec<Timestamp> {
        self.cell(a, b)
            .map(|cell| cell.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether the pair has at least one recorded contact.
    pub fn has_any_contact(&self, a: EntityId, b: EntityId) -> bool {
        self.cell(a, b).is_some_and(|cell| !cell.is_empty())
    }

    /// The earliest recorded time for the pair that is `>= threshold`.
    pub fn first_time_at_or_after(
        &self,
        a: EntityId,
        b: EntityId,
        threshold: Timestamp,
    ) -> Option<Timestamp> {
        self.cell(a, b)?.range(threshold..).next().copied()
    }

    fn cell(&self, a: EntityId, b: EntityId) -> Option<&TimeCell> {
        let (hi, lo) = ordered(a, b);
        self.rows.get(hi.index())?.get(lo.index())
    }

    /// Append empty rows until the dimension equals `to`.
    fn append_rows(&mut self, to: usize) {
        for k in self.rows.len()..to {
            self.rows.push((0..=k).map(|_| TimeCell::new()).collect());
        }
    }
}

/// Order a pair as `(larger, smaller)` for lower-triangular addressing.
fn ordered(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
    if a >= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> EntityId {
        EntityId::new(n)
    }

    #[test]
    fn starts_at_initial_dimension() {
        let matrix = TemporalMatrix::with_capacity(4);
        assert_eq!(matrix.dimension(), 4);
        assert_eq!(matrix.event_count(), 0);
    }

    #[test]
    fn record_is_symmetric_and_idempotent() {
        let mut matrix = TemporalMatrix::with_capacity(4);
        assert_eq!(matrix.record_event(id(0), id(2), 10), Ok(true));
        assert_eq!(matrix.record_event(id(2), id(0), 10), Ok(false));
        assert_eq!(matrix.record_event(id(2), id(0), 3), Ok(true));

        assert_eq!(matrix.times_between(id(0), id(2)), vec![3, 10]);
        assert_eq!(matrix.times_between(id(2), id(0)), vec![3, 10]);
        assert_eq!(matrix.event_count(), 2);
    }

    #[test]
    fn reads_do_not_consume() {
        let mut matrix = TemporalMatrix::with_capacity(2);
        assert!(matrix.record_event(id(0), id(1), 5).is_ok());
        assert_eq!(matrix.times_between(id(0), id(1)), vec![5]);
        assert_eq!(matrix.times_between(id(0), id(1)), vec![5]);
        assert!(matrix.has_any_contact(id(1), id(0)));
    }

    #[test]
    fn empty_and_out_of_range_cells() {
        let matrix = TemporalMatrix::with_capacity(2);
        assert!(matrix.times_between(id(0), id(1)).is_empty());
        assert!(!matrix.has_any_contact(id(0), id(1)));
        assert!(matrix.times_between(id(0), id(9)).is_empty());
        assert!(!matrix.has_any_contact(id(9), id(0)));
    }

    #[test]
    fn record_outside_dimension_is_rejected() {
        let mut matrix = TemporalMatrix::with_capacity(2);
        let result = matrix.record_event(id(0), id(2), 1);
        assert_eq!(
            result,
            Err(TracerError::CapacityExceeded {
                id: id(2),
                dimension: 2
            })
        );
        assert_eq!(matrix.event_count(), 0);
    }

    #[test]
    fn growth_is_linear_and_preserves_cells() {
        let mut matrix = TemporalMatrix::with_capacity(3);
        assert!(matrix.record_event(id(1), id(2), 7).is_ok());

        assert!(matrix.ensure_capacity(3).is_ok());
        assert_eq!(matrix.dimension(), 3);

        assert!(matrix.ensure_capacity(4).is_ok());
        assert_eq!(matrix.dimension(), 6);

        // More than one increment short: grow repeatedly.
        assert!(matrix.ensure_capacity(11).is_ok());
        assert_eq!(matrix.dimension(), 12);

        assert_eq!(matrix.times_between(id(2), id(1)), vec![7]);
        assert!(matrix.record_event(id(11), id(0), 1).is_ok());
        assert_eq!(matrix.times_between(id(0), id(11)), vec![1]);
    }

    #[test]
    fn first_time_at_or_after_is_inclusive() {
        let mut matrix = TemporalMatrix::with_capacity(2);
        for t in [5, 10, 20] {
            assert!(matrix.record_event(id(0), id(1), t).is_ok());
        }
        assert_eq!(matrix.first_time_at_or_after(id(0), id(1), 10), Some(10));
        assert_eq!(matrix.first_time_at_or_after(id(1), id(0), 11), Some(20));
        assert_eq!(matrix.first_time_at_or_after(id(0), id(1), 21), None);
        assert_eq!(matrix.first_time_at_or_after(id(0), id(1), i64::MIN), Some(5));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut matrix = TemporalMatrix::with_capacity(0);
        assert_eq!(matrix.dimension(), 1);
        assert!(matrix.ensure_capacity(3).is_ok());
        assert_eq!(matrix.dimension(), 3);
    }
}
