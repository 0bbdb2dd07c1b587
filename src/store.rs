//! Per-point internal-state arena.
//!
//! One slot per evaluation point, stored contiguously. During a forward step
//! each slot is written exclusively by its own point's evaluation, so the
//! parallel driver needs no locks: it hands each worker a disjoint
//! `&mut` slot. Snapshots of the whole arena feed trajectory retention and
//! checkpoint/restart.

use rayon::prelude::*;

/// Contiguous arena of per-point history records.
#[derive(Clone, Debug, PartialEq)]
pub struct StateStore<S> {
    slots: Vec<S>,
}

impl<S: Clone> StateStore<S> {
    /// Allocate one slot per point, all initialized to the given baseline.
    pub fn new(points: usize, initial: S) -> Self {
        StateStore {
            slots: vec![initial; points],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, point: usize) -> &S {
        &self.slots[point]
    }

    pub fn get_mut(&mut self, point: usize) -> &mut S {
        &mut self.slots[point]
    }

    pub fn slots(&self) -> &[S] {
        &self.slots
    }

    /// Copy of the full arena, for trajectory retention or checkpointing.
    pub fn snapshot(&self) -> Vec<S> {
        self.slots.clone()
    }

    /// Restore a previously taken snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the snapshot length does not match the arena.
    pub fn restore(&mut self, snapshot: &[S]) {
        assert_eq!(
            snapshot.len(),
            self.slots.len(),
            "snapshot length {} does not match store length {}",
            snapshot.len(),
            self.slots.len()
        );
        self.slots.clone_from_slice(snapshot);
    }

    /// Evaluate every point sequentially. The first error aborts the step.
    pub fn evaluate<K, R, E>(
        &mut self,
        inputs: &[K],
        eval: impl Fn(&mut S, &K) -> Result<R, E>,
    ) -> Result<Vec<R>, E> {
        assert_eq!(
            inputs.len(),
            self.slots.len(),
            "one kinematic input per point required: got {}, have {} points",
            inputs.len(),
            self.slots.len()
        );
        self.slots
            .iter_mut()
            .zip(inputs.iter())
            .map(|(slot, input)| eval(slot, input))
            .collect()
    }

    /// Evaluate every point in parallel.
    ///
    /// Each worker owns exactly one slot for the duration of its evaluation,
    /// matching the one-writer-per-point contract. A failed local solve at
    /// any point fails the whole step.
    pub fn evaluate_par<K, R, E>(
        &mut self,
        inputs: &[K],
        eval: impl Fn(&mut S, &K) -> Result<R, E> + Sync,
    ) -> Result<Vec<R>, E>
    where
        S: Send,
        K: Sync,
        R: Send,
        E: Send,
    {
        assert_eq!(
            inputs.len(),
            self.slots.len(),
            "one kinematic input per point required: got {}, have {} points",
            inputs.len(),
            self.slots.len()
        );
        self.slots
            .par_iter_mut()
            .zip(inputs.par_iter())
            .map(|(slot, input)| eval(slot, input))
            .collect()
    }
}
