//! The contact trace engine: name-level queries and propagation simulation.
//!
//! [`ContactTracer`] owns the [`EntityRegistry`], the [`TemporalMatrix`] and
//! an arena of per-entity traversal state. All public operations take entity
//! names; unknown names yield empty results rather than errors.
//!
//! # Propagation
//!
//! [`ContactTracer::contact_trace`] runs a depth-first, time-respecting
//! reachability search. An entity with contagion threshold `c` can pass the
//! infection along a pair whose earliest recorded time `t >= c`. The
//! receiving entity's own threshold becomes `t + incubation_offset`, fixed
//! the first time it is examined as a qualifying contact and never lowered
//! afterwards, even if a later path would reach it sooner.

use std::collections::BTreeSet;

use contagion_types::{EntityId, Timestamp, Trace};
use tracing::{debug, trace};

use crate::config::{ConfigError, TracerConfig};
use crate::error::TracerError;
use crate::matrix::TemporalMatrix;
use crate::registry::EntityRegistry;

/// Transient per-entity state for a single propagation query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TraversalState {
    visited: bool,
    contagion_time: Option<Timestamp>,
}

/// Records timestamped contacts between named entities and answers
/// contact and propagation queries.
#[derive(Debug, Clone)]
pub struct ContactTracer {
    config: TracerConfig,
    registry: EntityRegistry,
    matrix: TemporalMatrix,
    /// Indexed by [`EntityId`]; reset at the start of every trace.
    traversal: Vec<TraversalState>,
}

impl ContactTracer {
    /// Create an empty tracer with the default policy.
    pub fn new() -> Self {
        Self::build(TracerConfig::default())
    }

    /// Create an empty tracer with a custom policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config fails validation.
    pub fn with_config(config: TracerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a tracer with the default policy, populated from `traces`.
    ///
    /// # Errors
    ///
    /// Returns the first [`TracerError`] raised by [`Self::add_trace`].
    pub fn from_traces<'a, I>(traces: I) -> Result<Self, TracerError>
    where
        I: IntoIterator<Item = &'a Trace>,
    {
        let mut tracer = Self::new();
        tracer.add_traces(traces)?;
        Ok(tracer)
    }

    fn build(config: TracerConfig) -> Self {
        Self {
            config,
            registry: EntityRegistry::new(),
            matrix: TemporalMatrix::with_capacity(config.initial_capacity),
            traversal: Vec::new(),
        }
    }

    /// The policy this tracer was built with.
    pub const fn config(&self) -> &TracerConfig {
        &self.config
    }

    /// Number of distinct entities seen so far.
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of distinct `(pair, time)` contacts recorded.
    pub const fn event_count(&self) -> usize {
        self.matrix.event_count()
    }

    /// Current dimension of the contact matrix.
    pub fn matrix_dimension(&self) -> usize {
        self.matrix.dimension()
    }

    // -------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------

    /// Record a contact trace. Recording the same pair and time twice is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// See [`Self::add_contact`].
    pub fn add_trace(&mut self, trace: &Trace) -> Result<(), TracerError> {
        self.add_contact(&trace.person1, &trace.person2, trace.time)
    }

    /// Record every trace in order, stopping at the first error.
    ///
    /// Returns the number of traces that added a new contact time.
    ///
    /// # Errors
    ///
    /// See [`Self::add_contact`].
    pub fn add_traces<'a, I>(&mut self, traces: I) -> Result<usize, TracerError>
    where
        I: IntoIterator<Item = &'a Trace>,
    {
        let before = self.event_count();
        for item in traces {
            self.add_trace(item)?;
        }
        Ok(self.event_count().saturating_sub(before))
    }

    /// Record that `person1` and `person2` were in contact at `time`.
    ///
    /// Unknown names are registered. Nothing is modified when an error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`TracerError::EmptyName`] if either name is empty,
    /// [`TracerError::SelfContact`] if both names are equal, or
    /// [`TracerError::ArithmeticOverflow`] if the matrix cannot grow.
    pub fn add_contact(
        &mut self,
        person1: &str,
        person2: &str,
        time: Timestamp,
    ) -> Result<(), TracerError> {
        if person1.is_empty() || person2.is_empty() {
            return Err(TracerError::EmptyName);
        }
        if person1 == person2 {
            return Err(TracerError::SelfContact {
                name: person1.to_owned(),
            });
        }

        let unseen = usize::from(self.registry.lookup(person1).is_none())
            .checked_add(usize::from(self.registry.lookup(person2).is_none()))
            .ok_or(TracerError::ArithmeticOverflow)?;
        let required = self
            .registry
            .len()
            .checked_add(unseen)
            .ok_or(TracerError::ArithmeticOverflow)?;
        self.matrix.ensure_capacity(required)?;

        let a = self.registry.resolve(person1);
        let b = self.registry.resolve(person2);
        let inserted = self.matrix.record_event(a, b, time)?;
        trace!(person1, person2, time, inserted, "contact recorded");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------

    /// Times at which the two named entities were in direct contact, in
    /// ascending order. Empty if either name is unknown.
    pub fn get_contact_times(&self, person1: &str, person2: &str) -> Vec<Timestamp> {
        match (self.registry.lookup(person1), self.registry.lookup(person2)) {
            (Some(a), Some(b)) => self.matrix.times_between(a, b),
            _ => Vec::new(),
        }
    }

    /// Everyone the named entity has ever been in direct contact with.
    pub fn get_contacts(&self, person: &str) -> BTreeSet<String> {
        let Some(origin) = self.registry.lookup(person) else {
            return BTreeSet::new();
        };
        self.registry
            .iter()
            .filter(|e| e.id != origin && self.matrix.has_any_contact(origin, e.id))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Everyone the named entity was in direct contact with at or after
    /// `timestamp` (inclusive).
    pub fn get_contacts_after(&self, person: &str, timestamp: Timestamp) -> BTreeSet<String> {
        let Some(origin) = self.registry.lookup(person) else {
            return BTreeSet::new();
        };
        self.registry
            .iter()
            .filter(|e| {
                e.id != origin
                    && self
                        .matrix
                        .first_time_at_or_after(origin, e.id, timestamp)
                        .is_some()
            })
            .map(|e| e.name.clone())
            .collect()
    }

    /// Everyone who may have contracted the disease from `person`, who
    /// became contagious at `time_of_contagion`. Never includes `person`.
    pub fn contact_trace(
        &mut self,
        person: &str,
        time_of_contagion: Timestamp,
    ) -> BTreeSet<String> {
        self.reset_traversal();

        let mut infected = BTreeSet::new();
        let Some(origin) = self.registry.lookup(person) else {
            return infected;
        };
        if let Some(state) = self.traversal.get_mut(origin.index()) {
            state.visited = true;
            state.contagion_time = Some(time_of_contagion);
        }

        let mut stack = vec![origin];
        while let Some(&current) = stack.last() {
            if let Some(next) = self.next_unvisited_contact(current) {
                if let Some(state) = self.traversal.get_mut(next.index()) {
                    state.visited = true;
                }
                if let Some(name) = self.registry.name(next) {
                    infected.insert(name.to_owned());
                }
                stack.push(next);
            } else {
                stack.pop();
            }
        }

        debug!(
            origin = person,
            time_of_contagion,
            infected = infected.len(),
            "contact trace complete"
        );
        infected
    }

    /// Clear traversal state for every registered entity, reusing the arena.
    fn reset_traversal(&mut self) {
        self.traversal.clear();
        self.traversal
            .resize(self.registry.len(), TraversalState::default());
    }

    /// Scan `current`'s qualifying contacts in id order and return the
    /// first unvisited one.
    ///
    /// Every qualifying contact without a threshold gets one during the
    /// scan, whether or not it is returned.
    fn next_unvisited_contact(&mut self, current: EntityId) -> Option<EntityId> {
        let threshold = self.traversal.get(current.index())?.contagion_time?;
        let offset = self.config.incubation_offset;

        let mut next = None;
        for (index, state) in self.traversal.iter_mut().enumerate() {
            let candidate = EntityId::new(index);
            if candidate == current {
                continue;
            }
            let Some(time) = self
                .matrix
                .first_time_at_or_after(current, candidate, threshold)
            else {
                continue;
            };
            if state.contagion_time.is_none() {
                state.contagion_time = Some(time.saturating_add(offset));
            }
            if next.is_none() && !state.visited {
                next = Some(candidate);
            }
        }
        next
    }
}

impl Default for ContactTracer {
    fn default() -> Self {
        Self::new()
    }
}
