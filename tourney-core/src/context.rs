//! The growing scheduling context handed to every constraint.
//!
//! A single owning container holds the committed-events vector and a map from
//! participant id to vector of event indices; on commit both are appended.
//! Constraints only ever see a shared reference, never a mutable one.

use crate::models::{Event, Participant};
use std::collections::HashMap;

/// Static sizing facts known before generation starts, carried alongside the
/// committed events so constraints (e.g. `SeedProtectionConstraint`) can
/// reason about round ranges without re-deriving them.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSizing {
    pub participant_count: usize,
    pub legs: u32,
    pub rounds_per_leg: u32,
    pub total_rounds: u32,
}

/// Grows during generation, frozen (conceptually) when handed to a
/// constraint: the context exposed for candidate event E contains every event
/// committed strictly before E and no others.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    participants: Vec<Participant>,
    events: Vec<Event>,
    participant_index: HashMap<String, Vec<usize>>,
    sizing: ScheduleSizing,
}

impl SchedulingContext {
    pub fn new(participants: Vec<Participant>, sizing: ScheduleSizing) -> Self {
        Self {
            participants,
            events: Vec::new(),
            participant_index: HashMap::new(),
            sizing,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn sizing(&self) -> ScheduleSizing {
        self.sizing
    }

    pub fn total_rounds(&self) -> u32 {
        self.sizing.total_rounds
    }

    /// Every event, in commit order, that contains the given participant id.
    pub fn events_for(&self, participant_id: &str) -> impl Iterator<Item = &Event> {
        let indices = self
            .participant_index
            .get(participant_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        indices.iter().map(move |&i| &self.events[i])
    }

    /// Append a committed event to the context. Never removes or mutates an
    /// earlier event.
    pub fn commit(&mut self, event: Event) {
        let index = self.events.len();
        for p in event.participants() {
            self.participant_index
                .entry(p.id.clone())
                .or_default()
                .push(index);
        }
        self.events.push(event);
    }
}
