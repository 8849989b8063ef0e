//! Core data model: participants, rounds, events, and the growing schedule.
//!
//! Every type here is immutable once constructed; nothing in this module ever
//! mutates a value handed to a constraint or a caller. See
//! [`crate::context::SchedulingContext`] for the one type that is deliberately
//! mutable during generation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single value in a metadata bucket attached to a participant, event, or
/// schedule.
///
/// Constraints look up keys by name and treat a missing key as "falsy" rather
/// than erroring, so there is no `Option` wrapper here - absence is modelled
/// by the key simply not being present in the map.
///
/// ```
/// use tourney_core::models::MetadataValue;
///
/// let v = MetadataValue::Integer(4);
/// assert_eq!(v.as_integer(), Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Nested(HashMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(f) => Some(*f),
            MetadataValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// A mapping from string key to [`MetadataValue`]; insertion order is
/// irrelevant per the data model's invariants.
pub type Metadata = HashMap<String, MetadataValue>;

/// An opaque entity identified by a string id that plays in events.
///
/// Two participants are equal iff their ids are equal - label, seed, and
/// metadata are not part of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub label: String,
    pub seed: Option<u32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Participant {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            seed: None,
            metadata: Metadata::new(),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn metadata_get(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Participant {}

impl std::hash::Hash for Participant {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A numbered group of events; participants appear in at most one event per
/// round. Round numbers are 1-based and monotonic across legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            metadata: Metadata::new(),
        }
    }
}

/// An ordered tuple of participants constituting one match; position in the
/// list encodes role (index 0 is "home"/first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    participants: Vec<Participant>,
    round: Option<Round>,
    #[serde(default)]
    metadata: Metadata,
}

/// Raised when [`Event::new`] is given fewer than two participants, or
/// participants with a repeated id.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventError {
    #[error("an event requires at least two participants, got {0}")]
    TooFewParticipants(usize),
    #[error("participant '{0}' appears more than once in the same event")]
    DuplicateParticipant(String),
}

impl Event {
    pub fn new(participants: Vec<Participant>, round: Option<Round>) -> Result<Self, EventError> {
        Self::with_metadata(participants, round, Metadata::new())
    }

    pub fn with_metadata(
        participants: Vec<Participant>,
        round: Option<Round>,
        metadata: Metadata,
    ) -> Result<Self, EventError> {
        if participants.len() < 2 {
            return Err(EventError::TooFewParticipants(participants.len()));
        }
        let mut seen = std::collections::HashSet::with_capacity(participants.len());
        for p in &participants {
            if !seen.insert(p.id.as_str()) {
                return Err(EventError::DuplicateParticipant(p.id.clone()));
            }
        }
        Ok(Self {
            participants,
            round,
            metadata,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_number(&self) -> Option<u32> {
        self.round.as_ref().map(|r| r.number)
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The participant occupying position 0 ("home" in the binary case).
    pub fn first(&self) -> &Participant {
        &self.participants[0]
    }

    /// The participant occupying position 1 ("away" in the binary case).
    pub fn second(&self) -> &Participant {
        &self.participants[1]
    }

    /// The position (role slot) a participant occupies in this event, if any.
    pub fn role_of(&self, participant_id: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.id == participant_id)
    }

    /// Unordered identity of this event's participants, used by pairing
    /// uniqueness checks (e.g. `NoRepeatPairings`).
    pub fn unordered_key(&self) -> std::collections::BTreeSet<String> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }
}

/// The ordered sequence of all events produced for a tournament, plus
/// schedule-level metadata (`algorithm`, `participant_count`, `legs`,
/// `rounds_per_leg`, `total_rounds`, `events_per_round`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    events: Vec<Event>,
    metadata: Metadata,
}

impl Schedule {
    pub fn new(events: Vec<Event>, metadata: Metadata) -> Self {
        Self { events, metadata }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_in_round(&self, round: u32) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |e| e.round_number() == Some(round))
    }

    pub fn max_round(&self) -> Option<u32> {
        self.events.iter().filter_map(|e| e.round_number()).max()
    }

    pub fn metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    pub fn metadata_or<'a>(&'a self, key: &str, default: &'a MetadataValue) -> &'a MetadataValue {
        self.metadata.get(key).unwrap_or(default)
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// The events of a single round, produced by `generate_round` (§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundSchedule {
    pub round_number: u32,
    pub events: Vec<Event>,
}
