//! A constraint-driven round-robin tournament scheduling engine.
//!
//! Given a list of participants, it produces a `Schedule`: every pairing
//! exactly once per leg (or a deliberately repeated/mirrored/shuffled
//! pairing for legs beyond the first), filtered through a composable
//! pipeline of constraints, with a typed diagnostic report whenever the
//! request cannot be satisfied.
//!
//! Entry point: [`scheduler::RoundRobinScheduler`] via [`scheduler::ScheduleRequest`].

pub mod constraint;
pub mod context;
pub mod counts;
pub mod diagnostics;
pub mod generator;
pub mod leg;
pub mod models;
pub mod orderer;
pub mod positional;
pub mod random;
pub mod scheduler;
pub mod validation;
pub mod violation;

pub use constraint::{Constraint, ConstraintOutcome, ConstraintSet, ConstraintSetBuilder};
pub use diagnostics::{ImpossibleConstraintsError, IncompleteScheduleError, InvalidConfigurationError, SchedulerError};
pub use generator::GenerationProgress;
pub use models::{Event, EventError, Metadata, MetadataValue, Participant, Round, RoundSchedule, Schedule};
pub use scheduler::{RoundRobinScheduler, ScheduleRequest, Scheduler};
pub use violation::{ConstraintViolation, ConstraintViolationCollector};
