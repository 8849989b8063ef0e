//! The CLI's serde-facing request document. The core library's
//! `ScheduleRequest` is a plain builder-constructed struct with no wire
//! format (§6); this module is where JSON/YAML gets turned into one.

use anyhow::Result;
use serde::Deserialize;
use tourney_core::constraint::{ConstraintSetBuilder, RoleKind};
use tourney_core::leg::{MirroredLegStrategy, RepeatedLegStrategy, ShuffledLegStrategy};
use tourney_core::orderer::{AlternatingOrderer, BalancedOrderer, SeededRandomOrderer, StaticOrderer};
use tourney_core::random::SeededRandomSource;
use tourney_core::{Metadata, Participant, ScheduleRequest};

#[derive(Debug, Deserialize)]
pub struct ParticipantDocument {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl From<ParticipantDocument> for Participant {
    fn from(doc: ParticipantDocument) -> Self {
        let mut participant = Participant::new(doc.id, doc.label);
        participant.seed = doc.seed;
        participant.metadata = doc.metadata;
        participant
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKindDocument {
    HomeAway,
    Position,
}

impl From<RoleKindDocument> for RoleKind {
    fn from(doc: RoleKindDocument) -> Self {
        match doc {
            RoleKindDocument::HomeAway => RoleKind::HomeAway,
            RoleKindDocument::Position => RoleKind::Position,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintDocument {
    NoRepeatPairings,
    MinimumRestPeriods { k: u32 },
    SeedProtection { top_n: u32, fraction: f64 },
    ConsecutiveRole { limit: u32, role_kind: RoleKindDocument },
    MetadataRequireSameValue { key: String },
    MetadataRequireDifferentValues { key: String },
    MetadataRequireAdjacentValues { key: String },
    MetadataMaxUniqueValues { key: String, n: usize },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdererDocument {
    #[default]
    Static,
    Alternating,
    Balanced,
    SeededRandom,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegStrategyDocument {
    #[default]
    Repeated,
    Mirrored,
    Shuffled,
}

fn default_legs() -> u32 {
    1
}

/// The document a `schedule`/`validate` invocation reads from a file or
/// stdin (§12).
#[derive(Debug, Deserialize)]
pub struct ScheduleRequestDocument {
    pub participants: Vec<ParticipantDocument>,
    #[serde(default = "default_legs")]
    pub legs: u32,
    #[serde(default)]
    pub leg_strategy: LegStrategyDocument,
    #[serde(default)]
    pub constraints: Vec<ConstraintDocument>,
    #[serde(default)]
    pub orderer: OrdererDocument,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub participant_order: Option<Vec<String>>,
}

impl ScheduleRequestDocument {
    pub fn into_schedule_request(self) -> Result<ScheduleRequest> {
        let participants: Vec<Participant> = self.participants.into_iter().map(Into::into).collect();

        let mut builder = ConstraintSetBuilder::new();
        for constraint in self.constraints {
            builder = match constraint {
                ConstraintDocument::NoRepeatPairings => builder.no_repeat_pairings(),
                ConstraintDocument::MinimumRestPeriods { k } => builder.minimum_rest_periods(k)?,
                ConstraintDocument::SeedProtection { top_n, fraction } => builder.seed_protection(top_n, fraction)?,
                ConstraintDocument::ConsecutiveRole { limit, role_kind } => {
                    builder.consecutive_role(limit, role_kind.into())?
                }
                ConstraintDocument::MetadataRequireSameValue { key } => builder.metadata_require_same_value(key),
                ConstraintDocument::MetadataRequireDifferentValues { key } => {
                    builder.metadata_require_different_values(key)
                }
                ConstraintDocument::MetadataRequireAdjacentValues { key } => {
                    builder.metadata_require_adjacent_values(key)
                }
                ConstraintDocument::MetadataMaxUniqueValues { key, n } => builder.metadata_max_unique_values(key, n),
            };
        }
        let constraints = builder.build();

        let mut request = ScheduleRequest::new(participants).legs(self.legs).constraints(constraints);

        request = match self.leg_strategy {
            LegStrategyDocument::Repeated => request.leg_strategy(RepeatedLegStrategy),
            LegStrategyDocument::Mirrored => request.leg_strategy(MirroredLegStrategy),
            LegStrategyDocument::Shuffled => request.leg_strategy(ShuffledLegStrategy),
        };

        request = match self.orderer {
            OrdererDocument::Static => request.orderer(StaticOrderer),
            OrdererDocument::Alternating => request.orderer(AlternatingOrderer),
            OrdererDocument::Balanced => request.orderer(BalancedOrderer),
            OrdererDocument::SeededRandom => request.orderer(SeededRandomOrderer),
        };

        if let Some(seed) = self.random_seed {
            request = request.random_source(SeededRandomSource::new(seed));
        }

        if let Some(order) = self.participant_order {
            request = request.participant_order(order);
        }

        Ok(request)
    }
}
