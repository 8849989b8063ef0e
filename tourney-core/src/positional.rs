//! Positional round-robin structure (§3, §4.6): pairings expressed over
//! position tokens 1..N, computed once from N and independent of
//! participants, constraints, or legs.
//!
//! Produced by the circle method: fix position 1, rotate the remaining
//! positions through N-1 (even N) or N (odd N, with a bye token padded in)
//! rotations.

use crate::diagnostics::InvalidConfigurationError;
use serde::Serialize;

/// A single slot in a pairing: either a real position (1-based) or the
/// distinguished bye token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionToken {
    Seat(usize),
    Bye,
}

/// An ordered pairing of position tokens for one round.
#[derive(Debug, Clone, Serialize)]
pub struct PositionalPairing(pub Vec<PositionToken>);

impl PositionalPairing {
    pub fn tokens(&self) -> &[PositionToken] {
        &self.0
    }

    pub fn involves_bye(&self) -> bool {
        self.0.iter().any(|t| matches!(t, PositionToken::Bye))
    }
}

/// An ordered sequence of pairings for a single round.
#[derive(Debug, Clone, Serialize)]
pub struct PositionalRound {
    pub pairings: Vec<PositionalPairing>,
}

/// The sequence of positional rounds for a full single-leg round-robin.
#[derive(Debug, Clone, Serialize)]
pub struct PositionalSchedule {
    pub rounds: Vec<PositionalRound>,
    pub participant_count: usize,
}

impl PositionalSchedule {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn total_pairing_count(&self) -> usize {
        self.rounds.iter().map(|r| r.pairings.len()).sum()
    }
}

/// Pure function of N: the positional round-robin structure, via the circle
/// method. Total and independent of constraints (§4.6).
pub fn generate_structure(participant_count: usize) -> Result<PositionalSchedule, InvalidConfigurationError> {
    if participant_count < 2 {
        return Err(InvalidConfigurationError::new(format!(
            "participant count must be at least 2, got {participant_count}"
        )));
    }

    let has_bye = participant_count % 2 == 1;
    let total = if has_bye {
        participant_count + 1
    } else {
        participant_count
    };
    let bye_seat = if has_bye { Some(total) } else { None };
    let round_count = total - 1;

    // Seats are 1-based; `arrangement[0]` is the fixed seat, the rest rotate.
    let mut arrangement: Vec<usize> = (1..=total).collect();
    let mut rounds = Vec::with_capacity(round_count);

    for _ in 0..round_count {
        let mut pairings = Vec::with_capacity(total / 2);
        for i in 0..total / 2 {
            let a = arrangement[i];
            let b = arrangement[total - 1 - i];
            let token = |seat: usize| {
                if Some(seat) == bye_seat {
                    PositionToken::Bye
                } else {
                    PositionToken::Seat(seat)
                }
            };
            pairings.push(PositionalPairing(vec![token(a), token(b)]));
        }
        rounds.push(PositionalRound { pairings });

        // Rotate: keep arrangement[0] fixed, move the last element to
        // immediately after it.
        let last = arrangement.pop().expect("total >= 2");
        arrangement.insert(1, last);
    }

    Ok(PositionalSchedule {
        rounds,
        participant_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_n_has_no_byes() {
        let structure = generate_structure(4).unwrap();
        assert_eq!(structure.round_count(), 3);
        for round in &structure.rounds {
            assert_eq!(round.pairings.len(), 2);
            assert!(round.pairings.iter().all(|p| !p.involves_bye()));
        }
        assert_eq!(structure.total_pairing_count(), 6);
    }

    #[test]
    fn odd_n_has_one_bye_per_round() {
        let structure = generate_structure(5).unwrap();
        assert_eq!(structure.round_count(), 5);
        for round in &structure.rounds {
            let byes = round
                .pairings
                .iter()
                .filter(|p| p.involves_bye())
                .count();
            assert_eq!(byes, 1);
            let real: usize = round.pairings.iter().filter(|p| !p.involves_bye()).count();
            assert_eq!(real, 2);
        }
    }

    #[test]
    fn every_seat_pairs_with_every_other_seat_exactly_once() {
        let structure = generate_structure(6).unwrap();
        let mut seen = std::collections::HashSet::new();
        for round in &structure.rounds {
            for pairing in &round.pairings {
                if let [PositionToken::Seat(a), PositionToken::Seat(b)] = pairing.tokens() {
                    let key = if a < b { (*a, *b) } else { (*b, *a) };
                    assert!(seen.insert(key), "pairing {key:?} repeated");
                }
            }
        }
        assert_eq!(seen.len(), 6 * 5 / 2);
    }

    #[test]
    fn rejects_too_few_participants() {
        assert!(generate_structure(1).is_err());
        assert!(generate_structure(0).is_err());
    }
}
