use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use super::super::domain::{AssignmentSet, ParticipantId, Roster};

/// A pair of participants who shared a table in more than one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatedPair {
    pub first: ParticipantId,
    pub second: ParticipantId,
    pub sessions: usize,
}

/// How well the plan spreads people out across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MixingQuality {
    pub repeat_pairings: usize,
    pub avg_new_people_met: f64,
    pub repeated_pairs: Vec<RepeatedPair>,
}

pub(crate) fn analyze_mixing(assignments: &AssignmentSet, roster: &Roster) -> MixingQuality {
    let mut pair_sessions: BTreeMap<(ParticipantId, ParticipantId), usize> = BTreeMap::new();
    let mut tablemates: HashMap<&ParticipantId, HashSet<&ParticipantId>> = HashMap::new();

    for session in assignments.sessions() {
        // a pair counts once per session even if the plan seats someone twice
        let mut met_this_session = HashSet::new();

        for table in session.tables() {
            let seated: Vec<&ParticipantId> =
                table.real_participants().map(|participant| &participant.id).collect();

            for (index, &first) in seated.iter().enumerate() {
                for &second in &seated[index + 1..] {
                    if first == second {
                        continue;
                    }

                    tablemates.entry(first).or_default().insert(second);
                    tablemates.entry(second).or_default().insert(first);

                    let key = if first < second {
                        (first, second)
                    } else {
                        (second, first)
                    };
                    met_this_session.insert(key);
                }
            }
        }

        for (first, second) in met_this_session {
            *pair_sessions
                .entry((first.clone(), second.clone()))
                .or_insert(0) += 1;
        }
    }

    let repeated_pairs: Vec<RepeatedPair> = pair_sessions
        .into_iter()
        .filter(|(_, sessions)| *sessions > 1)
        .map(|((first, second), sessions)| RepeatedPair {
            first,
            second,
            sessions,
        })
        .collect();

    MixingQuality {
        repeat_pairings: repeated_pairs.len(),
        avg_new_people_met: average_unique_tablemates(roster, &tablemates),
        repeated_pairs,
    }
}

fn average_unique_tablemates(
    roster: &Roster,
    tablemates: &HashMap<&ParticipantId, HashSet<&ParticipantId>>,
) -> f64 {
    if roster.is_empty() {
        return 0.0;
    }

    let met: usize = roster
        .participants()
        .iter()
        .map(|participant| tablemates.get(&participant.id).map_or(0, HashSet::len))
        .sum();

    round_to_tenth(met as f64 / roster.len() as f64)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_tenths_away_from_zero() {
        assert_eq!(round_to_tenth(2.0), 2.0);
        assert_eq!(round_to_tenth(7.0 / 3.0), 2.3);
        assert_eq!(round_to_tenth(2.25), 2.3);
    }
}
