use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use super::super::domain::{
    AbsentParticipant, AssignmentSet, Participant, ParticipantId, Roster, Session, Table,
};
use super::parser::{ParticipantRecord, SessionRecord};

/// Assigns stable ids and resolves partner references given as names.
///
/// A record's explicit `id` wins; otherwise the name doubles as the id, matching
/// plans produced before ids existed. Partner references are matched against ids
/// first and then against the first participant carrying that name.
#[derive(Debug, Default)]
pub(crate) struct IdentityMap {
    ids: HashSet<String>,
    by_name: HashMap<String, ParticipantId>,
}

impl IdentityMap {
    pub(crate) fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ParticipantRecord>,
    {
        let mut map = Self::default();
        for record in records {
            let id = identity_of(record);
            map.ids.insert(id.0.clone());
            map.by_name.entry(record.name.clone()).or_insert(id);
        }
        map
    }

    fn resolve_partner(&self, owner: &str, reference: &str) -> ParticipantId {
        if self.ids.contains(reference) {
            return ParticipantId::from(reference);
        }

        match self.by_name.get(reference) {
            Some(id) => id.clone(),
            None => {
                warn!(participant = owner, partner = reference, "partner not found in plan");
                ParticipantId::from(reference)
            }
        }
    }

    pub(crate) fn participant(&self, record: &ParticipantRecord) -> Participant {
        Participant {
            id: identity_of(record),
            name: record.name.clone(),
            religion: record.religion.clone(),
            gender: record.gender.clone(),
            partner: record
                .partner
                .as_deref()
                .map(|reference| self.resolve_partner(&record.name, reference)),
            is_facilitator: record.is_facilitator,
            keep_together: record.keep_together,
        }
    }
}

fn identity_of(record: &ParticipantRecord) -> ParticipantId {
    ParticipantId::new(record.id.clone().unwrap_or_else(|| record.name.clone()))
}

pub(crate) fn seated_records(sessions: &[SessionRecord]) -> impl Iterator<Item = &ParticipantRecord> {
    sessions
        .iter()
        .flat_map(|session| session.tables.values())
        .flat_map(|seats| seats.iter().flatten())
}

pub(crate) fn build_assignments(sessions: Vec<SessionRecord>, identities: &IdentityMap) -> AssignmentSet {
    let sessions = sessions
        .into_iter()
        .map(|record| {
            let tables: BTreeMap<_, _> = record
                .tables
                .into_iter()
                .map(|(number, seats)| {
                    let seats = seats
                        .iter()
                        .map(|seat| seat.as_ref().map(|record| identities.participant(record)))
                        .collect();
                    (number, Table::new(number, seats))
                })
                .collect();

            let absent = record
                .absent
                .into_iter()
                .map(|absent| AbsentParticipant {
                    name: absent.name,
                    religion: absent.religion.unwrap_or_default(),
                })
                .collect();

            Session {
                number: record.session,
                tables,
                absent,
            }
        })
        .collect();

    AssignmentSet::new(sessions)
}

pub(crate) fn build_roster(records: &[ParticipantRecord], identities: &IdentityMap) -> Roster {
    Roster::from_participants(records.iter().map(|record| identities.participant(record)))
}
