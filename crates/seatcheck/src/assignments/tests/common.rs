use crate::assignments::domain::{AssignmentSet, Participant, Seat, Session};

pub(super) fn person(name: &str, gender: &str) -> Participant {
    Participant::named(name, "Christian", gender)
}

pub(super) fn believer(name: &str, religion: &str) -> Participant {
    Participant::named(name, religion, "Female")
}

pub(super) fn seated(participants: &[Participant]) -> Vec<Seat> {
    participants.iter().cloned().map(Some).collect()
}

/// One table per gender list, participants named `{prefix}{table}-{seat}`.
pub(super) fn gender_session(number: u32, tables: &[&[&str]]) -> Session {
    tables
        .iter()
        .enumerate()
        .fold(Session::new(number), |session, (index, genders)| {
            let table = index as u32 + 1;
            let participants: Vec<Participant> = genders
                .iter()
                .enumerate()
                .map(|(seat, gender)| person(&format!("p{table}-{seat}"), gender))
                .collect();
            session.with_table(table, seated(&participants))
        })
}

pub(super) fn plan(sessions: Vec<Session>) -> AssignmentSet {
    AssignmentSet::new(sessions)
}

/// Single session with each inner slice seated at consecutive tables from 1.
pub(super) fn single_session(tables: Vec<Vec<Participant>>) -> AssignmentSet {
    let session = tables
        .into_iter()
        .enumerate()
        .fold(Session::new(1), |session, (index, participants)| {
            session.with_table(index as u32 + 1, seated(&participants))
        });
    plan(vec![session])
}
