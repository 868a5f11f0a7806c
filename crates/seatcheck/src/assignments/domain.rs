use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

pub type SessionNumber = u32;
pub type TableNumber = u32;

/// Stable identity of a participant across sessions and partner links.
///
/// Display names are not unique, so every cross-session lookup goes through this id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One member of the group roster as handed over by the assignment solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub religion: String,
    pub gender: String,
    #[serde(default)]
    pub partner: Option<ParticipantId>,
    #[serde(default)]
    pub is_facilitator: bool,
    #[serde(default)]
    pub keep_together: bool,
}

impl Participant {
    /// Build a participant whose id is the display name.
    pub fn named(name: &str, religion: &str, gender: &str) -> Self {
        Self {
            id: ParticipantId::from(name),
            name: name.to_string(),
            religion: religion.to_string(),
            gender: gender.to_string(),
            partner: None,
            is_facilitator: false,
            keep_together: false,
        }
    }

    pub fn with_partner(mut self, partner: impl Into<ParticipantId>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    pub fn as_facilitator(mut self) -> Self {
        self.is_facilitator = true;
        self
    }

    pub fn kept_together(mut self) -> Self {
        self.keep_together = true;
        self
    }

    pub fn attribute(&self, attribute: BalanceAttribute) -> &str {
        match attribute {
            BalanceAttribute::Gender => &self.gender,
            BalanceAttribute::Religion => &self.religion,
        }
    }
}

/// An empty seat is `None`; seat positions stay fixed when someone is absent.
pub type Seat = Option<Participant>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub number: TableNumber,
    pub seats: Vec<Seat>,
}

impl Table {
    pub fn new(number: TableNumber, seats: Vec<Seat>) -> Self {
        Self { number, seats }
    }

    /// Participants actually occupying a seat.
    pub fn real_participants(&self) -> impl Iterator<Item = &Participant> {
        self.seats.iter().flatten()
    }

    pub fn real_size(&self) -> usize {
        self.real_participants().count()
    }

    pub fn empty_seats(&self) -> usize {
        self.seats.iter().filter(|seat| seat.is_none()).count()
    }

    pub fn is_unoccupied(&self) -> bool {
        self.real_participants().next().is_none()
    }
}

/// Somebody marked absent for a session; never seated, never analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsentParticipant {
    pub name: String,
    #[serde(default)]
    pub religion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub number: SessionNumber,
    pub tables: BTreeMap<TableNumber, Table>,
    #[serde(default)]
    pub absent: Vec<AbsentParticipant>,
}

impl Session {
    pub fn new(number: SessionNumber) -> Self {
        Self {
            number,
            tables: BTreeMap::new(),
            absent: Vec::new(),
        }
    }

    pub fn with_table(mut self, number: TableNumber, seats: Vec<Seat>) -> Self {
        self.tables.insert(number, Table::new(number, seats));
        self
    }

    pub fn with_absent(mut self, absent: AbsentParticipant) -> Self {
        self.absent.push(absent);
        self
    }

    /// Tables in ascending table-number order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn table_ref(&self, table: &Table) -> TableRef {
        TableRef {
            session: self.number,
            table: table.number,
        }
    }
}

/// Location of a table within the plan, rendered as `Session {s} Table {t}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub session: SessionNumber,
    pub table: TableNumber,
}

impl TableRef {
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Session {} Table {}", self.session, self.table)
    }
}

/// Ordered multi-session seating plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSet {
    pub sessions: Vec<Session>,
}

impl AssignmentSet {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn first_session(&self) -> Option<&Session> {
        self.sessions.first()
    }
}

/// Categorical attributes that tables are expected to mix evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceAttribute {
    Gender,
    Religion,
}

impl BalanceAttribute {
    pub const fn ordered() -> [Self; 2] {
        [Self::Gender, Self::Religion]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Gender => "Gender",
            Self::Religion => "Religion",
        }
    }
}

impl FromStr for BalanceAttribute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gender" => Ok(Self::Gender),
            "religion" => Ok(Self::Religion),
            other => Err(format!("unknown balance attribute '{other}'")),
        }
    }
}

/// The canonical group membership used for roster-wide counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Distinct participants seated in the first session, in seating order.
    pub fn from_first_session(assignments: &AssignmentSet) -> Self {
        let seated = assignments
            .first_session()
            .into_iter()
            .flat_map(|session| session.tables())
            .flat_map(|table| table.real_participants())
            .cloned();

        Self::from_participants(seated)
    }

    /// Build a roster from an explicit list; later duplicates of an id are dropped.
    pub fn from_participants<I>(participants: I) -> Self
    where
        I: IntoIterator<Item = Participant>,
    {
        let mut seen = HashSet::new();
        let participants = participants
            .into_iter()
            .filter(|participant| seen.insert(participant.id.clone()))
            .collect();

        Self { participants }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn has_facilitators(&self) -> bool {
        self.participants
            .iter()
            .any(|participant| participant.is_facilitator)
    }

    pub fn has_linked_pairs(&self) -> bool {
        self.participants
            .iter()
            .any(|participant| participant.keep_together)
    }

    /// Occurrences of each category of `attribute` across the roster.
    pub fn category_counts(&self, attribute: BalanceAttribute) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for participant in &self.participants {
            *counts
                .entry(participant.attribute(attribute).to_string())
                .or_insert(0) += 1;
        }
        counts
    }
}
