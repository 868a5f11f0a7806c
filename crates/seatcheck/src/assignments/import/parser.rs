use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;

/// A solver plan: either a bare list of sessions or an object carrying a roster too.
#[derive(Debug)]
pub(crate) enum PlanDocument {
    Sessions(Vec<SessionRecord>),
    Plan(PlanRecord),
}

impl PlanDocument {
    pub(crate) fn into_parts(self) -> (Vec<SessionRecord>, Option<Vec<ParticipantRecord>>) {
        match self {
            PlanDocument::Sessions(sessions) => (sessions, None),
            PlanDocument::Plan(plan) => (plan.sessions, plan.roster),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlanRecord {
    pub(crate) sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub(crate) roster: Option<Vec<ParticipantRecord>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionRecord {
    #[serde(alias = "session_number", alias = "sessionNumber")]
    pub(crate) session: u32,
    pub(crate) tables: BTreeMap<u32, Vec<Option<ParticipantRecord>>>,
    #[serde(default, alias = "absentParticipants", alias = "absent_participants")]
    pub(crate) absent: Vec<AbsentRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ParticipantRecord {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    pub(crate) religion: String,
    pub(crate) gender: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) partner: Option<String>,
    #[serde(default, alias = "isFacilitator", deserialize_with = "lenient_flag")]
    pub(crate) is_facilitator: bool,
    #[serde(default, alias = "keepTogether", deserialize_with = "lenient_flag")]
    pub(crate) keep_together: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AbsentRecord {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) religion: Option<String>,
}

/// Table numbers are string keys in JSON; decoding through `Value` parses them back.
pub(crate) fn parse_plan<R: Read>(reader: R) -> Result<PlanDocument, serde_json::Error> {
    let document: Value = serde_json::from_reader(reader)?;
    if document.is_array() {
        Ok(PlanDocument::Sessions(serde_json::from_value(document)?))
    } else {
        Ok(PlanDocument::Plan(serde_json::from_value(document)?))
    }
}

/// Roster rows from an organizer's CSV upload.
pub(crate) fn parse_roster<R: Read>(reader: R) -> Result<Vec<ParticipantRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<ParticipantRecord>()
        .filter(|row| !matches!(row, Ok(record) if record.name.trim().is_empty()))
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Number(u64),
    Text(String),
}

/// Accepts JSON booleans as well as the spreadsheet spellings organizers use.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawFlag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(RawFlag::Bool(value)) => Ok(value),
        Some(RawFlag::Number(0)) => Ok(false),
        Some(RawFlag::Number(1)) => Ok(true),
        Some(RawFlag::Number(other)) => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, found {other}"
        ))),
        Some(RawFlag::Text(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "n" | "0" => Ok(false),
            "true" | "yes" | "y" | "1" | "x" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "expected a yes/no flag, found '{other}'"
            ))),
        },
    }
}
