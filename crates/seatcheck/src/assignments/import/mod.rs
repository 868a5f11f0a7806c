mod mapping;
mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::domain::{AssignmentSet, Roster};
use mapping::IdentityMap;

/// Failures reading solver plans or roster uploads.
#[derive(Debug, thiserror::Error)]
pub enum AssignmentImportError {
    #[error("failed to read assignment data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid assignment plan: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid roster CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// A decoded plan plus the roster it was shipped with, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedPlan {
    pub assignments: AssignmentSet,
    pub roster: Option<Roster>,
}

pub struct AssignmentImporter;

impl AssignmentImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImportedPlan, AssignmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ImportedPlan, AssignmentImportError> {
        let (sessions, roster_records) = parser::parse_plan(reader)?.into_parts();

        let identities = IdentityMap::from_records(
            roster_records
                .iter()
                .flatten()
                .chain(mapping::seated_records(&sessions)),
        );

        let roster = roster_records
            .as_deref()
            .map(|records| mapping::build_roster(records, &identities));
        let assignments = mapping::build_assignments(sessions, &identities);

        debug!(
            sessions = assignments.sessions().len(),
            explicit_roster = roster.is_some(),
            "imported seating plan"
        );

        Ok(ImportedPlan {
            assignments,
            roster,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<ImportedPlan, AssignmentImportError> {
        Self::from_reader(bytes)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Roster, AssignmentImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a roster CSV with `name,religion,gender,partner,is_facilitator,keep_together` columns.
    pub fn from_reader<R: Read>(reader: R) -> Result<Roster, AssignmentImportError> {
        let records = parser::parse_roster(reader)?;
        let identities = IdentityMap::from_records(&records);
        Ok(mapping::build_roster(&records, &identities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignments::domain::ParticipantId;
    use std::io::Cursor;

    const TWO_SESSION_PLAN: &str = r#"[
        {
            "session": 1,
            "tables": {
                "1": [
                    {"name": "Ada", "religion": "Christian", "gender": "Female", "partner": "Ben"},
                    {"name": "Cy", "religion": "Muslim", "gender": "Male", "partner": null},
                    null
                ],
                "2": [
                    {"name": "Ben", "religion": "Christian", "gender": "Male", "partner": "Ada", "is_facilitator": true}
                ]
            }
        },
        {
            "session": 2,
            "tables": {
                "1": [
                    {"name": "Ada", "religion": "Christian", "gender": "Female", "partner": "Ben"}
                ]
            },
            "absent": [{"name": "Cy", "religion": "Muslim"}]
        }
    ]"#;

    #[test]
    fn bare_session_list_imports_without_roster() {
        let plan = AssignmentImporter::from_slice(TWO_SESSION_PLAN.as_bytes()).expect("plan parses");

        assert!(plan.roster.is_none());
        assert_eq!(plan.assignments.sessions().len(), 2);

        let first = &plan.assignments.sessions()[0];
        let table_one = &first.tables[&1];
        assert_eq!(table_one.seats.len(), 3);
        assert_eq!(table_one.empty_seats(), 1);

        let ada = table_one.seats[0].as_ref().expect("ada seated");
        assert_eq!(ada.id, ParticipantId::from("Ada"));
        assert_eq!(ada.partner, Some(ParticipantId::from("Ben")));
        assert!(!ada.is_facilitator);

        let second = &plan.assignments.sessions()[1];
        assert_eq!(second.absent.len(), 1);
        assert_eq!(second.absent[0].religion, "Muslim");
    }

    #[test]
    fn explicit_ids_disambiguate_shared_names() {
        let json = r#"{
            "sessions": [{
                "session": 1,
                "tables": {"3": [
                    {"id": "p-1", "name": "Sam", "religion": "Jewish", "gender": "Male", "partner": "p-2"},
                    {"id": "p-2", "name": "Sam", "religion": "Jewish", "gender": "Female", "partner": "p-1"}
                ]}
            }],
            "roster": [
                {"id": "p-1", "name": "Sam", "religion": "Jewish", "gender": "Male", "partner": "p-2"},
                {"id": "p-2", "name": "Sam", "religion": "Jewish", "gender": "Female", "partner": "p-1"}
            ]
        }"#;

        let plan = AssignmentImporter::from_slice(json.as_bytes()).expect("plan parses");
        let roster = plan.roster.expect("roster supplied");
        assert_eq!(roster.len(), 2);

        let table = &plan.assignments.sessions()[0].tables[&3];
        let ids: Vec<_> = table.real_participants().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![ParticipantId::from("p-1"), ParticipantId::from("p-2")]);
        assert_eq!(
            table.seats[0].as_ref().and_then(|p| p.partner.clone()),
            Some(ParticipantId::from("p-2"))
        );
    }

    #[test]
    fn partner_names_resolve_to_explicit_ids() {
        let json = r#"[{
            "session": 1,
            "tables": {"1": [
                {"id": "a", "name": "Ada", "religion": "None", "gender": "Female", "partner": "Ben"},
                {"id": "b", "name": "Ben", "religion": "None", "gender": "Male", "partner": "Ada"}
            ]}
        }]"#;

        let plan = AssignmentImporter::from_slice(json.as_bytes()).expect("plan parses");
        let table = &plan.assignments.sessions()[0].tables[&1];
        let partners: Vec<_> = table
            .real_participants()
            .map(|p| p.partner.clone().expect("partner linked"))
            .collect();
        assert_eq!(partners, vec![ParticipantId::from("b"), ParticipantId::from("a")]);
    }

    #[test]
    fn single_table_plan_imports_in_both_document_forms() {
        let session = r#"{"session": 1, "tables": {"7": [{"name": "A", "religion": "X", "gender": "F"}]}}"#;
        let bare = format!("[{session}]");
        let wrapped = format!(r#"{{"sessions": [{session}], "policy": null}}"#);

        for document in [bare, wrapped] {
            let plan = AssignmentImporter::from_slice(document.as_bytes()).expect("plan parses");
            let table = &plan.assignments.sessions()[0].tables[&7];
            assert_eq!(table.number, 7);
            assert_eq!(table.real_size(), 1);
        }
    }

    #[test]
    fn non_numeric_table_key_is_rejected() {
        let json = r#"[{"session": 1, "tables": {"head": []}}]"#;
        let error = AssignmentImporter::from_slice(json.as_bytes()).expect_err("bad table key");
        assert!(matches!(error, AssignmentImportError::Json(_)));
    }

    #[test]
    fn malformed_plan_reports_json_error() {
        let error = AssignmentImporter::from_slice(b"{\"sessions\": 5}").expect_err("invalid plan");
        match error {
            AssignmentImportError::Json(_) => {}
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = AssignmentImporter::from_path("./does-not-exist.json").expect_err("missing file");
        match error {
            AssignmentImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn roster_csv_accepts_spreadsheet_flags() {
        let csv = "name,religion,gender,partner,is_facilitator,keep_together\n\
Ada,Christian,Female,Ben,yes,TRUE\n\
Ben,Christian,Male,Ada,,1\n\
Cy,Muslim,Male,,no,\n";

        let roster = RosterImporter::from_reader(Cursor::new(csv)).expect("roster parses");

        assert_eq!(roster.len(), 3);
        assert!(roster.has_facilitators());
        assert!(roster.has_linked_pairs());

        let cy = &roster.participants()[2];
        assert_eq!(cy.partner, None);
        assert!(!cy.is_facilitator);
        assert!(!cy.keep_together);

        let ben = &roster.participants()[1];
        assert!(ben.keep_together);
        assert_eq!(ben.partner, Some(ParticipantId::from("Ada")));
    }

    #[test]
    fn roster_csv_rejects_unknown_flags() {
        let csv = "name,religion,gender,partner,is_facilitator,keep_together\nAda,Christian,Female,,maybe,\n";
        let error = RosterImporter::from_reader(Cursor::new(csv)).expect_err("invalid flag");
        match error {
            AssignmentImportError::Csv(_) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn roster_csv_tolerates_missing_optional_columns() {
        let csv = "name,religion,gender\nAda,Christian,Female\nBen,Jewish,Male\n";
        let roster = RosterImporter::from_reader(Cursor::new(csv)).expect("roster parses");
        assert_eq!(roster.len(), 2);
        assert!(!roster.has_facilitators());
    }
}
