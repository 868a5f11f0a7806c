use serde::Serialize;

use super::super::domain::{Session, SessionNumber};

/// Advisory verdict for one balance attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    Good,
    Suboptimal,
}

impl BalanceStatus {
    pub fn from_offenders(offending_tables: &[String]) -> Self {
        if offending_tables.is_empty() {
            Self::Good
        } else {
            Self::Suboptimal
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Suboptimal => "Suboptimal",
        }
    }
}

/// Seating totals for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session: SessionNumber,
    pub tables: usize,
    pub seated: usize,
    pub empty_seats: usize,
    pub absent: usize,
}

impl SessionSummary {
    pub fn for_session(session: &Session) -> Self {
        Self {
            session: session.number,
            tables: session.tables.len(),
            seated: session.tables().map(|table| table.real_size()).sum(),
            empty_seats: session.tables().map(|table| table.empty_seats()).sum(),
            absent: session.absent.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Hard,
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Satisfied,
    Violated,
    Good,
    Suboptimal,
    NotApplicable,
}

impl CheckStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Satisfied => "Satisfied",
            Self::Violated => "Violated",
            Self::Good => BalanceStatus::Good.label(),
            Self::Suboptimal => BalanceStatus::Suboptimal.label(),
            Self::NotApplicable => "Not applicable",
        }
    }
}

/// One row of the pass/fail badge list shown to organizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckView {
    pub name: &'static str,
    pub kind: CheckKind,
    pub status: CheckStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub offending_tables: Vec<String>,
}

impl CheckView {
    pub(crate) fn hard(name: &'static str, applicable: bool, offending_tables: &[String]) -> Self {
        let status = if !applicable {
            CheckStatus::NotApplicable
        } else if offending_tables.is_empty() {
            CheckStatus::Satisfied
        } else {
            CheckStatus::Violated
        };

        Self {
            name,
            kind: CheckKind::Hard,
            status,
            status_label: status.label(),
            offending_tables: if applicable {
                offending_tables.to_vec()
            } else {
                Vec::new()
            },
        }
    }

    pub(crate) fn advisory(name: &'static str, offending_tables: &[String]) -> Self {
        let status = match BalanceStatus::from_offenders(offending_tables) {
            BalanceStatus::Good => CheckStatus::Good,
            BalanceStatus::Suboptimal => CheckStatus::Suboptimal,
        };

        Self {
            name,
            kind: CheckKind::Advisory,
            status,
            status_label: status.label(),
            offending_tables: offending_tables.to_vec(),
        }
    }
}
